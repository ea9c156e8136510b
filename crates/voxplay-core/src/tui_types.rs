use crate::command::Command;
use crate::progress::ProgressUpdate;

/// Health status for the capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureStatus {
    #[default]
    Ok,
    Error,
    Disabled,
}

/// Aggregate player state broadcast to the TUI via watch channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerState {
    pub file_name: String,
    pub progress: ProgressUpdate,
    pub playing: bool,
    pub at_end: bool,
    pub capture: CaptureStatus,
    /// Most recent voice commands, oldest first.
    pub recent_commands: Vec<String>,
    pub is_running: bool,
}

/// Commands sent from TUI → main via mpsc channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Player(Command),
    Quit,
}
