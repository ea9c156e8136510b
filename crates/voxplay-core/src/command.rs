use regex::Regex;
use std::fmt;

/// A playback action produced from a recognized phrase or a UI trigger.
/// Consumed immediately, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Stop,
    /// Seek forward by N seconds.
    SeekForward(u32),
    /// Seek backward by N seconds.
    SeekBackward(u32),
    /// Seek to an absolute timestamp in seconds.
    SeekTo(u64),
    ToggleFullscreen,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Play => write!(f, "play"),
            Command::Stop => write!(f, "stop"),
            Command::SeekForward(step) => write!(f, "forward {}s", step),
            Command::SeekBackward(step) => write!(f, "back {}s", step),
            Command::SeekTo(seconds) => {
                write!(f, "jump to {}:{:02}", seconds / 60, seconds % 60)
            }
            Command::ToggleFullscreen => write!(f, "fullscreen"),
        }
    }
}

/// Exact-match vocabulary from finalized utterance to `Command`.
///
/// The fullscreen phrase is only part of the video vocabulary; the audio
/// variant builds a map without it.
#[derive(Debug, Clone, Copy)]
pub struct CommandMap {
    seek_step: u32,
    fullscreen_enabled: bool,
}

impl CommandMap {
    pub fn new(seek_step: u32) -> Self {
        Self {
            seek_step,
            fullscreen_enabled: false,
        }
    }

    pub fn with_fullscreen(seek_step: u32) -> Self {
        Self {
            seek_step,
            fullscreen_enabled: true,
        }
    }

    pub fn seek_step(&self) -> u32 {
        self.seek_step
    }

    /// Map a finalized transcript to a command. The recognizer emits
    /// lowercase text; matching is exact after trimming. Unknown phrases
    /// map to nothing and are silently ignored by the caller.
    pub fn parse(&self, text: &str) -> Option<Command> {
        match text.trim() {
            "пуск" => Some(Command::Play),
            "стоп" => Some(Command::Stop),
            "вперёд" => Some(Command::SeekForward(self.seek_step)),
            "назад" => Some(Command::SeekBackward(self.seek_step)),
            "экран" if self.fullscreen_enabled => Some(Command::ToggleFullscreen),
            _ => None,
        }
    }
}

impl Default for CommandMap {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Parse a `M:SS` jump timestamp into whole seconds. Seconds must be
/// 0..=59; anything else is rejected.
pub fn parse_timestamp(input: &str) -> Option<u64> {
    let re = Regex::new(r"^(\d+):([0-5]?\d)$").unwrap();
    let caps = re.captures(input.trim())?;
    let minutes: u64 = caps[1].parse().ok()?;
    let seconds: u64 = caps[2].parse().ok()?;
    Some(minutes * 60 + seconds)
}
