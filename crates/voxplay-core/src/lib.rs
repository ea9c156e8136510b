pub mod command;
pub mod config;
pub mod error;
pub mod progress;
pub mod tui_types;
pub mod types;

pub use command::{parse_timestamp, Command, CommandMap};
pub use config::AppConfig;
pub use error::{AudioError, ConfigError, DecodeError, MediaError, RecognizerError};
pub use progress::{format_position, percent, ProgressUpdate};
pub use tui_types::{CaptureStatus, PlayerState, UiCommand};
pub use types::{CaptureChunk, CaptureMessage, Transcript};
