pub mod dispatch;
pub mod media;
pub mod session;
pub mod video;

pub use dispatch::{apply_to_player, VideoController};
pub use media::{MediaHandle, NullMediaHandle};
pub use session::{CommandObserver, ProgressFn, Session, SessionError};
pub use video::{spawn_dispatch, spawn_progress_poll, VideoSession};
