use crate::media::MediaHandle;
use voxplay_audio::PlaybackHandle;
use voxplay_core::{Command, ProgressUpdate};

/// Apply a command to the audio playback engine. Fullscreen has no
/// meaning for audio output and is dropped.
pub fn apply_to_player(command: &Command, player: &PlaybackHandle) {
    match command {
        Command::Play => player.play(),
        Command::Stop => player.stop(),
        Command::SeekForward(step) => player.seek_by_seconds(*step as i64),
        Command::SeekBackward(step) => player.seek_by_seconds(-(*step as i64)),
        Command::SeekTo(seconds) => player.seek_to_seconds(*seconds),
        Command::ToggleFullscreen => {
            tracing::debug!("fullscreen command ignored by audio playback");
        }
    }
}

/// Applies commands to a media handle (video variant) and tracks the
/// fullscreen state the backend has no query surface for.
pub struct VideoController {
    media: Box<dyn MediaHandle>,
    fullscreen: bool,
}

impl VideoController {
    pub fn new(media: Box<dyn MediaHandle>) -> Self {
        Self {
            media,
            fullscreen: false,
        }
    }

    pub fn apply(&mut self, command: &Command) {
        match command {
            Command::Play => self.media.play(),
            Command::Stop => self.media.pause(),
            Command::SeekForward(step) => {
                let target = self.media.position_ms() + u64::from(*step) * 1000;
                self.seek_to_ms(target);
            }
            Command::SeekBackward(step) => {
                let target = self
                    .media
                    .position_ms()
                    .saturating_sub(u64::from(*step) * 1000);
                self.seek_to_ms(target);
            }
            Command::SeekTo(seconds) => {
                self.seek_to_ms(seconds * 1000);
            }
            Command::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                self.media.set_full_screen(self.fullscreen);
            }
        }
    }

    /// Reposition the backend. The pause → set position → play sequence
    /// is required by the media engine; collapsing it into a bare
    /// `set_position_ms` races the backend's own position updates.
    fn seek_to_ms(&mut self, ms: u64) {
        let duration = self.media.duration_ms();
        let target = if duration > 0 { ms.min(duration) } else { ms };
        self.media.pause();
        self.media.set_position_ms(target);
        self.media.play();
    }

    pub fn progress(&self) -> ProgressUpdate {
        ProgressUpdate::from_millis(self.media.position_ms(), self.media.duration_ms())
    }

    pub fn is_full_screen(&self) -> bool {
        self.fullscreen
    }

    pub fn media(&self) -> &dyn MediaHandle {
        self.media.as_ref()
    }

    pub fn media_mut(&mut self) -> &mut dyn MediaHandle {
        self.media.as_mut()
    }
}
