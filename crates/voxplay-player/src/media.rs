use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use voxplay_core::MediaError;

/// Seekable play/pause/position contract over an external media engine.
/// The video variant drives everything through this; rendering stays on
/// the backend's side of the boundary.
pub trait MediaHandle: Send {
    fn set_source(&mut self, path: &Path) -> Result<(), MediaError>;
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    fn position_ms(&self) -> u64;
    fn set_position_ms(&mut self, ms: u64);
    fn duration_ms(&self) -> u64;
    fn set_full_screen(&mut self, on: bool);
}

/// Clock-driven stand-in for a real media backend: position advances in
/// real time while "playing". Reports a fixed duration (zero by default,
/// i.e. unknown until a real backend is wired).
pub struct NullMediaHandle {
    source: Option<PathBuf>,
    duration: Duration,
    base: Duration,
    started_at: Option<Instant>,
    fullscreen: bool,
}

impl NullMediaHandle {
    pub fn new(duration: Duration) -> Self {
        Self {
            source: None,
            duration,
            base: Duration::ZERO,
            started_at: None,
            fullscreen: false,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_full_screen(&self) -> bool {
        self.fullscreen
    }

    fn clock_position(&self) -> Duration {
        let elapsed = self
            .started_at
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO);
        let position = self.base + elapsed;
        if self.duration > Duration::ZERO {
            position.min(self.duration)
        } else {
            position
        }
    }
}

impl Default for NullMediaHandle {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl MediaHandle for NullMediaHandle {
    fn set_source(&mut self, path: &Path) -> Result<(), MediaError> {
        self.source = Some(path.to_path_buf());
        self.base = Duration::ZERO;
        self.started_at = None;
        Ok(())
    }

    fn play(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.base = self.clock_position();
        self.started_at = None;
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn position_ms(&self) -> u64 {
        self.clock_position().as_millis() as u64
    }

    fn set_position_ms(&mut self, ms: u64) {
        let target = Duration::from_millis(ms);
        self.base = if self.duration > Duration::ZERO {
            target.min(self.duration)
        } else {
            target
        };
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    fn set_full_screen(&mut self, on: bool) {
        self.fullscreen = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handle_starts_paused_at_zero() {
        let handle = NullMediaHandle::new(Duration::from_secs(60));
        assert!(!handle.is_playing());
        assert_eq!(handle.position_ms(), 0);
        assert_eq!(handle.duration_ms(), 60_000);
    }

    #[test]
    fn test_null_handle_pause_freezes_position() {
        let mut handle = NullMediaHandle::new(Duration::from_secs(60));
        handle.play();
        assert!(handle.is_playing());
        handle.pause();
        let frozen = handle.position_ms();
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(handle.position_ms(), frozen);
    }

    #[test]
    fn test_null_handle_position_is_monotonic_while_playing() {
        let mut handle = NullMediaHandle::new(Duration::from_secs(60));
        handle.play();
        let p1 = handle.position_ms();
        std::thread::sleep(Duration::from_millis(20));
        let p2 = handle.position_ms();
        assert!(p2 >= p1);
    }

    #[test]
    fn test_null_handle_set_position_clamps_to_duration() {
        let mut handle = NullMediaHandle::new(Duration::from_secs(10));
        handle.set_position_ms(25_000);
        assert_eq!(handle.position_ms(), 10_000);
    }

    #[test]
    fn test_null_handle_unknown_duration_does_not_clamp() {
        let mut handle = NullMediaHandle::default();
        handle.set_position_ms(25_000);
        assert_eq!(handle.position_ms(), 25_000);
        assert_eq!(handle.duration_ms(), 0);
    }

    #[test]
    fn test_null_handle_set_source_rewinds() {
        let mut handle = NullMediaHandle::new(Duration::from_secs(10));
        handle.set_position_ms(5_000);
        handle.set_source(Path::new("clip.mp4")).unwrap();
        assert_eq!(handle.position_ms(), 0);
        assert_eq!(handle.source(), Some(Path::new("clip.mp4")));
        assert!(!handle.is_playing());
    }

    #[test]
    fn test_null_handle_fullscreen_flag() {
        let mut handle = NullMediaHandle::default();
        assert!(!handle.is_full_screen());
        handle.set_full_screen(true);
        assert!(handle.is_full_screen());
        handle.set_full_screen(false);
        assert!(!handle.is_full_screen());
    }
}
