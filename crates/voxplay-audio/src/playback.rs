use crate::decoder::PcmBuffer;
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use voxplay_core::AudioError;

type ProgressFn = Box<dyn Fn(f32) + Send + Sync>;

// ── PlayerCore ────────────────────────────────────────────────

/// Device-free playback state: the decoded buffer, the play cursor, and
/// the playing gate. The cpal output callback and the control handle both
/// operate on this; the cursor mutex is the only lock on the real-time
/// path and is held for the duration of one copy.
pub struct PlayerCore {
    samples: Vec<f32>,
    sample_rate: u32,
    cursor: Mutex<usize>,
    playing: AtomicBool,
    on_progress: ProgressFn,
}

impl PlayerCore {
    pub fn new(buffer: PcmBuffer, on_progress: ProgressFn) -> Self {
        let sample_rate = buffer.sample_rate();
        Self {
            samples: buffer.into_samples(),
            sample_rate,
            cursor: Mutex::new(0),
            playing: AtomicBool::new(false),
            on_progress,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    pub fn is_at_end(&self) -> bool {
        match self.cursor.lock() {
            Ok(cursor) => *cursor >= self.samples.len(),
            Err(_) => false,
        }
    }

    pub fn fraction(&self) -> f32 {
        match self.cursor.lock() {
            Ok(cursor) => *cursor as f32 / self.samples.len() as f32,
            Err(_) => 0.0,
        }
    }

    /// Start or resume output. At end-of-buffer the cursor rewinds to the
    /// start first; the gated callback means no stale device-side audio
    /// survives the restart. Idempotent while already playing.
    pub fn play(&self) {
        if self.is_at_end() {
            self.mutate_cursor(|_| 0);
        }
        self.playing.store(true, Ordering::Relaxed);
    }

    /// Halt output immediately; the next callback emits silence. The
    /// cursor keeps its position for resume. Idempotent while stopped.
    pub fn stop(&self) {
        self.playing.store(false, Ordering::Relaxed);
    }

    /// Jump to an absolute position, clamped to the buffer length. A
    /// negative position is unrepresentable by type.
    pub fn seek_to_seconds(&self, seconds: u64) {
        let target = seconds.saturating_mul(self.sample_rate as u64);
        self.mutate_cursor(|_| target.min(usize::MAX as u64) as usize);
    }

    /// Shift the cursor by a signed number of seconds, clamped to
    /// `[0, len]` in both directions.
    pub fn seek_by_seconds(&self, delta_seconds: i64) {
        let offset = delta_seconds.saturating_mul(self.sample_rate as i64);
        self.mutate_cursor(|cursor| {
            let next = cursor as i64 + offset;
            next.max(0) as usize
        });
    }

    /// Real-time output callback body. Copies as much of the buffer as is
    /// available, zero-fills the shortfall, advances the cursor, and
    /// reports the new fraction. At end-of-buffer it produces silence and
    /// does no further work.
    pub fn render(&self, out: &mut [f32]) {
        if !self.playing.load(Ordering::Relaxed) {
            out.fill(0.0);
            return;
        }
        let fraction = match self.cursor.lock() {
            Ok(mut cursor) => {
                let remaining = self.samples.len() - *cursor;
                if remaining == 0 {
                    out.fill(0.0);
                    return;
                }
                let n = remaining.min(out.len());
                out[..n].copy_from_slice(&self.samples[*cursor..*cursor + n]);
                out[n..].fill(0.0);
                *cursor += n;
                *cursor as f32 / self.samples.len() as f32
            }
            Err(_) => {
                out.fill(0.0);
                return;
            }
        };
        (self.on_progress)(fraction);
    }

    /// Apply a cursor mutation under the lock, clamp to the buffer, and
    /// report the resulting fraction after the lock is released.
    fn mutate_cursor(&self, f: impl FnOnce(usize) -> usize) {
        let fraction = match self.cursor.lock() {
            Ok(mut cursor) => {
                *cursor = f(*cursor).min(self.samples.len());
                *cursor as f32 / self.samples.len() as f32
            }
            Err(_) => return,
        };
        (self.on_progress)(fraction);
    }
}

// ── PlaybackHandle ────────────────────────────────────────────

/// Cloneable, thread-safe control surface over a running player. Command
/// dispatch and the UI use this; the cpal stream stays with the engine.
#[derive(Clone)]
pub struct PlaybackHandle {
    core: Arc<PlayerCore>,
}

impl PlaybackHandle {
    pub fn new(core: Arc<PlayerCore>) -> Self {
        Self { core }
    }

    pub fn play(&self) {
        self.core.play();
    }

    pub fn stop(&self) {
        self.core.stop();
    }

    pub fn seek_to_seconds(&self, seconds: u64) {
        self.core.seek_to_seconds(seconds);
    }

    pub fn seek_by_seconds(&self, delta_seconds: i64) {
        self.core.seek_by_seconds(delta_seconds);
    }

    pub fn is_playing(&self) -> bool {
        self.core.is_playing()
    }

    pub fn is_at_end(&self) -> bool {
        self.core.is_at_end()
    }

    pub fn fraction(&self) -> f32 {
        self.core.fraction()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.core.duration_seconds()
    }
}

// ── PlaybackEngine ────────────────────────────────────────────

/// Owns the cpal output stream for the lifetime of a session. The stream
/// runs continuously; the `playing` gate in `PlayerCore` decides whether
/// it carries audio or silence.
pub struct PlaybackEngine {
    _stream: Stream,
    handle: PlaybackHandle,
}

impl PlaybackEngine {
    pub fn new(
        device: &Device,
        buffer: PcmBuffer,
        on_progress: ProgressFn,
        buffer_size: u32,
    ) -> Result<(Self, PlaybackHandle), AudioError> {
        let core = Arc::new(PlayerCore::new(buffer, on_progress));
        let config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(core.sample_rate()),
            buffer_size: cpal::BufferSize::Fixed(buffer_size),
        };

        let render_core = Arc::clone(&core);
        let err_callback = |err: cpal::StreamError| {
            tracing::error!("playback stream error: {}", err);
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    render_core.render(data);
                },
                err_callback,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamError(e.to_string()))?;

        let handle = PlaybackHandle::new(core);
        Ok((
            Self {
                _stream: stream,
                handle: handle.clone(),
            },
            handle,
        ))
    }

    pub fn handle(&self) -> &PlaybackHandle {
        &self.handle
    }
}
