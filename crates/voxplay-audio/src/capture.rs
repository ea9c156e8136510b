use cpal::traits::DeviceTrait;
use cpal::{Device, SampleRate, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use voxplay_core::{AudioError, CaptureChunk, CaptureMessage, CaptureStatus};

const STATUS_OK: u8 = 0;
const STATUS_ERROR: u8 = 1;
const STATUS_DISABLED: u8 = 2;

// ── CaptureHandle ─────────────────────────────────────────────

#[derive(Clone)]
pub struct CaptureHandle {
    enabled: Arc<AtomicBool>,
    status: Arc<AtomicU8>,
}

impl CaptureHandle {
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, v: bool) {
        self.enabled.store(v, Ordering::Relaxed);
        let status = if v { STATUS_OK } else { STATUS_DISABLED };
        self.status.store(status, Ordering::Relaxed);
    }

    pub fn status(&self) -> CaptureStatus {
        match self.status.load(Ordering::Relaxed) {
            STATUS_ERROR => CaptureStatus::Error,
            STATUS_DISABLED => CaptureStatus::Disabled,
            _ => CaptureStatus::Ok,
        }
    }
}

// ── CaptureNode ───────────────────────────────────────────────

/// Owns the cpal input stream. The real-time callback copies each
/// fixed-size block of 16-bit mono samples into a `CaptureChunk` and
/// hands it to the channel; it never decodes and never blocks.
pub struct CaptureNode {
    _stream: Stream,
}

impl CaptureNode {
    pub fn new(
        device: &Device,
        sender: mpsc::UnboundedSender<CaptureMessage>,
        sample_rate: u32,
        buffer_size: u32,
    ) -> Result<(Self, CaptureHandle), AudioError> {
        let config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Fixed(buffer_size),
        };

        let enabled = Arc::new(AtomicBool::new(true));
        let enabled_flag = Arc::clone(&enabled);
        let status = Arc::new(AtomicU8::new(STATUS_OK));
        let status_flag = Arc::clone(&status);

        let err_callback = move |err: cpal::StreamError| {
            tracing::error!("capture stream error: {}", err);
            status_flag.store(STATUS_ERROR, Ordering::Relaxed);
        };

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if !enabled_flag.load(Ordering::Relaxed) {
                        return;
                    }
                    let chunk = CaptureChunk {
                        samples: data.to_vec(),
                        sample_rate,
                    };
                    // Receiver gone means the session is closing; drop the chunk
                    let _ = sender.send(CaptureMessage::Chunk(chunk));
                },
                err_callback,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        let handle = CaptureHandle { enabled, status };
        Ok((Self { _stream: stream }, handle))
    }
}

/// Native sample rate of a capture device's default input configuration.
pub fn default_input_sample_rate(device: &Device) -> Result<u32, AudioError> {
    let config = device
        .default_input_config()
        .map_err(|e| AudioError::StreamBuild(e.to_string()))?;
    Ok(config.sample_rate().0)
}
