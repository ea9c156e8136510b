use crate::dispatch::apply_to_player;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use voxplay_audio::{
    capture_channel, default_input_sample_rate, CaptureHandle, CaptureNode, DeviceManager,
    PcmBuffer, PlaybackEngine, PlaybackHandle,
};
use voxplay_core::{
    AppConfig, AudioError, CaptureMessage, CaptureStatus, Command, CommandMap, RecognizerError,
};
use voxplay_engine::{RecognitionLoop, SpeechEngine};

/// Output period requested from the audio device, in frames.
const OUTPUT_BUFFER_FRAMES: u32 = 1024;

pub type ProgressFn = Box<dyn Fn(f32) + Send + Sync>;
pub type CommandObserver = Box<dyn Fn(&Command) + Send + Sync>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Recognizer(#[from] RecognizerError),
}

/// One active audio playback + voice control session.
///
/// Owns the playback engine, the capture node, the capture channel, and
/// the recognition/dispatch tasks; the UI layer holds only channels and
/// cloned handles. Constructed after a successful load; torn down with
/// `close()`, which stops output, disables capture, sends the termination
/// sentinel, and joins the recognition loop.
pub struct Session {
    _playback: PlaybackEngine,
    _capture: CaptureNode,
    playback_handle: PlaybackHandle,
    capture_handle: CaptureHandle,
    chunk_tx: mpsc::UnboundedSender<CaptureMessage>,
    command_tx: mpsc::UnboundedSender<Command>,
    recognition: Option<JoinHandle<()>>,
    dispatch: Option<JoinHandle<()>>,
}

impl Session {
    /// Wire up playback, capture, recognition, and dispatch. The engine
    /// must already be initialized. `on_progress` runs on the real-time
    /// output thread and must not block; `on_command` runs on the
    /// dispatch task for every applied command.
    pub fn start(
        devices: &DeviceManager,
        config: &AppConfig,
        buffer: PcmBuffer,
        engine: Box<dyn SpeechEngine>,
        on_progress: ProgressFn,
        on_command: CommandObserver,
    ) -> Result<Self, SessionError> {
        let output_device = devices.get_output_device(&config.audio.output_device)?;
        let input_device = devices.get_input_device(&config.audio.input_device)?;
        let capture_rate = default_input_sample_rate(&input_device)?;

        let (playback, playback_handle) =
            PlaybackEngine::new(&output_device, buffer, on_progress, OUTPUT_BUFFER_FRAMES)?;

        let (chunk_tx, chunk_rx) = capture_channel();
        let (capture, capture_handle) = CaptureNode::new(
            &input_device,
            chunk_tx.clone(),
            capture_rate,
            config.audio.capture_buffer_size,
        )?;

        let map = CommandMap::new(config.player.seek_step_seconds);
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<Command>();
        let recognition =
            RecognitionLoop::new(engine, chunk_rx, command_tx.clone(), map).spawn();

        let dispatch_handle = playback_handle.clone();
        let dispatch = tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                on_command(&command);
                apply_to_player(&command, &dispatch_handle);
            }
        });

        tracing::info!(
            capture_rate,
            chunk_frames = config.audio.capture_buffer_size,
            "session started",
        );

        Ok(Self {
            _playback: playback,
            _capture: capture,
            playback_handle,
            capture_handle,
            chunk_tx,
            command_tx,
            recognition: Some(recognition),
            dispatch: Some(dispatch),
        })
    }

    pub fn playback(&self) -> &PlaybackHandle {
        &self.playback_handle
    }

    /// Sender for externally triggered commands (UI key bindings).
    pub fn commands(&self) -> mpsc::UnboundedSender<Command> {
        self.command_tx.clone()
    }

    pub fn capture_status(&self) -> CaptureStatus {
        self.capture_handle.status()
    }

    /// Cloneable capture handle for status display off the session thread.
    pub fn capture_handle(&self) -> CaptureHandle {
        self.capture_handle.clone()
    }

    /// Deterministic teardown: stop output immediately, stop capture,
    /// send the sentinel, and join the recognition loop.
    pub async fn close(&mut self) {
        self.playback_handle.stop();
        self.capture_handle.set_enabled(false);
        let _ = self.chunk_tx.send(CaptureMessage::End);

        if let Some(handle) = self.recognition.take() {
            if handle.await.is_err() {
                tracing::warn!("recognition loop panicked during shutdown");
            }
        }
        // The dispatch task only parks in recv; cancel it once the
        // recognition loop is gone.
        if let Some(handle) = self.dispatch.take() {
            handle.abort();
        }
        tracing::info!("session closed");
    }
}
