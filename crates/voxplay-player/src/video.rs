use crate::dispatch::VideoController;
use crate::media::MediaHandle;
use crate::session::{CommandObserver, SessionError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use voxplay_audio::{capture_channel, default_input_sample_rate, CaptureHandle, CaptureNode, DeviceManager};
use voxplay_core::{
    AppConfig, CaptureMessage, CaptureStatus, Command, CommandMap, ProgressUpdate,
};
use voxplay_engine::{RecognitionLoop, SpeechEngine};

/// Apply commands arriving on the channel to the shared controller.
pub fn spawn_dispatch(
    controller: Arc<Mutex<VideoController>>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    observer: CommandObserver,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            observer(&command);
            match controller.lock() {
                Ok(mut controller) => controller.apply(&command),
                Err(_) => break,
            }
        }
    })
}

/// Poll-model progress reporter: read position and duration from the
/// media handle at a fixed interval and publish the formatted update.
/// Exits when the receiver side goes away.
pub fn spawn_progress_poll(
    controller: Arc<Mutex<VideoController>>,
    interval: Duration,
    tx: watch::Sender<ProgressUpdate>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let update = match controller.lock() {
                Ok(controller) => controller.progress(),
                Err(_) => break,
            };
            if tx.send(update).is_err() {
                break;
            }
        }
    })
}

/// One active video playback + voice control session.
///
/// Same ownership contract as the audio `Session`: the media handle,
/// capture node, and recognition/dispatch/poll tasks all live here, and
/// `close()` tears them down in order, including the termination
/// sentinel, which both variants send.
pub struct VideoSession {
    controller: Arc<Mutex<VideoController>>,
    _capture: CaptureNode,
    capture_handle: CaptureHandle,
    chunk_tx: mpsc::UnboundedSender<CaptureMessage>,
    command_tx: mpsc::UnboundedSender<Command>,
    recognition: Option<JoinHandle<()>>,
    dispatch: Option<JoinHandle<()>>,
    poll: Option<JoinHandle<()>>,
}

impl VideoSession {
    pub fn start(
        devices: &DeviceManager,
        config: &AppConfig,
        media: Box<dyn MediaHandle>,
        engine: Box<dyn SpeechEngine>,
        on_command: CommandObserver,
    ) -> Result<(Self, watch::Receiver<ProgressUpdate>), SessionError> {
        let input_device = devices.get_input_device(&config.audio.input_device)?;
        let capture_rate = default_input_sample_rate(&input_device)?;

        let controller = Arc::new(Mutex::new(VideoController::new(media)));

        let (chunk_tx, chunk_rx) = capture_channel();
        let (capture, capture_handle) = CaptureNode::new(
            &input_device,
            chunk_tx.clone(),
            capture_rate,
            config.audio.capture_buffer_size,
        )?;

        let map = CommandMap::with_fullscreen(config.player.seek_step_seconds);
        let (command_tx, command_rx) = mpsc::unbounded_channel::<Command>();
        let recognition =
            RecognitionLoop::new(engine, chunk_rx, command_tx.clone(), map).spawn();

        let dispatch = spawn_dispatch(Arc::clone(&controller), command_rx, on_command);

        let (progress_tx, progress_rx) = watch::channel(ProgressUpdate::default());
        let poll = spawn_progress_poll(
            Arc::clone(&controller),
            Duration::from_millis(config.player.progress_poll_ms),
            progress_tx,
        );

        tracing::info!(capture_rate, "video session started");

        Ok((
            Self {
                controller,
                _capture: capture,
                capture_handle,
                chunk_tx,
                command_tx,
                recognition: Some(recognition),
                dispatch: Some(dispatch),
                poll: Some(poll),
            },
            progress_rx,
        ))
    }

    pub fn commands(&self) -> mpsc::UnboundedSender<Command> {
        self.command_tx.clone()
    }

    pub fn capture_status(&self) -> CaptureStatus {
        self.capture_handle.status()
    }

    pub fn capture_handle(&self) -> CaptureHandle {
        self.capture_handle.clone()
    }

    pub fn controller(&self) -> Arc<Mutex<VideoController>> {
        Arc::clone(&self.controller)
    }

    /// Same shutdown sequence as the audio session; the sentinel is not
    /// optional here.
    pub async fn close(&mut self) {
        if let Ok(mut controller) = self.controller.lock() {
            controller.media_mut().pause();
        }
        self.capture_handle.set_enabled(false);
        let _ = self.chunk_tx.send(CaptureMessage::End);

        if let Some(handle) = self.recognition.take() {
            if handle.await.is_err() {
                tracing::warn!("recognition loop panicked during shutdown");
            }
        }
        for handle in [self.dispatch.take(), self.poll.take()].into_iter().flatten() {
            handle.abort();
        }
        tracing::info!("video session closed");
    }
}
