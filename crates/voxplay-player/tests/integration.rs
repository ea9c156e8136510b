use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use voxplay_core::{
    CaptureChunk, CaptureMessage, Command, CommandMap, RecognizerError, Transcript,
};
use voxplay_engine::{RecognitionLoop, SpeechEngine};
use voxplay_player::{spawn_dispatch, NullMediaHandle, VideoController};

/// Engine that finalizes a scripted utterance per chunk.
struct ScriptedEngine {
    script: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedEngine {
    fn new(script: Vec<Option<&str>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().map(|s| s.map(str::to_string)).collect()),
        }
    }
}

#[async_trait]
impl SpeechEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn initialize(&mut self, _config: toml::Value) -> Result<(), RecognizerError> {
        Ok(())
    }

    async fn accept_chunk(
        &mut self,
        _chunk: &CaptureChunk,
    ) -> Result<Option<Transcript>, RecognizerError> {
        Ok(self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .map(Transcript::new))
    }

    fn reset(&mut self) {}
}

fn chunk() -> CaptureMessage {
    CaptureMessage::Chunk(CaptureChunk {
        samples: vec![0; 8000],
        sample_rate: 16000,
    })
}

/// Capture channel → recognition loop → command channel → dispatch task →
/// media handle, with no hardware in the path.
#[tokio::test]
async fn test_voice_command_reaches_media_handle() {
    let engine = ScriptedEngine::new(vec![None, Some("пуск"), Some("вперёд")]);

    let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

    let recognition = RecognitionLoop::new(
        Box::new(engine),
        chunk_rx,
        cmd_tx,
        CommandMap::with_fullscreen(10),
    )
    .spawn();

    let controller = Arc::new(Mutex::new(VideoController::new(Box::new(
        NullMediaHandle::new(Duration::from_secs(120)),
    ))));
    let dispatch = spawn_dispatch(Arc::clone(&controller), cmd_rx, Box::new(|_| {}));

    for _ in 0..3 {
        chunk_tx.send(chunk()).unwrap();
    }
    chunk_tx.send(CaptureMessage::End).unwrap();

    tokio::time::timeout(Duration::from_secs(2), recognition)
        .await
        .expect("recognition did not exit")
        .expect("recognition panicked");
    tokio::time::timeout(Duration::from_secs(2), dispatch)
        .await
        .expect("dispatch did not exit")
        .expect("dispatch panicked");

    let controller = controller.lock().unwrap();
    assert!(controller.media().is_playing(), "'пуск' must start playback");
    assert!(
        controller.media().position_ms() >= 10_000,
        "'вперёд' must seek forward by the step",
    );
}

#[tokio::test]
async fn test_fullscreen_round_trip() {
    let engine = ScriptedEngine::new(vec![Some("экран")]);

    let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

    let recognition = RecognitionLoop::new(
        Box::new(engine),
        chunk_rx,
        cmd_tx,
        CommandMap::with_fullscreen(10),
    )
    .spawn();

    let controller = Arc::new(Mutex::new(VideoController::new(Box::new(
        NullMediaHandle::new(Duration::from_secs(60)),
    ))));
    let dispatch = spawn_dispatch(Arc::clone(&controller), cmd_rx, Box::new(|_| {}));

    chunk_tx.send(chunk()).unwrap();
    chunk_tx.send(CaptureMessage::End).unwrap();

    tokio::time::timeout(Duration::from_secs(2), recognition)
        .await
        .unwrap()
        .unwrap();
    tokio::time::timeout(Duration::from_secs(2), dispatch)
        .await
        .unwrap()
        .unwrap();

    assert!(controller.lock().unwrap().is_full_screen());
}

/// Audio-side command application over the device-free player core.
#[tokio::test]
async fn test_voice_commands_drive_audio_player() {
    use voxplay_audio::{PcmBuffer, PlayerCore};
    use voxplay_player::apply_to_player;

    let engine = ScriptedEngine::new(vec![Some("пуск"), Some("назад"), Some("стоп")]);

    let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel();

    let recognition =
        RecognitionLoop::new(Box::new(engine), chunk_rx, cmd_tx, CommandMap::new(10)).spawn();

    let buffer = PcmBuffer::new(vec![0.0; 22050 * 30], 22050).unwrap();
    let player = voxplay_audio::PlaybackHandle::new(Arc::new(PlayerCore::new(
        buffer,
        Box::new(|_| {}),
    )));
    player.seek_to_seconds(20);

    for _ in 0..3 {
        chunk_tx.send(chunk()).unwrap();
    }
    chunk_tx.send(CaptureMessage::End).unwrap();
    tokio::time::timeout(Duration::from_secs(2), recognition)
        .await
        .unwrap()
        .unwrap();

    let mut applied = Vec::new();
    while let Ok(command) = cmd_rx.try_recv() {
        apply_to_player(&command, &player);
        applied.push(command);
    }

    assert_eq!(
        applied,
        vec![Command::Play, Command::SeekBackward(10), Command::Stop],
    );
    assert!(!player.is_playing());
    assert!((player.fraction() - 1.0 / 3.0).abs() < 1e-6);
}
