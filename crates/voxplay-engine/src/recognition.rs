use crate::engine_trait::SpeechEngine;
use tokio::sync::mpsc;
use voxplay_core::{CaptureMessage, Command, CommandMap};

/// Consumer side of the capture queue.
///
/// Runs as a long-lived task: blocks on dequeue, feeds each chunk to the
/// engine, and forwards commands parsed from finalized utterances. The
/// termination sentinel (or the capture sender going away) ends the loop;
/// the engine is reset exactly once on the way out. Messages enqueued
/// after the sentinel are never processed; the receiver is dropped with
/// the loop.
pub struct RecognitionLoop {
    engine: Box<dyn SpeechEngine>,
    chunks: mpsc::UnboundedReceiver<CaptureMessage>,
    commands: mpsc::UnboundedSender<Command>,
    map: CommandMap,
}

impl RecognitionLoop {
    pub fn new(
        engine: Box<dyn SpeechEngine>,
        chunks: mpsc::UnboundedReceiver<CaptureMessage>,
        commands: mpsc::UnboundedSender<Command>,
        map: CommandMap,
    ) -> Self {
        Self {
            engine,
            chunks,
            commands,
            map,
        }
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        while let Some(message) = self.chunks.recv().await {
            let chunk = match message {
                CaptureMessage::Chunk(chunk) => chunk,
                CaptureMessage::End => {
                    tracing::debug!("capture sentinel received, stopping recognition");
                    break;
                }
            };

            match self.engine.accept_chunk(&chunk).await {
                Ok(Some(transcript)) => {
                    tracing::info!(text = %transcript.text, "utterance finalized");
                    if let Some(command) = self.map.parse(&transcript.text) {
                        tracing::info!(?command, "voice command");
                        // Receiver gone means the session is already closing
                        let _ = self.commands.send(command);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("recognizer error: {e}");
                }
            }
        }
        self.engine.reset();
        tracing::debug!("recognition loop exited");
    }
}
