use crate::engine_trait::SpeechEngine;
use async_trait::async_trait;
use voxplay_core::{CaptureChunk, RecognizerError, Transcript};

/// Always-available engine that absorbs audio and never finalizes an
/// utterance. Keeps the capture → recognition pipeline runnable without a
/// speech model.
#[derive(Default)]
pub struct NullEngine {
    chunks_accepted: usize,
    resets: usize,
}

impl NullEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks_accepted(&self) -> usize {
        self.chunks_accepted
    }

    pub fn resets(&self) -> usize {
        self.resets
    }
}

#[async_trait]
impl SpeechEngine for NullEngine {
    fn name(&self) -> &str {
        "null"
    }

    async fn initialize(&mut self, _config: toml::Value) -> Result<(), RecognizerError> {
        Ok(())
    }

    async fn accept_chunk(
        &mut self,
        chunk: &CaptureChunk,
    ) -> Result<Option<Transcript>, RecognizerError> {
        self.chunks_accepted += 1;
        tracing::trace!(
            "NullEngine absorbed chunk #{}, {} samples",
            self.chunks_accepted,
            chunk.samples.len(),
        );
        Ok(None)
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.chunks_accepted = 0;
    }
}
