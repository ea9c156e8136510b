use async_trait::async_trait;
use voxplay_core::{CaptureChunk, RecognizerError, Transcript};

/// Streaming speech recognizer contract.
///
/// Implementations buffer audio internally and report a `Transcript` only
/// when an utterance is finalized at a speech boundary; `None` means the
/// chunk was absorbed without finalization. The recognition loop owns the
/// engine exclusively, so implementations need no internal locking.
#[async_trait]
pub trait SpeechEngine: Send {
    fn name(&self) -> &str;
    async fn initialize(&mut self, config: toml::Value) -> Result<(), RecognizerError>;
    async fn accept_chunk(
        &mut self,
        chunk: &CaptureChunk,
    ) -> Result<Option<Transcript>, RecognizerError>;
    /// Clear internal decoder state for reuse.
    fn reset(&mut self);
}
