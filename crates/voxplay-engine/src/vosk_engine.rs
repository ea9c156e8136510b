use crate::engine_trait::SpeechEngine;
use async_trait::async_trait;
use voxplay_core::{CaptureChunk, RecognizerError, Transcript};

/// Kaldi/vosk-backed streaming recognizer.
pub struct VoskEngine {
    model_path: Option<String>,
    language: String,
}

impl VoskEngine {
    pub fn new() -> Self {
        Self {
            model_path: None,
            language: "ru".to_string(),
        }
    }
}

impl Default for VoskEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechEngine for VoskEngine {
    fn name(&self) -> &str {
        "vosk"
    }

    async fn initialize(&mut self, config: toml::Value) -> Result<(), RecognizerError> {
        let model_path = config
            .get("model_path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                RecognizerError::InitializationFailed(
                    "missing 'model_path' in vosk config".to_string(),
                )
            })?;
        self.model_path = Some(model_path.to_string());

        if let Some(lang) = config.get("language").and_then(|v| v.as_str()) {
            self.language = lang.to_string();
        }

        tracing::info!(
            model_path = %model_path,
            language = %self.language,
            "VoskEngine initialized (stub; model not loaded)"
        );
        Ok(())
    }

    async fn accept_chunk(
        &mut self,
        _chunk: &CaptureChunk,
    ) -> Result<Option<Transcript>, RecognizerError> {
        // Stub: real inference deferred to when the vosk library is wired
        Ok(None)
    }

    fn reset(&mut self) {}
}
