/// One fixed-size block of raw captured microphone audio.
///
/// Samples are 16-bit signed mono at the capture device's native rate.
/// Produced once per input-callback invocation and moved, never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureChunk {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

/// Message type carried by the capture channel. `End` is the termination
/// sentinel: the consumer resets its recognizer and exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureMessage {
    Chunk(CaptureChunk),
    End,
}

/// A finalized utterance as reported by the speech engine. Partial results
/// never cross this boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_chunk_fields() {
        let chunk = CaptureChunk {
            samples: vec![0, 100, -100, i16::MAX],
            sample_rate: 44100,
        };
        assert_eq!(chunk.samples.len(), 4);
        assert_eq!(chunk.sample_rate, 44100);
    }

    #[test]
    fn test_capture_message_end_is_distinct() {
        let chunk = CaptureMessage::Chunk(CaptureChunk {
            samples: vec![],
            sample_rate: 16000,
        });
        assert_ne!(chunk, CaptureMessage::End);
    }

    #[test]
    fn test_transcript_new() {
        let t = Transcript::new("пуск");
        assert_eq!(t.text, "пуск");
    }
}
