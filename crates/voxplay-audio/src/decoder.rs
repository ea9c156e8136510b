use rodio::Source;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use voxplay_core::DecodeError;

/// Fully decoded mono PCM at the source's native sample rate.
/// Immutable once built; the playback engine reads it in place.
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, DecodeError> {
        if samples.is_empty() {
            return Err(DecodeError::EmptyStream);
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

/// Decode an audio file into a `PcmBuffer`.
///
/// Multi-channel sources are averaged down to mono. This decodes the whole
/// file up front, so callers run it on a blocking worker rather than the
/// UI thread.
pub fn decode_file(path: &Path) -> Result<PcmBuffer, DecodeError> {
    let file = File::open(path)?;
    let source = rodio::Decoder::new(BufReader::new(file))
        .map_err(|e| DecodeError::InvalidFormat(e.to_string()))?;

    let sample_rate = source.sample_rate();
    let channels = source.channels() as usize;
    let interleaved: Vec<f32> = source.convert_samples().collect();
    let mono = downmix_to_mono(&interleaved, channels);

    tracing::debug!(
        samples = mono.len(),
        sample_rate,
        channels,
        "decoded {}",
        path.display(),
    );

    PcmBuffer::new(mono, sample_rate)
}

/// Average interleaved frames down to a single channel.
fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_buffer_rejects_empty() {
        match PcmBuffer::new(vec![], 22050) {
            Err(DecodeError::EmptyStream) => {}
            other => panic!("expected EmptyStream, got {:?}", other),
        }
    }

    #[test]
    fn test_pcm_buffer_duration() {
        let buffer = PcmBuffer::new(vec![0.0; 22050 * 30], 22050).unwrap();
        assert_eq!(buffer.duration_seconds(), 30.0);
        assert_eq!(buffer.len(), 22050 * 30);
        assert_eq!(buffer.sample_rate(), 22050);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        let samples = vec![0.1, -0.2, 0.3];
        assert_eq!(downmix_to_mono(&samples, 1), samples);
    }

    #[test]
    fn test_downmix_stereo_averages_frames() {
        let interleaved = vec![0.1, 0.3, 0.5, 0.7];
        let mono = downmix_to_mono(&interleaved, 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.2).abs() < 1e-6);
        assert!((mono[1] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_downmix_drops_trailing_partial_frame() {
        let interleaved = vec![1.0, 1.0, 1.0];
        let mono = downmix_to_mono(&interleaved, 2);
        assert_eq!(mono.len(), 1);
    }

    #[test]
    fn test_decode_missing_file_is_open_error() {
        let result = decode_file(Path::new("/nonexistent/track.mp3"));
        match result {
            Err(DecodeError::Open(_)) => {}
            other => panic!("expected Open error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_invalid_file_is_format_error() {
        let dir = std::env::temp_dir().join("voxplay_test_decode");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("not_audio.mp3");
        std::fs::write(&path, b"definitely not an audio container").unwrap();

        let result = decode_file(&path);
        match result {
            Err(DecodeError::InvalidFormat(_)) => {}
            other => panic!("expected InvalidFormat, got {:?}", other),
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
