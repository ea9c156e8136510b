pub mod capture;
pub mod decoder;
pub mod device;
pub mod playback;

pub use capture::{default_input_sample_rate, CaptureHandle, CaptureNode};
pub use decoder::{decode_file, PcmBuffer};
pub use device::DeviceManager;
pub use playback::{PlaybackEngine, PlaybackHandle, PlayerCore};

use tokio::sync::mpsc;
use voxplay_core::CaptureMessage;

/// Create the FIFO hand-off between the capture callback and the
/// recognition loop.
pub fn capture_channel() -> (
    mpsc::UnboundedSender<CaptureMessage>,
    mpsc::UnboundedReceiver<CaptureMessage>,
) {
    mpsc::unbounded_channel()
}
