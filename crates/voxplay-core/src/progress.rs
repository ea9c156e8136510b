/// A formatted position report pushed to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressUpdate {
    /// `M:SS/M:SS`, elapsed over total.
    pub label: String,
    /// `100 * elapsed / total`, truncated. 0 when total is unknown.
    pub percent: u8,
}

/// Format elapsed/total whole seconds as `M:SS/M:SS`.
pub fn format_position(elapsed_secs: u64, total_secs: u64) -> String {
    let (em, es) = (elapsed_secs / 60, elapsed_secs % 60);
    let (tm, ts) = (total_secs / 60, total_secs % 60);
    format!("{}:{:02}/{}:{:02}", em, es, tm, ts)
}

/// Integer progress percentage. A zero total yields 0 rather than dividing
/// by zero (the total is unknown before a source reports its duration).
pub fn percent(elapsed_secs: u64, total_secs: u64) -> u8 {
    if total_secs == 0 {
        return 0;
    }
    ((elapsed_secs * 100) / total_secs).min(100) as u8
}

impl ProgressUpdate {
    /// Push model (audio variant): the playback engine reports a fraction
    /// in [0,1]; the label is derived from the known buffer duration.
    pub fn from_fraction(fraction: f32, duration_secs: f64) -> Self {
        let fraction = fraction.clamp(0.0, 1.0) as f64;
        let elapsed = (duration_secs * fraction) as u64;
        let total = duration_secs as u64;
        Self {
            label: format_position(elapsed, total),
            percent: (fraction * 100.0) as u8,
        }
    }

    /// Poll model (video variant): position and duration read directly
    /// from the media handle in milliseconds.
    pub fn from_millis(position_ms: u64, duration_ms: u64) -> Self {
        let elapsed = position_ms / 1000;
        let total = duration_ms / 1000;
        Self {
            label: format_position(elapsed, total),
            percent: percent(elapsed, total),
        }
    }
}
