use super::energy::rms_energy;
use crate::core::SampleBuffer;

/// Whether `[start_frame, end_frame)` is at or below `threshold_dbfs`.
///
/// Zero energy is always silent. Ranges that start at or past the end of
/// the buffer, or that are empty, count as silent too.
pub fn is_silent(
    buffer: &SampleBuffer,
    start_frame: usize,
    end_frame: usize,
    threshold_dbfs: f64,
) -> bool {
    if start_frame >= end_frame || start_frame >= buffer.frame_count() {
        return true;
    }

    let rms = rms_energy(buffer, start_frame, end_frame);
    if rms == 0.0 {
        return true;
    }

    20.0 * rms.log10() <= threshold_dbfs
}
