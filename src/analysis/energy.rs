use crate::core::{full_scale, SampleBuffer};

/// Sample index range covered by a frame range, clamped to the buffer.
///
/// Inverted or out-of-bounds ranges collapse to an empty range.
fn sample_range(buffer: &SampleBuffer, start_frame: usize, end_frame: usize) -> (usize, usize) {
    let channels = buffer.channels() as usize;
    let len = buffer.samples().len();
    let end = end_frame.saturating_mul(channels).min(len);
    let start = start_frame.saturating_mul(channels).min(end);
    (start, end)
}

/// Normalized RMS energy in `[0, 1]` over `[start_frame, end_frame)`.
///
/// An empty range has zero energy.
pub fn rms_energy(buffer: &SampleBuffer, start_frame: usize, end_frame: usize) -> f64 {
    let (start, end) = sample_range(buffer, start_frame, end_frame);
    if start >= end {
        return 0.0;
    }

    let scale = full_scale(buffer.bit_depth());
    let sum_squared: f64 = buffer.samples()[start..end]
        .iter()
        .map(|&s| {
            let normalized = (s as f64 / scale).clamp(-1.0, 1.0);
            normalized * normalized
        })
        .sum();

    (sum_squared / (end - start) as f64).sqrt()
}

/// Normalized RMS energy of the whole buffer
pub fn buffer_rms(buffer: &SampleBuffer) -> f64 {
    rms_energy(buffer, 0, buffer.frame_count())
}

/// Largest absolute sample, normalized to `[0, 1]`
pub fn peak_level(buffer: &SampleBuffer) -> f64 {
    let max_abs = buffer
        .samples()
        .iter()
        .map(|s| s.unsigned_abs())
        .max()
        .unwrap_or(0);

    (max_abs as f64 / full_scale(buffer.bit_depth())).min(1.0)
}

/// Convert a linear level to dBFS. Zero maps to negative infinity.
pub fn to_dbfs(level: f64) -> f64 {
    if level > 0.0 {
        20.0 * level.log10()
    } else {
        f64::NEG_INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(samples: Vec<i32>, bit_depth: u16) -> SampleBuffer {
        SampleBuffer::new(samples, 1000, 1, bit_depth).unwrap()
    }

    #[test]
    fn test_zero_signal_has_no_energy() {
        let buffer = mono(vec![0; 100], 16);
        assert_eq!(rms_energy(&buffer, 0, 100), 0.0);
    }

    #[test]
    fn test_full_scale_square_wave() {
        let buffer = mono(vec![-32768, 32767, -32768, 32767], 16);
        let rms = rms_energy(&buffer, 0, 4);
        assert!((rms - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_bit_depth_normalization() {
        // Half scale at each depth gives the same energy
        let b16 = mono(vec![16384; 10], 16);
        let b24 = mono(vec![4194304; 10], 24);
        let b32 = mono(vec![1073741824; 10], 32);

        for buffer in [&b16, &b24, &b32] {
            assert!((rms_energy(buffer, 0, 10) - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unknown_depth_falls_back_to_16_bit() {
        let buffer = mono(vec![16384; 10], 12);
        assert!((rms_energy(&buffer, 0, 10) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        // 24-bit values in a buffer labelled 16-bit exceed full scale
        let buffer = mono(vec![1 << 20; 8], 16);
        assert!((rms_energy(&buffer, 0, 8) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_range_is_clamped_and_frame_aligned() {
        // Stereo: frame 1 is loud, frames 0 and 2 are silent
        let samples = vec![0, 0, 16384, 16384, 0, 0];
        let buffer = SampleBuffer::new(samples, 1000, 2, 16).unwrap();

        assert_eq!(rms_energy(&buffer, 0, 1), 0.0);
        assert!((rms_energy(&buffer, 1, 2) - 0.5).abs() < 1e-12);
        assert!(rms_energy(&buffer, 1, 500) > 0.0);
        assert_eq!(rms_energy(&buffer, 2, 1), 0.0);
        assert_eq!(rms_energy(&buffer, 10, 20), 0.0);
    }

    #[test]
    fn test_peak_level() {
        let buffer = mono(vec![0, -16384, 8000], 16);
        assert!((peak_level(&buffer) - 0.5).abs() < 1e-12);

        let extreme = mono(vec![i32::MIN], 32);
        assert_eq!(peak_level(&extreme), 1.0);

        assert_eq!(peak_level(&mono(vec![], 16)), 0.0);
    }

    #[test]
    fn test_to_dbfs() {
        assert_eq!(to_dbfs(1.0), 0.0);
        assert!((to_dbfs(0.5) + 6.0206).abs() < 1e-3);
        assert_eq!(to_dbfs(0.0), f64::NEG_INFINITY);
    }
}
