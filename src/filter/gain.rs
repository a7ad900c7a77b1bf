use crate::core::{full_scale, SampleBuffer};
use crate::error::{AudioError, AudioResult};
use log::warn;

/// Result of applying a gain factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainReport {
    /// Linear factor applied
    pub gain: f64,
    /// Samples that hit the integer range limits
    pub clipped_samples: usize,
    /// Total samples processed
    pub total_samples: usize,
}

impl GainReport {
    /// Clipped share of the samples, in percent
    pub fn clipped_percent(&self) -> f64 {
        if self.total_samples == 0 {
            return 0.0;
        }
        self.clipped_samples as f64 / self.total_samples as f64 * 100.0
    }
}

/// Linear gain with clamping to the buffer's bit depth
#[derive(Clone, Debug)]
pub struct Gain {
    factor: f64,
}

impl Gain {
    /// Create a gain filter from a linear factor
    pub fn new(factor: f64) -> AudioResult<Self> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(AudioError::ConfigError(format!(
                "Gain must be a finite non-negative factor, got {}",
                factor
            )));
        }

        Ok(Gain { factor })
    }

    /// Create a gain filter from decibels
    pub fn from_db(db: f64) -> AudioResult<Self> {
        Self::new(10f64.powf(db / 20.0))
    }

    /// Get the linear factor
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl super::Filter for Gain {
    type Report = GainReport;

    fn process(&mut self, buffer: &mut SampleBuffer) -> AudioResult<GainReport> {
        let scale = full_scale(buffer.bit_depth());
        let max_value = scale - 1.0;
        let min_value = -scale;

        let mut clipped_samples = 0;
        for sample in buffer.samples_mut() {
            let scaled = *sample as f64 * self.factor;
            if scaled > max_value {
                *sample = max_value as i32;
                clipped_samples += 1;
            } else if scaled < min_value {
                *sample = min_value as i32;
                clipped_samples += 1;
            } else {
                *sample = scaled as i32;
            }
        }

        let report = GainReport {
            gain: self.factor,
            clipped_samples,
            total_samples: buffer.samples().len(),
        };

        if clipped_samples > 0 {
            warn!(
                "Clipped {} samples ({:.2}%) in {}",
                clipped_samples,
                report.clipped_percent(),
                buffer.name()
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    #[test]
    fn test_gain_scales_and_truncates() {
        let mut buffer = SampleBuffer::new(vec![100, -100, 3, 0], 1000, 1, 16).unwrap();
        let report = Gain::new(0.5).unwrap().process(&mut buffer).unwrap();

        assert_eq!(buffer.samples(), &[50, -50, 1, 0]);
        assert_eq!(report.clipped_samples, 0);
        assert_eq!(report.total_samples, 4);
    }

    #[test]
    fn test_gain_clips_to_bit_depth() {
        let mut buffer = SampleBuffer::new(vec![20000, -20000, 10], 1000, 1, 16).unwrap();
        let report = Gain::new(2.0).unwrap().process(&mut buffer).unwrap();

        assert_eq!(buffer.samples(), &[32767, -32768, 20]);
        assert_eq!(report.clipped_samples, 2);

        let mut wide = SampleBuffer::new(vec![8_000_000], 1000, 1, 24).unwrap();
        Gain::new(2.0).unwrap().process(&mut wide).unwrap();
        assert_eq!(wide.samples(), &[8_388_607]);
    }

    #[test]
    fn test_gain_32_bit_limits() {
        let mut buffer = SampleBuffer::new(vec![i32::MAX, i32::MIN], 1000, 1, 32).unwrap();
        let report = Gain::new(1.5).unwrap().process(&mut buffer).unwrap();
        assert_eq!(buffer.samples(), &[i32::MAX, i32::MIN]);
        assert_eq!(report.clipped_samples, 2);
    }

    #[test]
    fn test_gain_from_db() {
        let gain = Gain::from_db(20.0).unwrap();
        assert!((gain.factor() - 10.0).abs() < 1e-9);
        assert!((Gain::from_db(0.0).unwrap().factor() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_gain() {
        assert!(Gain::new(-1.0).is_err());
        assert!(Gain::new(f64::INFINITY).is_err());
        assert!(Gain::new(f64::NAN).is_err());
    }
}
