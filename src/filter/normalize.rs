use super::gain::Gain;
use super::Filter;
use crate::analysis::{buffer_rms, peak_level, to_dbfs};
use crate::core::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use log::{info, warn};
use std::fmt;

/// Offset from RMS dBFS to the approximate LUFS value
const LUFS_OFFSET_DB: f64 = 0.691;

/// Loudest accepted normalization target, in LUFS
pub const MAX_TARGET_LUFS: f64 = -6.0;

/// Quietest accepted normalization target, in LUFS
pub const MIN_TARGET_LUFS: f64 = -30.0;

/// Peak level above which a gain change counts as a clipping risk, in dBFS
const CLIPPING_MARGIN_DB: f64 = -0.1;

/// Largest boost applied to a track at risk of clipping, in dB
const MAX_RISKY_GAIN_DB: f64 = 6.0;

/// Whole-track level measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessMeasurement {
    /// Approximate integrated loudness (RMS based), in LUFS
    pub integrated_lufs: f64,
    /// RMS level in dBFS
    pub rms_dbfs: f64,
    /// Sample peak in dBFS
    pub true_peak_dbfs: f64,
}

/// Measure the level of a whole track.
///
/// This approximates LUFS from the RMS level and does not implement
/// BS.1770 gating.
pub fn measure_loudness(buffer: &SampleBuffer) -> AudioResult<LoudnessMeasurement> {
    if buffer.is_empty() {
        return Err(AudioError::ProcessingError(format!(
            "No audio samples found in {}",
            buffer.name()
        )));
    }

    let rms_dbfs = to_dbfs(buffer_rms(buffer));

    Ok(LoudnessMeasurement {
        integrated_lufs: rms_dbfs - LUFS_OFFSET_DB,
        rms_dbfs,
        true_peak_dbfs: to_dbfs(peak_level(buffer)),
    })
}

/// Linear gain that moves `current_lufs` to `target_lufs`
pub fn calculate_gain(current_lufs: f64, target_lufs: f64) -> f64 {
    10f64.powf((target_lufs - current_lufs) / 20.0)
}

/// Reject targets that would be inaudible or clip heavily
pub fn validate_target_loudness(target_lufs: f64) -> AudioResult<()> {
    if target_lufs > MAX_TARGET_LUFS {
        return Err(AudioError::ConfigError(format!(
            "Target loudness {:.1} LUFS is too high (risk of severe clipping)",
            target_lufs
        )));
    }

    if target_lufs < MIN_TARGET_LUFS {
        return Err(AudioError::ConfigError(format!(
            "Target loudness {:.1} LUFS is too low (audio will be very quiet)",
            target_lufs
        )));
    }

    if target_lufs.is_nan() {
        return Err(AudioError::ConfigError(
            "Target loudness must be a number".to_string(),
        ));
    }

    Ok(())
}

/// Outcome of normalizing one track
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationResult {
    /// Track label
    pub name: String,
    /// Loudness before normalization, in LUFS
    pub original_loudness: f64,
    /// Requested loudness, in LUFS
    pub target_loudness: f64,
    /// Linear gain that was applied
    pub applied_gain: f64,
    /// Applied gain in dB
    pub gain_db: f64,
    /// Whether the peak would approach full scale
    pub clipping_risk: bool,
    /// Samples clamped while applying the gain
    pub clipped_samples: usize,
}

impl fmt::Display for NormalizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1} -> {:.1} LUFS ({:+.1} dB)",
            self.name, self.original_loudness, self.target_loudness, self.gain_db
        )?;
        if self.clipping_risk {
            write!(f, " [clipping risk, {} samples clipped]", self.clipped_samples)?;
        }
        Ok(())
    }
}

/// Loudness normalization filter - moves a track to a target LUFS level
#[derive(Clone, Debug)]
pub struct Normalize {
    target_lufs: f64,
}

impl Normalize {
    /// Create a normalizer for `target_lufs`
    pub fn new(target_lufs: f64) -> AudioResult<Self> {
        validate_target_loudness(target_lufs)?;
        Ok(Normalize { target_lufs })
    }

    /// Get the target loudness in LUFS
    pub fn target_lufs(&self) -> f64 {
        self.target_lufs
    }
}

impl Filter for Normalize {
    type Report = NormalizationResult;

    fn process(&mut self, buffer: &mut SampleBuffer) -> AudioResult<NormalizationResult> {
        let unchanged = |original_loudness: f64| NormalizationResult {
            name: buffer.name().to_string(),
            original_loudness,
            target_loudness: self.target_lufs,
            applied_gain: 1.0,
            gain_db: 0.0,
            clipping_risk: false,
            clipped_samples: 0,
        };

        let measurement = if buffer.is_empty() {
            None
        } else {
            Some(measure_loudness(buffer)?)
        };

        // Digital silence has no level to scale from
        let Some(measurement) = measurement.filter(|m| m.integrated_lufs.is_finite()) else {
            warn!("{} is silent, skipping loudness normalization", buffer.name());
            return Ok(unchanged(f64::NEG_INFINITY));
        };

        let mut gain = calculate_gain(measurement.integrated_lufs, self.target_lufs);
        let mut gain_db = to_dbfs(gain);

        let clipping_risk = measurement.true_peak_dbfs + gain_db > CLIPPING_MARGIN_DB;
        if clipping_risk && gain_db > MAX_RISKY_GAIN_DB {
            warn!(
                "Limiting gain for {} from {:.1} dB to {:.1} dB to prevent severe clipping",
                buffer.name(),
                gain_db,
                MAX_RISKY_GAIN_DB
            );
            gain_db = MAX_RISKY_GAIN_DB;
            gain = 10f64.powf(gain_db / 20.0);
        }

        let report = Gain::new(gain)?.process(buffer)?;

        info!(
            "{}: {:.1} LUFS -> {:.1} LUFS ({:+.1} dB)",
            buffer.name(),
            measurement.integrated_lufs,
            self.target_lufs,
            gain_db
        );

        Ok(NormalizationResult {
            name: buffer.name().to_string(),
            original_loudness: measurement.integrated_lufs,
            target_loudness: self.target_lufs,
            applied_gain: gain,
            gain_db,
            clipping_risk,
            clipped_samples: report.clipped_samples,
        })
    }
}

/// Normalize one buffer to `target_lufs` and return the linear gain applied
pub fn normalize(buffer: &mut SampleBuffer, target_lufs: f64) -> AudioResult<f64> {
    let result = Normalize::new(target_lufs)?.process(buffer)?;
    Ok(result.applied_gain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(amplitude: i32, frames: usize) -> SampleBuffer {
        let samples = (0..frames)
            .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
            .collect();
        SampleBuffer::new(samples, 1000, 1, 16).unwrap()
    }

    #[test]
    fn test_measure_loudness() {
        // Square wave at half scale: RMS = peak = -6.02 dBFS
        let buffer = square(16384, 100);
        let m = measure_loudness(&buffer).unwrap();

        assert!((m.rms_dbfs + 6.0206).abs() < 1e-3);
        assert!((m.integrated_lufs - (m.rms_dbfs - 0.691)).abs() < 1e-12);
        assert!((m.true_peak_dbfs + 6.0206).abs() < 1e-3);
    }

    #[test]
    fn test_measure_empty_is_error() {
        let buffer = SampleBuffer::new(vec![], 1000, 1, 16).unwrap();
        assert!(measure_loudness(&buffer).is_err());
    }

    #[test]
    fn test_calculate_gain() {
        assert!((calculate_gain(-20.0, -20.0) - 1.0).abs() < 1e-12);
        assert!((calculate_gain(-36.0, -16.0) - 10.0).abs() < 1e-9);
        assert!((calculate_gain(-10.0, -16.0) - 0.501187).abs() < 1e-6);
    }

    #[test]
    fn test_validate_target_loudness() {
        assert!(validate_target_loudness(-16.0).is_ok());
        assert!(validate_target_loudness(-6.0).is_ok());
        assert!(validate_target_loudness(-30.0).is_ok());
        assert!(validate_target_loudness(-5.0).is_err());
        assert!(validate_target_loudness(-31.0).is_err());
        assert!(validate_target_loudness(f64::NAN).is_err());
        assert!(Normalize::new(0.0).is_err());
    }

    #[test]
    fn test_normalization_reaches_target() {
        // About -36.7 LUFS, peak far below full scale
        let mut buffer = square(500, 1000);
        let mut normalizer = Normalize::new(-30.0).unwrap();

        let result = normalizer.process(&mut buffer).unwrap();

        assert!(!result.clipping_risk);
        assert_eq!(result.clipped_samples, 0);
        let after = measure_loudness(&buffer).unwrap();
        assert!((after.integrated_lufs + 30.0).abs() < 0.05);
    }

    #[test]
    fn test_attenuation() {
        let mut buffer = square(30000, 1000);
        let result = Normalize::new(-16.0).unwrap().process(&mut buffer).unwrap();

        assert!(result.gain_db < 0.0);
        assert!(!result.clipping_risk);
        let after = measure_loudness(&buffer).unwrap();
        assert!((after.integrated_lufs + 16.0).abs() < 0.05);
    }

    #[test]
    fn test_risky_gain_is_limited() {
        // Quiet body with one full-scale spike: large boost would clip
        let mut samples = vec![100; 1000];
        samples[0] = 32000;
        let mut buffer = SampleBuffer::new(samples, 1000, 1, 16).unwrap();

        let result = Normalize::new(-16.0).unwrap().process(&mut buffer).unwrap();

        assert!(result.clipping_risk);
        assert!((result.gain_db - 6.0).abs() < 1e-9);
        assert!((result.applied_gain - 1.995262).abs() < 1e-6);
        assert_eq!(buffer.samples()[1], 199);
        assert_eq!(buffer.samples()[0], 32767);
        assert_eq!(result.clipped_samples, 1);
    }

    #[test]
    fn test_silent_track_is_untouched() {
        let mut buffer = SampleBuffer::new(vec![0; 100], 1000, 1, 16).unwrap();
        let result = Normalize::new(-16.0).unwrap().process(&mut buffer).unwrap();

        assert_eq!(result.applied_gain, 1.0);
        assert_eq!(buffer.samples(), &[0; 100][..]);

        let mut empty = SampleBuffer::new(vec![], 1000, 1, 16).unwrap();
        assert!(Normalize::new(-16.0).unwrap().process(&mut empty).is_ok());
    }

    #[test]
    fn test_normalize_returns_gain() {
        let mut buffer = square(500, 1000);
        let gain = normalize(&mut buffer, -30.0).unwrap();

        assert!(gain > 1.0);
        assert_eq!(buffer.samples()[0], (500.0 * gain) as i32);
        assert!(normalize(&mut buffer, -3.0).is_err());
    }
}
