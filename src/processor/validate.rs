use crate::core::{PcmFormat, SampleBuffer};
use crate::error::{AudioError, AudioResult};
use log::{debug, warn};

/// Duration difference above which tracks are reported as skewed, in seconds
pub const DURATION_SKEW_WARNING_SECS: f64 = 1.0;

/// Check that every track can be analyzed against the first one.
///
/// Sample rate and channel count must match exactly. Durations may differ;
/// a large difference is only logged. Returns the shared format of the
/// first track.
pub fn validate_compatible(buffers: &[SampleBuffer]) -> AudioResult<PcmFormat> {
    let reference = buffers
        .first()
        .ok_or_else(|| AudioError::ConfigError("No audio tracks provided".to_string()))?;

    for buffer in &buffers[1..] {
        if buffer.sample_rate() != reference.sample_rate() {
            return Err(AudioError::FormatMismatch {
                what: "sample rate",
                reference: reference.name().to_string(),
                reference_value: reference.sample_rate(),
                file: buffer.name().to_string(),
                value: buffer.sample_rate(),
            });
        }

        if buffer.channels() != reference.channels() {
            return Err(AudioError::FormatMismatch {
                what: "channel count",
                reference: reference.name().to_string(),
                reference_value: reference.channels() as u32,
                file: buffer.name().to_string(),
                value: buffer.channels() as u32,
            });
        }

        let skew = (buffer.duration_secs() - reference.duration_secs()).abs();
        if skew > DURATION_SKEW_WARNING_SECS {
            warn!(
                "{} ({:.2}s) differs from {} ({:.2}s) by {:.2}s; only the common length is analyzed",
                buffer.name(),
                buffer.duration_secs(),
                reference.name(),
                reference.duration_secs(),
                skew
            );
        }

        debug!(
            "Validated {} ({:.2}s, {} Hz, {} ch)",
            buffer.name(),
            buffer.duration_secs(),
            buffer.sample_rate(),
            buffer.channels()
        );
    }

    Ok(reference.format())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(name: &str, frames: usize, rate: u32, channels: u16) -> SampleBuffer {
        SampleBuffer::new(vec![0; frames * channels as usize], rate, channels, 16)
            .unwrap()
            .with_name(name)
    }

    #[test]
    fn test_compatible_tracks() {
        let buffers = vec![
            buffer("a.wav", 1000, 1000, 2),
            buffer("b.wav", 1000, 1000, 2),
        ];
        let format = validate_compatible(&buffers).unwrap();
        assert_eq!(format.sample_rate, 1000);
        assert_eq!(format.channels, 2);
        assert_eq!(format.bit_depth, 16);
    }

    #[test]
    fn test_single_track() {
        assert!(validate_compatible(&[buffer("solo.wav", 10, 48000, 1)]).is_ok());
    }

    #[test]
    fn test_no_tracks() {
        assert!(matches!(
            validate_compatible(&[]),
            Err(AudioError::ConfigError(_))
        ));
    }

    #[test]
    fn test_sample_rate_mismatch() {
        let buffers = vec![buffer("a.wav", 10, 48000, 1), buffer("b.wav", 10, 44100, 1)];
        match validate_compatible(&buffers) {
            Err(AudioError::FormatMismatch { what, file, value, .. }) => {
                assert_eq!(what, "sample rate");
                assert_eq!(file, "b.wav");
                assert_eq!(value, 44100);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_channel_mismatch() {
        let buffers = vec![buffer("a.wav", 10, 48000, 2), buffer("b.wav", 10, 48000, 1)];
        let err = validate_compatible(&buffers).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_duration_skew_is_not_an_error() {
        let buffers = vec![
            buffer("a.wav", 1000, 1000, 1),
            buffer("b.wav", 5000, 1000, 1),
        ];
        assert!(validate_compatible(&buffers).is_ok());
    }
}
