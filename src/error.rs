use std::io;
use thiserror::Error;

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;

/// Error types for loading, processing and writing tracks
#[derive(Error, Debug)]
pub enum AudioError {
    /// IO error (file operations, disk access)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported audio format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Invalid audio metadata
    #[error("Invalid audio metadata: {0}")]
    InvalidMetadata(String),

    /// Decoding failed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Encoding failed
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// Invalid sample rate
    #[error("Invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate
        rate: u32,
    },

    /// Buffer-related error
    #[error("Buffer error: {0}")]
    BufferError(String),

    /// Two tracks that must share a format do not
    #[error("{what} mismatch: {file} ({value}) vs {reference} ({reference_value})")]
    FormatMismatch {
        /// Which property differs (e.g. "sample rate")
        what: &'static str,
        /// Name of the reference track
        reference: String,
        /// Value of the property in the reference track
        reference_value: u32,
        /// Name of the offending track
        file: String,
        /// Value of the property in the offending track
        value: u32,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Audio processing error
    #[error("Processing error: {0}")]
    ProcessingError(String),
}

impl AudioError {
    /// Whether this error belongs to the fatal configuration family
    /// (bad parameters, no inputs, incompatible formats).
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            AudioError::ConfigError(_)
                | AudioError::FormatMismatch { .. }
                | AudioError::InvalidSampleRate { .. }
        )
    }
}

impl From<symphonia::core::errors::Error> for AudioError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        match err {
            symphonia::core::errors::Error::IoError(e) => AudioError::Io(e),
            symphonia::core::errors::Error::Unsupported(what) => {
                AudioError::UnsupportedFormat(what.to_string())
            }
            e => AudioError::DecodeError(e.to_string()),
        }
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => AudioError::Io(e),
            e => AudioError::EncodeError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_family() {
        assert!(AudioError::ConfigError("no inputs".to_string()).is_configuration_error());
        assert!(AudioError::InvalidSampleRate { rate: 0 }.is_configuration_error());
        assert!(
            AudioError::FormatMismatch {
                what: "sample rate",
                reference: "a.wav".to_string(),
                reference_value: 48000,
                file: "b.wav".to_string(),
                value: 44100,
            }
            .is_configuration_error()
        );
        assert!(!AudioError::DecodeError("bad packet".to_string()).is_configuration_error());
    }

    #[test]
    fn test_mismatch_message() {
        let err = AudioError::FormatMismatch {
            what: "channel count",
            reference: "host.wav".to_string(),
            reference_value: 2,
            file: "guest.wav".to_string(),
            value: 1,
        };
        assert_eq!(
            err.to_string(),
            "channel count mismatch: guest.wav (1) vs host.wav (2)"
        );
    }
}
