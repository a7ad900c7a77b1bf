//! Run configuration and output naming

use crate::error::{AudioError, AudioResult};
use crate::filter::validate_target_loudness;
use crate::processor::DetectionConfig;
use std::path::{Path, PathBuf};

/// Settings for one batch run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Synchronized WAV recordings to process
    pub input_files: Vec<PathBuf>,
    /// Appended to each input's file stem to name its output
    pub output_suffix: String,
    /// Normalization target in LUFS
    pub target_loudness: f64,
    /// Silence threshold in dBFS
    pub silence_threshold: f64,
    /// Shortest common silence worth cutting, in milliseconds
    pub min_silence_ms: u32,
    /// Silence left in place of each cut region, in milliseconds
    pub keep_silence_ms: u32,
    /// Analysis window length, in milliseconds
    pub chunk_size_ms: u32,
    /// Collect per-track content statistics
    pub debug_info: bool,
    /// Copy inputs to outputs without processing
    pub test_copy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_files: Vec::new(),
            output_suffix: "_edited".to_string(),
            target_loudness: -16.0,
            silence_threshold: -50.0,
            min_silence_ms: 500,
            keep_silence_ms: 250,
            chunk_size_ms: 10,
            debug_info: false,
            test_copy: false,
        }
    }
}

impl Config {
    /// Create a default config for the given inputs
    pub fn with_inputs<I, P>(inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Config {
            input_files: inputs.into_iter().map(Into::into).collect(),
            ..Config::default()
        }
    }

    /// Check parameters and input files before anything is loaded
    pub fn validate(&self) -> AudioResult<()> {
        if self.input_files.is_empty() {
            return Err(AudioError::ConfigError("No input files specified".to_string()));
        }

        self.detection_config()?;
        validate_target_loudness(self.target_loudness)?;

        for file in &self.input_files {
            if !file.exists() {
                return Err(AudioError::ConfigError(format!(
                    "Input file not found: {}",
                    file.display()
                )));
            }

            let is_wav = file
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
            if !is_wav {
                return Err(AudioError::ConfigError(format!(
                    "Input file must be a WAV file: {}",
                    file.display()
                )));
            }
        }

        Ok(())
    }

    /// Detection parameters derived from this config
    pub fn detection_config(&self) -> AudioResult<DetectionConfig> {
        DetectionConfig::new(
            self.silence_threshold,
            self.min_silence_ms,
            self.chunk_size_ms,
        )
    }

    /// Output paths for every input, in input order
    pub fn output_files(&self) -> Vec<PathBuf> {
        self.input_files
            .iter()
            .map(|input| output_path(input, &self.output_suffix))
            .collect()
    }
}

/// `<dir>/<stem><suffix><.ext>` for an input file
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = format!("{}{}", stem, suffix);
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }

    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output_suffix, "_edited");
        assert_eq!(config.target_loudness, -16.0);
        assert_eq!(config.silence_threshold, -50.0);
        assert_eq!(config.min_silence_ms, 500);
        assert_eq!(config.keep_silence_ms, 250);
        assert_eq!(config.chunk_size_ms, 10);
        assert!(!config.debug_info);
        assert!(!config.test_copy);
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/takes/host.wav"), "_edited"),
            PathBuf::from("/takes/host_edited.wav")
        );
        assert_eq!(
            output_path(Path::new("guest.WAV"), "-cut"),
            PathBuf::from("guest-cut.WAV")
        );
        assert_eq!(
            output_path(Path::new("dir/take.1.wav"), "_x"),
            PathBuf::from("dir/take.1_x.wav")
        );
    }

    #[test]
    fn test_validate_requires_inputs() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_validate_input_files() {
        let dir = TempDir::new().unwrap();
        let wav = dir.path().join("host.WAV");
        let mp3 = dir.path().join("host.mp3");
        std::fs::write(&wav, b"").unwrap();
        std::fs::write(&mp3, b"").unwrap();

        assert!(Config::with_inputs([&wav]).validate().is_ok());
        assert!(Config::with_inputs([&mp3]).validate().is_err());
        assert!(Config::with_inputs([dir.path().join("missing.wav")])
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_parameters() {
        let dir = TempDir::new().unwrap();
        let wav = dir.path().join("host.wav");
        std::fs::write(&wav, b"").unwrap();
        let base = Config::with_inputs([&wav]);

        let bad = [
            Config {
                silence_threshold: -130.0,
                ..base.clone()
            },
            Config {
                silence_threshold: 3.0,
                ..base.clone()
            },
            Config {
                min_silence_ms: 0,
                ..base.clone()
            },
            Config {
                chunk_size_ms: 0,
                ..base.clone()
            },
            Config {
                target_loudness: -3.0,
                ..base.clone()
            },
            Config {
                target_loudness: -40.0,
                ..base.clone()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }

        // Keeping no silence at all is allowed
        let keep_none = Config {
            keep_silence_ms: 0,
            ..base
        };
        assert!(keep_none.validate().is_ok());
    }

    #[test]
    fn test_output_files() {
        let config = Config::with_inputs(["a/host.wav", "a/guest.wav"]);
        assert_eq!(
            config.output_files(),
            vec![PathBuf::from("a/host_edited.wav"), PathBuf::from("a/guest_edited.wav")]
        );
    }
}
