use crate::core::PcmFormat;
use crate::error::{AudioError, AudioResult};
use log::warn;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

/// Symphonia-based integer PCM decoder
pub struct SymphoniaDecoder {
    /// Current reader for the audio source
    reader: Box<dyn FormatReader>,
    /// Track information
    track_id: u32,
    /// Format of the decoded samples
    format: PcmFormat,
    /// Blocks decoded so far
    block_count: u64,
    /// Whether decoding is finished
    finished: bool,
    /// Current decoder state
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
}

impl SymphoniaDecoder {
    /// Create decoder from file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> AudioResult<Self> {
        let path = path.as_ref();

        let file = Box::new(File::open(path)?);
        let mss = MediaSourceStream::new(file, Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;

        let reader = probed.format;

        // Find the first audio track
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::InvalidMetadata("No audio track found".to_string()))?
            .clone();

        let codec_params = &track.codec_params;

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| AudioError::InvalidMetadata("Unknown sample rate".to_string()))?;

        let channels = codec_params
            .channels
            .map(|c| c.count() as u16)
            .ok_or_else(|| AudioError::InvalidMetadata("Unknown channel count".to_string()))?;

        let bit_depth = match codec_params.bits_per_sample {
            Some(bits @ (16 | 24 | 32)) => bits as u16,
            Some(bits) => {
                return Err(AudioError::UnsupportedFormat(format!(
                    "{}-bit samples (expected 16, 24 or 32-bit integer PCM)",
                    bits
                )));
            }
            None => {
                return Err(AudioError::InvalidMetadata("Unknown bit depth".to_string()));
            }
        };

        let decoder = symphonia::default::get_codecs()
            .make(codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::DecodeError(e.to_string()))?;

        Ok(SymphoniaDecoder {
            reader,
            track_id: track.id,
            format: PcmFormat {
                sample_rate,
                channels,
                bit_depth,
            },
            block_count: 0,
            finished: false,
            decoder,
        })
    }

    /// Number of blocks decoded so far
    pub fn block_count(&self) -> u64 {
        self.block_count
    }

    /// Interleave planar channels into one vector
    fn interleave<S, F>(buf: &AudioBuffer<S>, convert: F) -> Vec<i32>
    where
        S: Sample,
        F: Fn(S) -> i32,
    {
        let channels = buf.spec().channels.count();
        let frames = buf.frames();
        let mut samples = Vec::with_capacity(frames * channels);

        for frame in 0..frames {
            for ch in 0..channels {
                samples.push(convert(buf.chan(ch)[frame]));
            }
        }

        samples
    }

    /// Convert a decoded block to raw integer samples without rescaling
    fn convert(decoded: AudioBufferRef<'_>) -> AudioResult<Vec<i32>> {
        match decoded {
            AudioBufferRef::S16(buf) => Ok(Self::interleave(&buf, |s| s as i32)),
            AudioBufferRef::S24(buf) => Ok(Self::interleave(&buf, |s| s.inner())),
            AudioBufferRef::S32(buf) => Ok(Self::interleave(&buf, |s| s)),
            _ => Err(AudioError::UnsupportedFormat(
                "Only 16, 24 and 32-bit integer PCM is supported".to_string(),
            )),
        }
    }
}

impl super::Decoder for SymphoniaDecoder {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn decode_block(&mut self) -> AudioResult<Option<Vec<i32>>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    self.finished = true;
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            };

            // Only process packets from our audio track
            if packet.track_id() != self.track_id {
                continue;
            }

            let samples = match self.decoder.decode(&packet) {
                Ok(decoded) => Self::convert(decoded)?,
                Err(symphonia::core::errors::Error::DecodeError(msg)) => {
                    warn!("Skipping undecodable packet: {}", msg);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if samples.is_empty() {
                continue;
            }

            self.block_count += 1;
            return Ok(Some(samples));
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tempfile::NamedTempFile;

    fn write_wav(path: &Path, bits: u16, channels: u16, samples: &[i32]) {
        let spec = WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: bits,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn wav_file() -> NamedTempFile {
        tempfile::Builder::new().suffix(".wav").tempfile().unwrap()
    }

    #[test]
    fn test_invalid_file() {
        let result = SymphoniaDecoder::from_file("/nonexistent/file.wav");
        assert!(matches!(result, Err(AudioError::Io(_))));
    }

    #[test]
    fn test_decode_16_bit_stereo() {
        let file = wav_file();
        let samples = vec![0, 1, -1, 32767, -32768, 1234];
        write_wav(file.path(), 16, 2, &samples);

        let mut decoder = SymphoniaDecoder::from_file(file.path()).unwrap();
        let format = decoder.format();
        assert_eq!(format.sample_rate, 8000);
        assert_eq!(format.channels, 2);
        assert_eq!(format.bit_depth, 16);

        let buffer = decoder.decode_all().unwrap();
        assert_eq!(buffer.samples(), samples.as_slice());
        assert!(decoder.is_finished());
        assert!(decoder.block_count() >= 1);
    }

    #[test]
    fn test_decode_24_bit_keeps_raw_values() {
        let file = wav_file();
        let samples = vec![8388607, -8388608, 42, -42];
        write_wav(file.path(), 24, 1, &samples);

        let mut decoder = SymphoniaDecoder::from_file(file.path()).unwrap();
        let buffer = decoder.decode_all().unwrap();

        assert_eq!(buffer.bit_depth(), 24);
        assert_eq!(buffer.samples(), samples.as_slice());
    }

    #[test]
    fn test_8_bit_is_unsupported() {
        let file = wav_file();
        write_wav(file.path(), 8, 1, &[0, 10, -10]);

        let result = SymphoniaDecoder::from_file(file.path());
        assert!(matches!(result, Err(AudioError::UnsupportedFormat(_))));
    }
}
