//! Recorded / synthesised audio clips and pre-upload validation.
//!
//! [`AudioClip`] is an opaque byte buffer plus its declared
//! [`AudioEncoding`].  Before a clip is sent to the recognition service,
//! [`ClipValidator`] checks it locally:
//!
//! | Check | Error |
//! |-------|-------|
//! | Buffer is non-empty | [`ClipError::Empty`] |
//! | WAV header and sample data decode | [`ClipError::Malformed`] |
//! | Audio payload ≥ `min_payload_bytes` | [`ClipError::TooShort`] |

use std::io::Cursor;
use std::path::Path;

use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioEncoding
// ---------------------------------------------------------------------------

/// Declared container/codec of an [`AudioClip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEncoding {
    /// RIFF/WAVE PCM, as produced by browser and microphone recorders.
    Wav,
    /// MPEG-1 layer III, as produced by the speech synthesiser.
    Mp3,
}

impl AudioEncoding {
    pub fn mime_type(self) -> &'static str {
        match self {
            AudioEncoding::Wav => "audio/wav",
            AudioEncoding::Mp3 => "audio/mpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioEncoding::Wav => "wav",
            AudioEncoding::Mp3 => "mp3",
        }
    }

    /// Guess the encoding from a file extension (`None` when unknown).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wav" | "wave" => Some(AudioEncoding::Wav),
            "mp3" => Some(AudioEncoding::Mp3),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioClip
// ---------------------------------------------------------------------------

/// An owned audio buffer with its declared encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub encoding: AudioEncoding,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, encoding: AudioEncoding) -> Self {
        Self { bytes, encoding }
    }

    pub fn wav(bytes: Vec<u8>) -> Self {
        Self::new(bytes, AudioEncoding::Wav)
    }

    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self::new(bytes, AudioEncoding::Mp3)
    }

    /// Encode 16-bit mono PCM samples as an in-memory WAV clip.
    pub fn from_pcm16(samples: &[i16], sample_rate: u32) -> Result<Self, ClipError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| ClipError::Malformed(e.to_string()))?;
            for &s in samples {
                writer
                    .write_sample(s)
                    .map_err(|e| ClipError::Malformed(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| ClipError::Malformed(e.to_string()))?;
        }
        Ok(Self::wav(cursor.into_inner()))
    }

    /// Read a clip from disk, inferring the encoding from the extension
    /// (WAV when the extension is unknown).
    pub fn read_from(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let encoding = AudioEncoding::from_path(path).unwrap_or(AudioEncoding::Wav);
        Ok(Self::new(bytes, encoding))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ClipError
// ---------------------------------------------------------------------------

/// Reason a clip failed local validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClipError {
    /// Zero-length buffer.
    #[error("no audio data received")]
    Empty,

    /// The clip decoded but carries too little audio to hold speech.
    #[error("audio is too short: {got_bytes} bytes of audio (minimum {min_bytes})")]
    TooShort { got_bytes: usize, min_bytes: usize },

    /// The bytes do not decode as the declared encoding.
    #[error("audio could not be decoded: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// ClipValidator
// ---------------------------------------------------------------------------

/// Validates a clip before transcription.
#[derive(Debug, Clone)]
pub struct ClipValidator {
    /// Minimum audio payload in bytes (PCM data for WAV, whole file for
    /// compressed clips).  Default: `1000`.
    pub min_payload_bytes: usize,
}

impl Default for ClipValidator {
    fn default() -> Self {
        Self {
            min_payload_bytes: 1000,
        }
    }
}

/// Facts about a clip that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    pub payload_bytes: usize,
    /// Duration in seconds; `None` for compressed clips (not decoded).
    pub duration_secs: Option<f32>,
}

impl ClipValidator {
    pub fn new(min_payload_bytes: usize) -> Self {
        Self { min_payload_bytes }
    }

    /// Validate `clip`, returning what was learnt about it.
    ///
    /// Checks run in order: empty → decode (WAV only) → payload length.
    pub fn validate(&self, clip: &AudioClip) -> Result<ClipInfo, ClipError> {
        if clip.is_empty() {
            return Err(ClipError::Empty);
        }

        let info = match clip.encoding {
            AudioEncoding::Wav => Self::inspect_wav(&clip.bytes)?,
            AudioEncoding::Mp3 => ClipInfo {
                payload_bytes: clip.len(),
                duration_secs: None,
            },
        };

        if info.payload_bytes < self.min_payload_bytes {
            return Err(ClipError::TooShort {
                got_bytes: info.payload_bytes,
                min_bytes: self.min_payload_bytes,
            });
        }

        Ok(info)
    }

    fn inspect_wav(bytes: &[u8]) -> Result<ClipInfo, ClipError> {
        let reader = hound::WavReader::new(Cursor::new(bytes))
            .map_err(|e| ClipError::Malformed(e.to_string()))?;
        let spec = reader.spec();
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(ClipError::Malformed(format!(
                "invalid WAV format: {} channel(s) at {} Hz",
                spec.channels, spec.sample_rate
            )));
        }

        let bytes_per_sample = usize::from(spec.bits_per_sample).div_ceil(8);
        let payload_bytes = reader.len() as usize * bytes_per_sample;
        let duration_secs = reader.duration() as f32 / spec.sample_rate as f32;

        Ok(ClipInfo {
            payload_bytes,
            duration_secs: Some(duration_secs),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_clip_is_rejected() {
        let v = ClipValidator::default();
        assert_eq!(v.validate(&AudioClip::wav(Vec::new())), Err(ClipError::Empty));
        assert_eq!(v.validate(&AudioClip::mp3(Vec::new())), Err(ClipError::Empty));
    }

    #[test]
    fn garbage_wav_is_malformed() {
        let v = ClipValidator::default();
        let clip = AudioClip::wav(vec![0x42; 4096]);
        assert!(matches!(v.validate(&clip), Err(ClipError::Malformed(_))));
    }

    #[test]
    fn short_wav_is_too_short() {
        let v = ClipValidator::default();
        // 100 samples × 2 bytes = 200 bytes of PCM.
        let clip = AudioClip::from_pcm16(&[0; 100], 16_000).unwrap();
        assert!(matches!(
            v.validate(&clip),
            Err(ClipError::TooShort { got_bytes: 200, min_bytes: 1000 })
        ));
    }

    #[test]
    fn one_second_wav_passes_with_duration() {
        let v = ClipValidator::default();
        let clip = AudioClip::from_pcm16(&vec![100; 16_000], 16_000).unwrap();
        let info = v.validate(&clip).unwrap();
        assert_eq!(info.payload_bytes, 32_000);
        let secs = info.duration_secs.unwrap();
        assert!((secs - 1.0).abs() < 1e-6);
    }

    #[test]
    fn compressed_clip_checks_byte_length_only() {
        let v = ClipValidator::default();
        assert!(v.validate(&AudioClip::mp3(vec![0xFF; 999])).is_err());
        let info = v.validate(&AudioClip::mp3(vec![0xFF; 1000])).unwrap();
        assert_eq!(info.duration_secs, None);
    }

    #[test]
    fn encoding_from_extension() {
        assert_eq!(AudioEncoding::from_path(Path::new("a.WAV")), Some(AudioEncoding::Wav));
        assert_eq!(AudioEncoding::from_path(Path::new("a.mp3")), Some(AudioEncoding::Mp3));
        assert_eq!(AudioEncoding::from_path(Path::new("a.ogg")), None);
        assert_eq!(AudioEncoding::Mp3.mime_type(), "audio/mpeg");
    }

    #[test]
    fn read_from_disk_infers_encoding() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("answer.mp3");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let clip = AudioClip::read_from(&path).unwrap();
        assert_eq!(clip.encoding, AudioEncoding::Mp3);
        assert_eq!(clip.len(), 3);
    }
}
