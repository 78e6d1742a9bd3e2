//! Audio output format enumeration.

use serde::{Deserialize, Serialize};

/// Container/codec for the synthesized audio.
///
/// # Examples
///
/// ```
/// use vocetta_core::AudioFormat;
/// use std::str::FromStr;
///
/// let format = AudioFormat::from_str("opus").unwrap();
/// assert_eq!(format.mime_type(), "audio/opus");
/// assert_eq!(AudioFormat::default(), AudioFormat::Mp3);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MPEG audio layer III
    #[display("mp3")]
    Mp3,
    /// Waveform audio
    #[display("wav")]
    Wav,
    /// Opus codec
    #[display("opus")]
    Opus,
    /// Advanced audio coding
    #[display("aac")]
    Aac,
    /// Free lossless audio codec
    #[display("flac")]
    Flac,
    /// Raw 16-bit PCM samples
    #[display("pcm")]
    Pcm,
}

impl AudioFormat {
    /// Convert to the wire identifier sent upstream.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Opus => "opus",
            AudioFormat::Aac => "aac",
            AudioFormat::Flac => "flac",
            AudioFormat::Pcm => "pcm",
        }
    }

    /// MIME type for the response `Content-Type` header.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Opus => "audio/opus",
            AudioFormat::Aac => "audio/aac",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Pcm => "audio/pcm",
        }
    }

    /// File extension used in generated filenames.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        AudioFormat::Mp3
    }
}

impl std::str::FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mp3" => Ok(AudioFormat::Mp3),
            "wav" => Ok(AudioFormat::Wav),
            "opus" => Ok(AudioFormat::Opus),
            "aac" => Ok(AudioFormat::Aac),
            "flac" => Ok(AudioFormat::Flac),
            "pcm" => Ok(AudioFormat::Pcm),
            _ => Err(format!("Unknown audio format: {}", s)),
        }
    }
}
