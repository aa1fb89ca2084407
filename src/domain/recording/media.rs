//! Audio formats accepted for transcription upload

use std::fmt;
use std::path::Path;

/// Audio container formats the transcription service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Mp4,
    M4a,
    Wav,
    ThreeGp,
    Aac,
}

/// All accepted formats, in display order
pub const ALL_FORMATS: [AudioFormat; 6] = [
    AudioFormat::Mp3,
    AudioFormat::Mp4,
    AudioFormat::M4a,
    AudioFormat::Wav,
    AudioFormat::ThreeGp,
    AudioFormat::Aac,
];

impl AudioFormat {
    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
            Self::M4a => "m4a",
            Self::Wav => "wav",
            Self::ThreeGp => "3gp",
            Self::Aac => "aac",
        }
    }

    /// Get the MIME type string
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Mp4 | Self::M4a => "audio/mp4",
            Self::Wav => "audio/wav",
            Self::ThreeGp => "audio/3gpp",
            Self::Aac => "audio/aac",
        }
    }

    /// Look up a format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "mp4" => Some(Self::Mp4),
            "m4a" => Some(Self::M4a),
            "wav" => Some(Self::Wav),
            "3gp" => Some(Self::ThreeGp),
            "aac" => Some(Self::Aac),
            _ => None,
        }
    }

    /// Look up a format from a file path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
