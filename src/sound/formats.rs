//! Container and sample format definitions
//!
//! Layout constants for the BGW/SPW container family and the enums that
//! classify a parsed file.

/// Fixed leader before the audio payload, for every container variant.
pub const LEADER_SIZE: u64 = 0x30;

/// Size of the synthetic RIFF/WAVE header.
pub const WAV_HEADER_SIZE: usize = 0x2C;

/// Marker at the start of a sound effect (`.spw`) file.
pub const SE_MARKER: &[u8; 8] = b"SeWave\0\0";

/// Marker at the start of a music stream (`.bgw`) file.
pub const BGM_MARKER: &[u8; 12] = b"BGMStream\0\0\0";

/// Output sample width. Both decoders produce 16-bit PCM.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Container kind, detected from the magic marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerVariant {
    /// Marker did not match, or the header could not be read
    #[default]
    Unknown,
    /// `BGMStream` music file
    BgmStream,
    /// `SeWave` sound effect file
    SoundEffect,
}

impl ContainerVariant {
    /// Returns the marker bytes written at the start of the file
    pub fn marker(&self) -> Option<&'static [u8]> {
        match self {
            ContainerVariant::Unknown => None,
            ContainerVariant::BgmStream => Some(BGM_MARKER),
            ContainerVariant::SoundEffect => Some(SE_MARKER),
        }
    }
}

/// Sample encoding stored in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Block ADPCM, decoded by [`AdpcmCodec`](super::adpcm::AdpcmCodec)
    Adpcm,
    /// 16-bit little-endian PCM
    Pcm,
    /// Sony ATRAC3, recognized but never played
    Atrac3,
    /// Any other raw value, kept so the header round-trips
    Other(u32),
}

impl SampleFormat {
    /// Decode the raw header value
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => SampleFormat::Adpcm,
            1 => SampleFormat::Pcm,
            3 => SampleFormat::Atrac3,
            other => SampleFormat::Other(other),
        }
    }

    /// Returns the raw header value
    pub fn as_raw(&self) -> u32 {
        match self {
            SampleFormat::Adpcm => 0,
            SampleFormat::Pcm => 1,
            SampleFormat::Atrac3 => 3,
            SampleFormat::Other(raw) => *raw,
        }
    }

    /// Returns true if the streaming reader can decode this format
    pub fn is_supported(&self) -> bool {
        matches!(self, SampleFormat::Adpcm | SampleFormat::Pcm)
    }
}

impl Default for SampleFormat {
    fn default() -> Self {
        SampleFormat::Adpcm
    }
}

impl std::fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleFormat::Adpcm => write!(f, "ADPCM"),
            SampleFormat::Pcm => write!(f, "PCM"),
            SampleFormat::Atrac3 => write!(f, "ATRAC3"),
            SampleFormat::Other(raw) => write!(f, "unknown ({})", raw),
        }
    }
}
