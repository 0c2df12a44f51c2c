//! BGW/SPW header parser
//!
//! Both container variants share a 0x30-byte leader:
//!
//! ```text
//! SeWave (.spw)                      BGMStream (.bgw)
//! [8]  "SeWave\0\0"                  [12] "BGMStream\0\0\0"
//! [4]  size                          [4]  sample format
//! [4]  sample format                 [4]  size
//! [4]  id                            [4]  id
//! [4]  sample blocks                 [4]  sample blocks
//! [4]  loop start (<0 = off)         [4]  loop start
//! [4]  sample rate (high part)       [4]  sample rate (high part)
//! [4]  sample rate (low part)        [4]  sample rate (low part)
//! [4]  reserved                      [4]  reserved
//! [1]  reserved  [1] reserved        [1]  reserved  [1] reserved
//! [1]  channels  [1] block size      [1]  channels  [1] block size
//! [4]  reserved
//! ```
//!
//! All integers are little-endian.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use super::decoder::{DecodeError, DecodeResult};
use super::formats::{ContainerVariant, SampleFormat, BGM_MARKER, LEADER_SIZE, SE_MARKER};
use super::stream::{AudioStream, StreamOptions};

/// Maximum channel count the container allows.
pub const MAX_CHANNELS: u8 = 6;

/// Distance from an integer within which `seconds_to_samples` snaps to it.
const SAMPLE_SNAP_EPSILON: f64 = 1e-6;

/// Fixed header fields of a BGW/SPW file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioHeader {
    /// Total file size in bytes, as stored
    pub size: i32,
    pub sample_format: SampleFormat,
    /// Track id
    pub id: i32,
    /// Sample count; ADPCM counts compressed blocks
    pub sample_blocks: i32,
    /// Loop point in the same unit as `sample_blocks`; negative if not looped
    pub loop_start: i32,
    pub sample_rate_high: i32,
    pub sample_rate_low: i32,
    pub reserved1: i32,
    pub reserved2: u8,
    pub reserved3: u8,
    pub channels: u8,
    /// Decoded samples per channel in one ADPCM block
    pub block_size: u8,
    /// Trailing reserved field; always 0 for BGMStream
    pub reserved4: i32,
}

impl AudioHeader {
    /// Parse the header from the start of a file.
    ///
    /// Reads exactly the bytes the detected variant needs; an unmatched
    /// marker stops after the marker.
    pub fn read_from<R: Read>(reader: &mut R) -> DecodeResult<(ContainerVariant, AudioHeader)> {
        let variant = detect_variant(reader)?;
        let mut header = AudioHeader::default();

        match variant {
            ContainerVariant::SoundEffect => {
                header.size = reader.read_i32::<LittleEndian>()?;
                header.sample_format = SampleFormat::from_raw(reader.read_u32::<LittleEndian>()?);
            }
            ContainerVariant::BgmStream => {
                header.sample_format = SampleFormat::from_raw(reader.read_u32::<LittleEndian>()?);
                header.size = reader.read_i32::<LittleEndian>()?;
            }
            ContainerVariant::Unknown => return Err(DecodeError::UnrecognizedContainer),
        }

        header.id = reader.read_i32::<LittleEndian>()?;
        header.sample_blocks = reader.read_i32::<LittleEndian>()?;
        header.loop_start = reader.read_i32::<LittleEndian>()?;
        header.sample_rate_high = reader.read_i32::<LittleEndian>()?;
        header.sample_rate_low = reader.read_i32::<LittleEndian>()?;
        header.reserved1 = reader.read_i32::<LittleEndian>()?;
        header.reserved2 = reader.read_u8()?;
        header.reserved3 = reader.read_u8()?;
        header.channels = reader.read_u8()?;
        header.block_size = reader.read_u8()?;

        header.reserved4 = match variant {
            ContainerVariant::SoundEffect => reader.read_i32::<LittleEndian>()?,
            _ => 0,
        };

        header.validate()?;
        Ok((variant, header))
    }

    /// Write the header in the layout of `variant`.
    ///
    /// `reserved4` is only written for sound effects.
    pub fn write_to<W: Write>(&self, variant: ContainerVariant, writer: &mut W) -> DecodeResult<()> {
        let marker = variant.marker().ok_or(DecodeError::UnrecognizedContainer)?;
        writer.write_all(marker)?;

        match variant {
            ContainerVariant::SoundEffect => {
                writer.write_i32::<LittleEndian>(self.size)?;
                writer.write_u32::<LittleEndian>(self.sample_format.as_raw())?;
            }
            _ => {
                writer.write_u32::<LittleEndian>(self.sample_format.as_raw())?;
                writer.write_i32::<LittleEndian>(self.size)?;
            }
        }

        writer.write_i32::<LittleEndian>(self.id)?;
        writer.write_i32::<LittleEndian>(self.sample_blocks)?;
        writer.write_i32::<LittleEndian>(self.loop_start)?;
        writer.write_i32::<LittleEndian>(self.sample_rate_high)?;
        writer.write_i32::<LittleEndian>(self.sample_rate_low)?;
        writer.write_i32::<LittleEndian>(self.reserved1)?;
        writer.write_u8(self.reserved2)?;
        writer.write_u8(self.reserved3)?;
        writer.write_u8(self.channels)?;
        writer.write_u8(self.block_size)?;

        if variant == ContainerVariant::SoundEffect {
            writer.write_i32::<LittleEndian>(self.reserved4)?;
        }
        Ok(())
    }

    /// Serialize into a buffer of exactly `LEADER_SIZE` bytes
    pub fn to_bytes(&self, variant: ContainerVariant) -> DecodeResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(LEADER_SIZE as usize);
        self.write_to(variant, &mut bytes)?;
        Ok(bytes)
    }

    /// Check the field invariants the decoders rely on
    pub fn validate(&self) -> DecodeResult<()> {
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(DecodeError::InvalidHeader(format!(
                "channel count {} outside 1-{}",
                self.channels, MAX_CHANNELS
            )));
        }
        if self.sample_format == SampleFormat::Adpcm
            && (self.block_size == 0 || self.block_size % 2 != 0)
        {
            return Err(DecodeError::InvalidHeader(format!(
                "ADPCM block size {} must be even and non-zero",
                self.block_size
            )));
        }
        if self.sample_format.is_supported() && self.sample_rate() <= 0 {
            return Err(DecodeError::InvalidHeader(format!(
                "sample rate {} + {} is not positive",
                self.sample_rate_high, self.sample_rate_low
            )));
        }
        Ok(())
    }

    /// Effective sample rate in Hz
    pub fn sample_rate(&self) -> i32 {
        self.sample_rate_high.wrapping_add(self.sample_rate_low)
    }

    /// Convert a sample count into seconds.
    ///
    /// For ADPCM the count is in blocks and is scaled by `block_size`.
    pub fn samples_to_seconds(&self, samples: i64) -> f64 {
        let rate = self.sample_rate();
        if rate == 0 {
            return 0.0;
        }
        let mut count = samples as f64;
        if self.sample_format == SampleFormat::Adpcm {
            count *= f64::from(self.block_size);
        }
        count / f64::from(rate)
    }

    /// Convert seconds back into a sample count.
    ///
    /// Counts within `SAMPLE_SNAP_EPSILON` of an integer snap to it, so
    /// float error in a round trip does not lose a sample; anything
    /// else is floored.
    pub fn seconds_to_samples(&self, seconds: f64) -> i64 {
        let mut count = seconds * f64::from(self.sample_rate());
        if self.sample_format == SampleFormat::Adpcm {
            if self.block_size == 0 {
                return 0;
            }
            count /= f64::from(self.block_size);
        }
        let nearest = count.round();
        if (nearest - count).abs() < SAMPLE_SNAP_EPSILON {
            nearest as i64
        } else {
            count.floor() as i64
        }
    }

    /// Track length in seconds
    pub fn length_seconds(&self) -> f64 {
        self.samples_to_seconds(i64::from(self.sample_blocks))
    }

    /// Returns true if the track has a loop point
    pub fn looped(&self) -> bool {
        self.loop_start >= 0
    }

    /// Loop point in seconds
    pub fn loop_start_seconds(&self) -> f64 {
        self.samples_to_seconds(i64::from(self.loop_start))
    }

    /// Size of one compressed ADPCM block across all channels
    pub fn compressed_block_len(&self) -> usize {
        (1 + usize::from(self.block_size) / 2) * usize::from(self.channels)
    }

    /// Size of one decoded ADPCM block across all channels
    pub fn decoded_block_len(&self) -> usize {
        usize::from(self.block_size) * usize::from(self.channels) * 2
    }
}

fn detect_variant<R: Read>(reader: &mut R) -> DecodeResult<ContainerVariant> {
    let mut marker = [0u8; 12];
    reader.read_exact(&mut marker[..8])?;
    if &marker[..8] == SE_MARKER {
        return Ok(ContainerVariant::SoundEffect);
    }

    reader.read_exact(&mut marker[8..])?;
    if &marker == BGM_MARKER {
        Ok(ContainerVariant::BgmStream)
    } else {
        Err(DecodeError::UnrecognizedContainer)
    }
}

/// A BGW/SPW file on disk and its parsed header
///
/// Opening never fails: a file that cannot be read or classified is kept
/// as `ContainerVariant::Unknown` with a default header, and is reported
/// as unplayable.
#[derive(Debug, Clone)]
pub struct AudioFile {
    path: PathBuf,
    variant: ContainerVariant,
    header: AudioHeader,
}

impl AudioFile {
    /// Open and classify the file at `path`
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let parsed = File::open(&path)
            .map_err(DecodeError::from)
            .and_then(|file| AudioHeader::read_from(&mut BufReader::new(file)));

        match parsed {
            Ok((variant, header)) => {
                debug!(
                    path = %path.display(),
                    ?variant,
                    format = %header.sample_format,
                    channels = header.channels,
                    rate = header.sample_rate(),
                    "classified audio file"
                );
                Self {
                    path,
                    variant,
                    header,
                }
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "unrecognized audio file");
                Self {
                    path,
                    variant: ContainerVariant::Unknown,
                    header: AudioHeader::default(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn variant(&self) -> ContainerVariant {
        self.variant
    }

    pub fn header(&self) -> &AudioHeader {
        &self.header
    }

    /// Returns true if `open_stream` can produce a stream for this file
    pub fn is_playable(&self) -> bool {
        self.variant != ContainerVariant::Unknown && self.header.sample_format.is_supported()
    }

    /// Open a PCM stream over the file.
    ///
    /// Returns `Ok(None)` if the file is unrecognized or its sample format
    /// has no decoder; `Err` only if the file cannot be reopened.
    pub fn open_stream(
        &self,
        options: StreamOptions,
    ) -> DecodeResult<Option<AudioStream<BufReader<File>>>> {
        if !self.is_playable() {
            debug!(
                path = %self.path.display(),
                variant = ?self.variant,
                format = %self.header.sample_format,
                "no stream available"
            );
            return Ok(None);
        }
        AudioStream::open(&self.path, self.header.clone(), options).map(Some)
    }
}
