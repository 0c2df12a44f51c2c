//! Synthetic RIFF/WAVE header
//!
//! A decoded stream can be prefixed with a canonical 44-byte header so
//! that generic players see an ordinary 16-bit PCM WAV file.

use std::io::{self, Write};

use byteorder::{ByteOrder, LittleEndian};

use super::formats::{BITS_PER_SAMPLE, WAV_HEADER_SIZE};

// WAV format constants
const RIFF_ID: &[u8; 4] = b"RIFF";
const WAVE_FMT_ID: &[u8; 8] = b"WAVEfmt ";
const DATA_ID: &[u8; 4] = b"data";
const FMT_CHUNK_SIZE: u32 = 0x10;
const WAVE_FORMAT_PCM: u16 = 1;

/// Parameters of the synthetic header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    /// Logical stream length, header included
    pub total_length: u64,
}

impl WavHeader {
    /// Bytes per second of the decoded stream
    pub fn byte_rate(&self) -> u32 {
        u32::from(self.block_align()).saturating_mul(self.sample_rate)
    }

    /// Bytes per sample frame
    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(2)
    }

    /// Write the 44-byte header image
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_bytes())
    }

    /// Render the header image.
    ///
    /// The RIFF size field holds the full logical length rather than
    /// length - 8; players only use the data chunk size. Lengths past
    /// `u32::MAX` saturate.
    pub fn to_bytes(&self) -> [u8; WAV_HEADER_SIZE] {
        let data_len = self.total_length.saturating_sub(WAV_HEADER_SIZE as u64);

        let mut image = [0u8; WAV_HEADER_SIZE];
        image[0..4].copy_from_slice(RIFF_ID);
        LittleEndian::write_u32(&mut image[4..8], saturate_u32(self.total_length));
        image[8..16].copy_from_slice(WAVE_FMT_ID);
        LittleEndian::write_u32(&mut image[16..20], FMT_CHUNK_SIZE);
        LittleEndian::write_u16(&mut image[20..22], WAVE_FORMAT_PCM);
        LittleEndian::write_u16(&mut image[22..24], self.channels);
        LittleEndian::write_u32(&mut image[24..28], self.sample_rate);
        LittleEndian::write_u32(&mut image[28..32], self.byte_rate());
        LittleEndian::write_u16(&mut image[32..34], self.block_align());
        LittleEndian::write_u16(&mut image[34..36], BITS_PER_SAMPLE);
        image[36..40].copy_from_slice(DATA_ID);
        LittleEndian::write_u32(&mut image[40..44], saturate_u32(data_len));
        image
    }
}

fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
