//! PlayOnline block ADPCM decoder
//!
//! Each block holds, per channel, one header byte followed by
//! `block_size / 2` data bytes:
//!
//! ```text
//! [1 byte]  low nibble: 12 - scale, high nibble: filter index (0-4)
//! [N bytes] residuals, two 4-bit values per byte, low nibble first
//! ```
//!
//! Channels are stored one after another inside a block; the decoded
//! samples are interleaved.

use super::decoder::{DecodeError, DecodeResult};
use super::header::MAX_CHANNELS;

// ---------------------------------------------------------------------------
// Predictor tables
// ---------------------------------------------------------------------------

/// Weight of the previous sample, Q8.
static FILTER_A: [i32; 5] = [0x0000, 0x00F0, 0x01CC, 0x0188, 0x01E8];

/// Weight of the sample before that, Q8.
static FILTER_B: [i32; 5] = [0x0000, 0x0000, -0x00D0, -0x00DC, -0x00F0];

/// Predictor history carried from one block to the next
///
/// Holds the two most recent decoded samples of every channel. A state
/// belongs to one stream; reset it when the stream restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderState {
    history: Vec<[i32; 2]>,
}

impl DecoderState {
    /// Zeroed history for `channels` channels
    pub fn new(channels: usize) -> Self {
        Self {
            history: vec![[0; 2]; channels],
        }
    }

    pub fn channels(&self) -> usize {
        self.history.len()
    }

    /// `[most recent, previous]` samples of `channel`
    pub fn history(&self, channel: usize) -> Option<[i32; 2]> {
        self.history.get(channel).copied()
    }

    pub fn reset(&mut self) {
        self.history.fill([0; 2]);
    }
}

/// Block ADPCM codec for a fixed channel count and block size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdpcmCodec {
    channels: usize,
    block_size: usize,
}

impl AdpcmCodec {
    /// Create a codec. `channels` must be 1-6 and `block_size` even and
    /// non-zero.
    pub fn new(channels: u8, block_size: u8) -> DecodeResult<Self> {
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(DecodeError::InvalidChannelCount(channels));
        }
        if block_size == 0 || block_size % 2 != 0 {
            return Err(DecodeError::InvalidBlockSize(block_size));
        }
        Ok(Self {
            channels: usize::from(channels),
            block_size: usize::from(block_size),
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Bytes of one channel inside a compressed block
    fn channel_stride(&self) -> usize {
        1 + self.block_size / 2
    }

    /// Bytes of one compressed block, all channels
    pub fn input_len(&self) -> usize {
        self.channel_stride() * self.channels
    }

    /// Bytes of one decoded block, all channels
    pub fn output_len(&self) -> usize {
        self.block_size * self.channels * 2
    }

    /// Zeroed decoder state sized for this codec
    pub fn new_state(&self) -> DecoderState {
        DecoderState::new(self.channels)
    }

    /// Decode one compressed block into interleaved 16-bit LE PCM.
    ///
    /// Writes `output_len()` bytes to the start of `output` and advances
    /// `state`. Buffers shorter than one block are rejected before any
    /// sample is written.
    pub fn decode_block(
        &self,
        state: &mut DecoderState,
        input: &[u8],
        output: &mut [u8],
    ) -> DecodeResult<()> {
        if input.len() < self.input_len() {
            return Err(DecodeError::BufferTooSmall {
                what: "Input",
                required: self.input_len(),
                actual: input.len(),
            });
        }
        if output.len() < self.output_len() {
            return Err(DecodeError::BufferTooSmall {
                what: "Output",
                required: self.output_len(),
                actual: output.len(),
            });
        }
        if state.channels() != self.channels {
            return Err(DecodeError::StateMismatch {
                expected: self.channels,
                actual: state.channels(),
            });
        }

        let stride = self.channel_stride();
        for (channel, history) in state.history.iter_mut().enumerate() {
            let data = &input[channel * stride..(channel + 1) * stride];
            let scale = 12 - i32::from(data[0] & 0x0F);
            let index = data[0] >> 4;
            let (fa, fb) = match (FILTER_A.get(usize::from(index)), FILTER_B.get(usize::from(index))) {
                (Some(&a), Some(&b)) => (a, b),
                _ => return Err(DecodeError::InvalidPredictor { channel, index }),
            };

            for (byte_index, &byte) in data[1..].iter().enumerate() {
                for nibble in 0..2 {
                    let mut value = i32::from((byte >> (4 * nibble)) & 0x0F);
                    if value >= 8 {
                        value -= 16;
                    }

                    // Shift counts wrap at 32, as scales 13-15 go negative.
                    let predicted = (history[0] * fa + history[1] * fb) / 256;
                    let sample = value
                        .wrapping_shl(scale as u32)
                        .wrapping_add(predicted)
                        .clamp(i32::from(i16::MIN), i32::from(i16::MAX));
                    history[1] = history[0];
                    history[0] = sample;

                    let frame = 2 * byte_index + nibble;
                    let ofs = (frame * self.channels + channel) * 2;
                    output[ofs..ofs + 2].copy_from_slice(&(sample as i16).to_le_bytes());
                }
            }
        }

        Ok(())
    }

    /// ADPCM encoding is not implemented; always fails.
    pub fn encode_block(&self, _input: &[u8], _output: &mut [u8]) -> DecodeResult<()> {
        Err(DecodeError::EncodingUnsupported)
    }
}
