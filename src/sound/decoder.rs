//! Decoder error type and the PCM source trait
//!
//! Defines `DecodeError`, shared by the header parser, the ADPCM codec and
//! the streaming reader, and the `PcmSource` trait that playback engines
//! consume.

use std::io;

use thiserror::Error;

use super::formats::SampleFormat;

/// Error type for decoder operations
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Magic marker matched neither container variant
    #[error("Unrecognized container marker")]
    UnrecognizedContainer,
    /// Sample format has no decoder
    #[error("Unsupported sample format: {0}")]
    UnsupportedSampleFormat(SampleFormat),
    /// Header field violates a layout invariant
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    /// Channel count outside 1..=6
    #[error("Invalid channel count: {0} (expected 1-6)")]
    InvalidChannelCount(u8),
    /// Block size zero or odd
    #[error("Invalid ADPCM block size: {0} (expected an even, non-zero value)")]
    InvalidBlockSize(u8),
    /// Caller-supplied buffer shorter than one block
    #[error("{what} buffer too small: need {required} bytes, got {actual}")]
    BufferTooSmall {
        what: &'static str,
        required: usize,
        actual: usize,
    },
    /// Decoder state built for another channel layout
    #[error("Decoder state holds {actual} channels, codec expects {expected}")]
    StateMismatch { expected: usize, actual: usize },
    /// Block header selects a filter outside the table
    #[error("Invalid predictor index {index} in channel {channel}")]
    InvalidPredictor { channel: usize, index: u8 },
    /// ADPCM encoding is not implemented
    #[error("ADPCM encoding is not supported")]
    EncodingUnsupported,
    /// Stream was read after `close`
    #[error("Stream is closed")]
    Closed,
    /// Stream was read after an earlier read failed
    #[error("Stream aborted by an earlier error")]
    Aborted,
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for decoder operations
pub type DecodeResult<T> = Result<T, DecodeError>;

impl From<DecodeError> for io::Error {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Io(e) => e,
            DecodeError::BufferTooSmall { .. } | DecodeError::StateMismatch { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            DecodeError::EncodingUnsupported => io::Error::new(io::ErrorKind::Unsupported, err),
            DecodeError::Closed => io::Error::new(io::ErrorKind::BrokenPipe, err),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

/// Forward-only source of 16-bit PCM bytes
///
/// This is the whole surface a playback engine gets: there is no seek,
/// write or resize, so a caller cannot ask for them.
pub trait PcmSource {
    /// Fill `buf` with up to `buf.len()` bytes, returning the count.
    ///
    /// Returns `Ok(0)` only at end of stream (or for an empty `buf`). After
    /// an error every later call fails.
    fn read(&mut self, buf: &mut [u8]) -> DecodeResult<usize>;

    /// Total logical byte count of the stream
    fn length(&self) -> u64;

    /// Current logical position (see the implementor for precision)
    fn position(&self) -> u64;

    /// Release the underlying file handle. Safe to call more than once.
    fn close(&mut self);
}
