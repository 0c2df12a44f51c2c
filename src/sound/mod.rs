//! Sound decoding module
//!
//! Parses PlayOnline BGW (music) and SPW (sound effect) files and streams
//! their payload as 16-bit PCM.
//!
//! # Architecture
//!
//! - `header` classifies a file and reads its fixed fields
//! - `adpcm` decodes one compressed block at a time
//! - `stream` turns a file into a forward-only `PcmSource`
//! - `wav` builds the optional synthetic WAV header
//! - `rodio_source` (feature `rodio`) adapts a stream for rodio sinks

pub mod adpcm;
pub mod decoder;
pub mod formats;
pub mod header;
#[cfg(feature = "rodio")]
pub mod rodio_source;
pub mod stream;
pub mod wav;

pub use adpcm::{AdpcmCodec, DecoderState};
pub use decoder::{DecodeError, DecodeResult, PcmSource};
pub use formats::{ContainerVariant, SampleFormat};
pub use header::{AudioFile, AudioHeader};
#[cfg(feature = "rodio")]
pub use rodio_source::StreamSource;
pub use stream::{AudioStream, StreamOptions};
pub use wav::WavHeader;
