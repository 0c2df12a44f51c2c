// pol-audio library
// PlayOnline BGW/SPW decoding and PCM streaming

pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod propfile;
pub mod sound;

pub use catalog::{Catalog, CatalogEntry};
pub use cli::Cli;
pub use config::Options;
pub use logging::LogLevel;
pub use sound::{AudioFile, AudioHeader, AudioStream, DecodeError, DecodeResult, PcmSource};
