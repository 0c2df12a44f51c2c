use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::logging::LogLevel;
use crate::propfile::load_propfile;
use crate::sound::stream::{StreamOptions, DEFAULT_BUFFER_BLOCKS};

/// Largest accepted `buffer_blocks` value
pub const MAX_BUFFER_BLOCKS: usize = 1024;

/// Application options that can be set via CLI or config file
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub music_dir: Option<PathBuf>,
    /// File extensions scanned for, without the leading dot
    pub extensions: Vec<String>,
    pub wav_header: bool,
    pub buffer_blocks: usize,
    pub log_level: LogLevel,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            music_dir: None,
            extensions: vec!["bgw".to_string(), "spw".to_string()],
            wav_header: true,
            buffer_blocks: DEFAULT_BUFFER_BLOCKS,
            log_level: LogLevel::Info,
        }
    }
}

impl Options {
    /// Stream settings derived from these options
    pub fn to_stream_options(&self) -> StreamOptions {
        StreamOptions::default()
            .with_wav_header(self.wav_header)
            .with_buffer_blocks(self.buffer_blocks)
    }

    /// Apply one `key = value` pair. Unknown keys are warned about and
    /// ignored; bad values are errors.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key.to_lowercase().as_str() {
            "music_dir" => {
                self.music_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "extensions" => self.extensions = parse_extensions(value)?,
            "wav_header" => self.wav_header = parse_bool(value)?,
            "buffer_blocks" => self.buffer_blocks = parse_buffer_blocks(value)?,
            "log_level" => self.log_level = LogLevel::parse(value)?,
            _ => warn!(key, "Unknown config key ignored"),
        }
        Ok(())
    }
}

/// Load configuration from a property file.
///
/// With no path, or a path that does not exist, the defaults are returned.
pub fn load_config(path: Option<&Path>) -> Result<Options> {
    let mut opts = Options::default();
    let Some(path) = path else {
        return Ok(opts);
    };
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(opts);
    }

    let pairs = load_propfile(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    for (key, value) in &pairs {
        opts.apply(key, value)
            .with_context(|| format!("Invalid value for '{}' in {}", key, path.display()))?;
    }
    Ok(opts)
}

/// Parse a boolean config value
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => anyhow::bail!("Invalid boolean: {}. Valid options: true, false, yes, no, on, off, 1, 0", s),
    }
}

/// Parse a decode group size
pub fn parse_buffer_blocks(s: &str) -> Result<usize> {
    let blocks: usize = s.trim().parse().context("Invalid buffer block count")?;
    if blocks == 0 || blocks > MAX_BUFFER_BLOCKS {
        anyhow::bail!("Buffer block count out of range (1 to {})", MAX_BUFFER_BLOCKS);
    }
    Ok(blocks)
}

/// Parse a comma-separated extension list, e.g. "bgw, .spw"
pub fn parse_extensions(s: &str) -> Result<Vec<String>> {
    let extensions: Vec<String> = s
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();
    if extensions.is_empty() {
        anyhow::bail!("Extension list must not be empty");
    }
    Ok(extensions)
}
