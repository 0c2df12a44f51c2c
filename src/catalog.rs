//! Music directory catalog
//!
//! Lists the BGW/SPW files of a directory and classifies each one. A scan
//! returns a `Catalog` value; nothing is cached globally.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::sound::{AudioFile, AudioHeader, ContainerVariant, DecodeResult};

/// What a file browser needs to know about one file
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub variant: ContainerVariant,
    pub playable: bool,
    pub looped: bool,
    pub loop_start_seconds: f64,
    pub length_seconds: f64,
    pub header: AudioHeader,
}

impl CatalogEntry {
    fn from_file(file: &AudioFile) -> Self {
        let header = file.header();
        Self {
            path: file.path().to_path_buf(),
            variant: file.variant(),
            playable: file.is_playable(),
            looped: header.looped(),
            loop_start_seconds: header.loop_start_seconds(),
            length_seconds: header.length_seconds(),
            header: header.clone(),
        }
    }

    /// File name for display
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Reopen the file for streaming
    pub fn audio_file(&self) -> AudioFile {
        AudioFile::open(&self.path)
    }
}

/// Result of scanning one directory, sorted by path
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub root: PathBuf,
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Entries that can be streamed
    pub fn playable(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| e.playable)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns true if `path` has one of `extensions` (case-insensitive,
/// without the leading dot)
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Scan the files directly inside `dir`.
///
/// Fails only if the directory itself cannot be listed. Files that cannot
/// be parsed are kept as unplayable `Unknown` entries.
pub fn scan(dir: impl AsRef<Path>, extensions: &[String]) -> DecodeResult<Catalog> {
    let root = dir.as_ref().to_path_buf();
    let mut paths = Vec::new();

    for entry in fs::read_dir(&root)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %root.display(), error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && has_extension(&path, extensions) {
            paths.push(path);
        }
    }
    paths.sort();

    let entries: Vec<CatalogEntry> = paths
        .iter()
        .map(|path| {
            let entry = CatalogEntry::from_file(&AudioFile::open(path));
            if !entry.playable {
                warn!(path = %path.display(), variant = ?entry.variant, "unplayable audio file");
            }
            entry
        })
        .collect();

    debug!(
        dir = %root.display(),
        files = entries.len(),
        playable = entries.iter().filter(|e| e.playable).count(),
        "scanned music directory"
    );

    Ok(Catalog { root, entries })
}
