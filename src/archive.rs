//! Repository archive decoding
//!
//! Turns a zipball into a flat list of text files. Binary and media entries
//! are dropped by extension; everything else is decoded as UTF-8.

use crate::config::{Config, DEFAULT_ARCHIVE_MAX_BYTES};
use crate::error::{Result, ToolError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::ZipArchive;

/// Extensions of entries that never make it into a code structure
pub const FILTERED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "ico", "woff", "woff2", "ttf", "otf", "mp4", "pdf",
];

/// Decoded text may be at most this many times the archive ceiling, summed over all entries
pub const MAX_EXPANSION_RATIO: usize = 8;

/// Upper bound on the buffer reserved up front for one entry
const MAX_PREALLOCATION: u64 = 1 << 20;

/// One decoded text file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFileEntry {
    /// Path inside the archive, including GitHub's top-level folder
    pub path: String,
    /// File text, lossily decoded as UTF-8
    pub content: String,
}

/// Decoded text files of a repository, in archive order
pub type CodeStructure = Vec<RepoFileEntry>;

/// Returns true when `path` carries a binary/media extension
pub fn is_filtered(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            FILTERED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Size-bounded zip decoder backed by a scoped temp file
#[derive(Debug, Clone)]
pub struct ArchiveDecoder {
    max_bytes: usize,
    temp_dir: PathBuf,
}

impl Default for ArchiveDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVE_MAX_BYTES, std::env::temp_dir())
    }
}

impl ArchiveDecoder {
    /// `max_bytes` is exclusive: a buffer of exactly that size is rejected
    pub fn new(max_bytes: usize, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            max_bytes,
            temp_dir: temp_dir.into(),
        }
    }

    /// Creates a decoder using the configured ceiling and temp directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.archive_max_bytes, config.temp_dir())
    }

    /// Rejects buffers at or above the ceiling before anything touches the disk
    pub fn check_size(&self, size: usize) -> Result<()> {
        if size >= self.max_bytes {
            return Err(ToolError::ArchiveTooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Decodes a zip buffer into its text entries
    pub async fn decode(&self, bytes: Vec<u8>) -> Result<CodeStructure> {
        self.check_size(bytes.len())?;

        let temp_dir = self.temp_dir.clone();
        let limits = DecodeLimits {
            per_entry: self.max_bytes as u64,
            total: self.max_bytes.saturating_mul(MAX_EXPANSION_RATIO) as u64,
        };
        tokio::task::spawn_blocking(move || decode_via_temp_file(&bytes, &temp_dir, limits))
            .await
            .map_err(|e| ToolError::Message(format!("Archive decoding task failed: {}", e)))?
    }
}

/// Bounds on decompressed output, independent of what zip headers declare
#[derive(Debug, Clone, Copy)]
struct DecodeLimits {
    per_entry: u64,
    total: u64,
}

fn decode_via_temp_file(
    bytes: &[u8],
    temp_dir: &Path,
    limits: DecodeLimits,
) -> Result<CodeStructure> {
    // Dropping the handle removes the file, so every early return below cleans up.
    let mut temp = tempfile::Builder::new()
        .prefix("repo-archive-")
        .suffix(".zip")
        .tempfile_in(temp_dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    debug!("Wrote {} byte archive to {}", bytes.len(), temp.path().display());

    let entries = temp
        .reopen()
        .map_err(ToolError::from)
        .and_then(|file| read_entries(file, limits));

    let removed = temp.close();
    if let Err(e) = &removed {
        warn!("Failed to remove temporary archive: {}", e);
    }
    let entries = entries?;
    removed?;
    Ok(entries)
}

fn read_entries(file: File, limits: DecodeLimits) -> Result<CodeStructure> {
    let mut archive = ZipArchive::new(file)?;
    let mut entries = Vec::with_capacity(archive.len());
    let mut skipped = 0usize;
    let mut decoded_total = 0u64;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let path = entry.name().to_string();
        if is_filtered(&path) {
            skipped += 1;
            continue;
        }

        let mut buffer = Vec::with_capacity(entry.size().min(MAX_PREALLOCATION) as usize);
        // One byte past the limit distinguishes "exactly at" from "over".
        let read = (&mut entry)
            .take(limits.per_entry.saturating_add(1))
            .read_to_end(&mut buffer)? as u64;
        decoded_total += read;
        if read > limits.per_entry || decoded_total > limits.total {
            return Err(ToolError::Message(format!(
                "Archive entry {} expands beyond the decoding limit; try a smaller repository",
                path
            )));
        }
        entries.push(RepoFileEntry {
            path,
            content: String::from_utf8_lossy(&buffer).into_owned(),
        });
    }

    debug!("Decoded {} entries, skipped {} media files", entries.len(), skipped);
    Ok(entries)
}
