//! Content fingerprinting and in-place renaming.
//!
//! Stage 1 of the pipeline. Every regular file directly inside the image
//! directory gets a short content hash inserted before its extension:
//!
//! ```text
//! public/assets/images/
//! ├── hero.640.png   →  hero.640.3fa2c1d9.png
//! ├── hero.1280.png  →  hero.1280.b71e04aa.png
//! └── logo.webp      →  logo.5c0de611.webp
//! ```
//!
//! The fingerprint is the first 8 hex characters of the SHA-256 of the file
//! contents. That is plenty for cache-busting; it is not a security boundary.
//! The names do not match those produced by the older MD5-based build script,
//! so a site switching over gets a fresh set of URLs.
//!
//! Every file is hashed before any is renamed, so an unreadable file leaves
//! the directory untouched.
//!
//! Renaming is destructive. Running the stage twice hashes the already-hashed
//! names again (`hero.640.3fa2c1d9.0e4411b2.png`). Use [`plan_directory`]
//! to preview names without touching the disk.

use crate::naming::{self, ParsedName};
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Number of hex characters kept from the digest.
pub const FINGERPRINT_LEN: usize = 8;

#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Cannot read image directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    #[error("File name is not valid UTF-8: {0}")]
    InvalidFileName(PathBuf),
}

/// One file's old and new name.
#[derive(Debug, Clone, PartialEq)]
pub struct Renamed {
    /// Name before the run, e.g. `hero.640.png`.
    pub original: String,
    /// Name after the run, e.g. `hero.640.3fa2c1d9.png`.
    pub hashed: String,
    pub fingerprint: String,
    /// Parsed form of `original`; the image ID comes from here.
    pub parsed: ParsedName,
}

/// Short hex fingerprint of a byte buffer.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = format!("{:x}", digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// Fingerprint of a file's contents.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(fingerprint_bytes(&bytes))
}

/// Compute the rename plan for `dir` without modifying anything.
///
/// Only regular files directly inside `dir` are considered, in ascending
/// filename order. Symlinks count as what they point to. Subdirectories and
/// their contents are skipped.
pub fn plan_directory(dir: &Path) -> Result<Vec<Renamed>, FingerprintError> {
    let mut plan = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let original = entry
            .file_name()
            .to_str()
            .ok_or_else(|| FingerprintError::InvalidFileName(entry.path().to_path_buf()))?
            .to_string();
        let fingerprint = hash_file(entry.path())?;
        let parsed = naming::parse_file_name(&original);
        plan.push(Renamed {
            hashed: parsed.hashed(&fingerprint),
            original,
            fingerprint,
            parsed,
        });
    }
    Ok(plan)
}

/// Fingerprint and rename every file in `dir`.
///
/// Files are renamed one at a time in plan order. A failure stops the run;
/// files renamed before it keep their new names.
pub fn fingerprint_directory(dir: &Path) -> Result<Vec<Renamed>, FingerprintError> {
    let plan = plan_directory(dir)?;
    for item in &plan {
        let from = dir.join(&item.original);
        let to = dir.join(&item.hashed);
        std::fs::rename(&from, &to).map_err(|source| FingerprintError::Rename {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
    }
    Ok(plan)
}
