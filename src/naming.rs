//! Centralized filename parsing for image variants.
//!
//! Every image file follows the same pattern: a base name, an optional
//! numeric size suffix, and an extension. This module splits names into those
//! parts and builds the fingerprinted names written back to disk.
//!
//! ## Image IDs
//!
//! The image ID is the base name with a trailing `.<digits>` size suffix
//! removed. All sizes and formats of one picture share it:
//! - `hero.640.png` → `hero`
//! - `hero.1280.webp` → `hero`
//! - `logo.png` → `logo`
//! - `v1.2.3.png` → `v1.2` (only the last numeric segment is a size)

use crate::types::ImageFormat;

/// Result of splitting a filename like `hero.640.png`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Everything before the final extension (`hero.640`).
    pub base: String,
    /// Final extension including the dot (`.png`), empty if there is none.
    pub ext: String,
    /// Grouping key shared by all variants (`hero`).
    pub id: String,
}

impl ParsedName {
    /// Format bucket for this file, if the extension is one we publish.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_extension(&self.ext)
    }

    /// Filename with `fingerprint` inserted right before the extension.
    pub fn hashed(&self, fingerprint: &str) -> String {
        hashed_name(&self.base, fingerprint, &self.ext)
    }
}

/// Split a filename into base, extension and image ID.
///
/// The extension is the part from the last dot onward, except that a leading
/// dot does not start an extension (`.hidden` has none).
pub fn parse_file_name(name: &str) -> ParsedName {
    let (base, ext) = match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], &name[pos..]),
        _ => (name, ""),
    };
    ParsedName {
        base: base.to_string(),
        ext: ext.to_string(),
        id: image_id(base).to_string(),
    }
}

/// Strip a trailing `.<digits>` size suffix from a base name.
pub fn image_id(base: &str) -> &str {
    if let Some(pos) = base.rfind('.') {
        let suffix = &base[pos + 1..];
        if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            return &base[..pos];
        }
    }
    base
}

/// Build `<base>.<fingerprint><ext>`.
pub fn hashed_name(base: &str, fingerprint: &str, ext: &str) -> String {
    format!("{base}.{fingerprint}{ext}")
}
