//! Manifest building.
//!
//! Stage 2 of the pipeline. Groups the renamed files by image ID and format
//! and resolves them to public URLs:
//!
//! ```text
//! hero.640.png   ─┐
//! hero.1280.png  ─┼─▶  { "id": "hero",
//! hero.640.webp  ─┘      "src": ".../hero.640.<h>.png",
//!                        "src_webp": ".../hero.640.<h>.webp",
//!                        "srcset_png": [".../hero.640.<h>.png", ".../hero.1280.<h>.png"],
//!                        "srcset_webp": [".../hero.640.<h>.webp"],
//!                        "srcset_avif": [] }
//! ```
//!
//! ## Primary Variant
//!
//! The primary URL of a format is the hashed filename that sorts first in
//! descending string order, and the srcset lists are emitted in that same
//! order. String order is not size order: `hero.640` sorts above
//! `hero.1280`. The published sites depend on exactly this choice, so it is
//! kept as is.

use crate::config::SiteIdentity;
use crate::fingerprint::Renamed;
use crate::types::{ImageFormat, ImageManifest, ManifestEntry};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Placeholder rendered for a missing owner or repository.
const UNDEFINED: &str = "undefined";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Hashed filenames of one image ID, bucketed by format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageGroup {
    pub png: Vec<String>,
    pub webp: Vec<String>,
    pub avif: Vec<String>,
}

impl ImageGroup {
    fn bucket_mut(&mut self, format: ImageFormat) -> &mut Vec<String> {
        match format {
            ImageFormat::Png => &mut self.png,
            ImageFormat::Webp => &mut self.webp,
            ImageFormat::Avif => &mut self.avif,
        }
    }
}

/// Base URL of the published image directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteUrl {
    base: String,
}

impl SiteUrl {
    /// `https://{owner}.github.io/{repository}/{image_subpath}`.
    pub fn new(identity: &SiteIdentity, image_subpath: &str) -> Self {
        let owner = identity.owner.as_deref().unwrap_or(UNDEFINED);
        let repository = identity.repository.as_deref().unwrap_or(UNDEFINED);
        Self {
            base: format!("https://{owner}.github.io/{repository}/{image_subpath}"),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Public URL of a file in the image directory.
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base, name)
    }
}

/// Group renamed files by image ID.
///
/// The ID comes from the original name, so size suffixes collapse but the
/// fingerprint never leaks into it. Files in unpublished formats still create
/// an (empty) group for their ID.
pub fn group_images(renamed: &[Renamed]) -> BTreeMap<String, ImageGroup> {
    let mut groups: BTreeMap<String, ImageGroup> = BTreeMap::new();
    for item in renamed {
        let group = groups.entry(item.parsed.id.clone()).or_default();
        if let Some(format) = item.parsed.format() {
            group.bucket_mut(format).push(item.hashed.clone());
        }
    }
    groups
}

/// Sort a bucket in descending string order and return its first element.
///
/// The sort is in place: callers rely on the bucket staying sorted.
pub fn pick_primary(names: &mut [String]) -> Option<String> {
    names.sort_by(|a, b| b.cmp(a));
    names.first().cloned()
}

/// Resolve groups into manifest entries, ordered by image ID.
pub fn build_manifest(groups: BTreeMap<String, ImageGroup>, site: &SiteUrl) -> ImageManifest {
    let images = groups
        .into_iter()
        .map(|(id, mut group)| {
            let png = pick_primary(&mut group.png);
            let webp = pick_primary(&mut group.webp);
            let avif = pick_primary(&mut group.avif);
            let urls = |names: &[String]| -> Vec<String> {
                names.iter().map(|n| site.url_for(n)).collect()
            };
            ManifestEntry {
                id,
                src: png.map(|n| site.url_for(&n)),
                src_webp: webp.map(|n| site.url_for(&n)),
                src_avif: avif.map(|n| site.url_for(&n)),
                srcset_png: urls(&group.png),
                srcset_webp: urls(&group.webp),
                srcset_avif: urls(&group.avif),
            }
        })
        .collect();
    ImageManifest { images }
}

/// Write the manifest as pretty JSON, replacing any previous file.
pub fn write_manifest(manifest: &ImageManifest, path: &Path) -> Result<(), ManifestError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a manifest written by a previous build.
pub fn read_manifest(path: &Path) -> Result<ImageManifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
