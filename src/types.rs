//! Shared types used across pipeline stages.
//!
//! The manifest is written by the build stage and read back by `patch`, so
//! its JSON shape is the contract between the two.

use serde::{Deserialize, Serialize};

/// Published image formats. Anything else in the image directory is renamed
/// but never referenced from the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Webp,
    Avif,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Webp, ImageFormat::Avif];

    /// Match an extension including its dot. Case-sensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".png" => Some(ImageFormat::Png),
            ".webp" => Some(ImageFormat::Webp),
            ".avif" => Some(ImageFormat::Avif),
            _ => None,
        }
    }

    /// Key used for this format inside a layout's `srcset` object.
    pub fn key(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
            ImageFormat::Avif => "avif",
        }
    }
}

/// The manifest file written next to the published site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageManifest {
    pub images: Vec<ManifestEntry>,
}

impl ImageManifest {
    /// Exact-match lookup by image ID.
    pub fn find(&self, id: &str) -> Option<&ManifestEntry> {
        self.images.iter().find(|e| e.id == id)
    }
}

/// Resolved URLs for one logical image.
///
/// Primary URLs are omitted from the JSON when a format has no variant;
/// srcset lists are always written, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_webp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_avif: Option<String>,
    #[serde(default)]
    pub srcset_png: Vec<String>,
    #[serde(default)]
    pub srcset_webp: Vec<String>,
    #[serde(default)]
    pub srcset_avif: Vec<String>,
}

impl ManifestEntry {
    /// Primary URL for a format.
    pub fn primary(&self, format: ImageFormat) -> Option<&str> {
        match format {
            ImageFormat::Png => self.src.as_deref(),
            ImageFormat::Webp => self.src_webp.as_deref(),
            ImageFormat::Avif => self.src_avif.as_deref(),
        }
    }

    /// All URLs for a format, in manifest order.
    pub fn srcset(&self, format: ImageFormat) -> &[String] {
        match format {
            ImageFormat::Png => &self.srcset_png,
            ImageFormat::Webp => &self.srcset_webp,
            ImageFormat::Avif => &self.srcset_avif,
        }
    }
}
