//! Shared test utilities for the asset-stamp test suite.
//!
//! Provides a throwaway site layout and lookup helpers that panic with a
//! clear message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_site();
//! let paths = site_paths(tmp.path());
//! let result = pipeline::run(&paths, &site, None).unwrap();
//!
//! let hero = find_entry(&result.manifest, "hero");
//! let home = read_json(&paths.layouts.join("home.json"));
//! assert_eq!(find_component(&home, "hero")["src"], hero.src.as_deref().unwrap());
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::PathsConfig;
use crate::types::{ImageManifest, ManifestEntry};

pub const HERO_SMALL: &[u8] = b"hero at 640 pixels";
pub const HERO_LARGE: &[u8] = b"hero at 1280 pixels";
pub const HERO_WEBP: &[u8] = b"hero webp";
pub const LOGO_PNG: &[u8] = b"logo png";
pub const LOGO_AVIF: &[u8] = b"logo avif";

// =========================================================================
// Fixture setup
// =========================================================================

/// Paths of the fixture site rooted at `root`.
pub fn site_paths(root: &Path) -> PathsConfig {
    PathsConfig {
        images: root.join("public/assets/images"),
        layouts: root.join("public/layouts"),
        manifest: root.join("public/image-manifest.json"),
    }
}

/// Build a small site in a temp directory and return it.
///
/// ```text
/// public/
/// ├── assets/images/
/// │   ├── hero.640.png
/// │   ├── hero.1280.png
/// │   ├── hero.640.webp
/// │   ├── logo.png
/// │   └── logo.avif
/// └── layouts/
///     ├── about.json   # image "logo"
///     └── home.json    # image "hero", image "missing", text "hero"
/// ```
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let paths = site_paths(tmp.path());
    fs::create_dir_all(&paths.images).unwrap();
    fs::create_dir_all(&paths.layouts).unwrap();

    for (name, bytes) in [
        ("hero.640.png", HERO_SMALL),
        ("hero.1280.png", HERO_LARGE),
        ("hero.640.webp", HERO_WEBP),
        ("logo.png", LOGO_PNG),
        ("logo.avif", LOGO_AVIF),
    ] {
        fs::write(paths.images.join(name), bytes).unwrap();
    }

    fs::write(
        paths.layouts.join("home.json"),
        r#"{
  "title": "Home",
  "components": [
    { "type": "image", "id": "hero", "alt": "Our office" },
    { "type": "image", "id": "missing", "src": "placeholder.png" },
    { "type": "text", "id": "hero", "body": "Welcome" }
  ]
}"#,
    )
    .unwrap();
    fs::write(
        paths.layouts.join("about.json"),
        r#"{ "components": [ { "type": "image", "id": "logo" } ] }"#,
    )
    .unwrap();

    tmp
}

// =========================================================================
// Lookups
// =========================================================================

/// Find a manifest entry by ID. Panics if not found.
pub fn find_entry<'a>(manifest: &'a ImageManifest, id: &str) -> &'a ManifestEntry {
    manifest.find(id).unwrap_or_else(|| {
        let ids: Vec<&str> = manifest.images.iter().map(|e| e.id.as_str()).collect();
        panic!("manifest entry '{id}' not found. Available: {ids:?}")
    })
}

/// Parse a JSON file.
pub fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    serde_json::from_str(&content).unwrap()
}

/// First image component with the given ID. Panics if not found.
pub fn find_component<'a>(doc: &'a serde_json::Value, id: &str) -> &'a serde_json::Value {
    doc["components"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|c| c["type"] == "image" && c["id"] == id)
        .unwrap_or_else(|| panic!("image component '{id}' not found"))
}
