//! Layout patching.
//!
//! Stage 3 of the pipeline. Layout documents are JSON files describing a page
//! as a list of components. Image components name a logical image by `id`:
//!
//! ```json
//! { "components": [ { "type": "image", "id": "hero", "alt": "Our office" } ] }
//! ```
//!
//! When the ID matches a manifest entry, the component receives the resolved
//! URLs:
//!
//! ```json
//! { "type": "image", "id": "hero", "alt": "Our office",
//!   "src": "...", "src_webp": "...", "src_avif": "...",
//!   "srcset": { "png": [...], "webp": [...], "avif": [...] } }
//! ```
//!
//! A format without a primary URL has its `src*` key removed rather than set
//! to `null`. Unmatched image components and components of other types are
//! left exactly as they were.
//!
//! Every `*.json` file in the directory is written back, patched or not. Key
//! order is preserved; whitespace is normalized to two-space indentation.

use crate::types::{ImageFormat, ImageManifest, ManifestEntry};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read layouts directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("`components` is neither a list nor empty in {0}")]
    InvalidComponents(PathBuf),
}

/// What happened to the image components of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchSummary {
    /// IDs of image components that received manifest URLs.
    pub patched: Vec<String>,
    /// IDs of image components with no manifest entry.
    pub unmatched: Vec<String>,
}

/// Result of rewriting one layout file.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    /// File name within the layouts directory.
    pub file: String,
    pub summary: PatchSummary,
}

/// The component list of a document.
///
/// Missing components, falsy scalars (`null`, `false`, `0`, `""`) and
/// strings yield an empty list, as do documents that are not objects.
/// `None` means `components` is `true`, a non-zero number or an object.
fn components_mut(doc: &mut Value) -> Option<&mut [Value]> {
    match doc.get_mut("components") {
        None | Some(Value::Null) | Some(Value::Bool(false)) | Some(Value::String(_)) => {
            Some(Default::default())
        }
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Some(Default::default()),
        Some(Value::Array(items)) => Some(items),
        Some(_) => None,
    }
}

fn is_image(component: &Value) -> bool {
    component.get("type").and_then(Value::as_str) == Some("image")
}

fn set_or_remove(obj: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    match value {
        Some(url) => {
            obj.insert(key.to_string(), Value::String(url.to_string()));
        }
        None => {
            obj.shift_remove(key);
        }
    }
}

/// Overwrite a component's URL fields from a manifest entry.
pub fn apply_entry(component: &mut Map<String, Value>, entry: &ManifestEntry) {
    set_or_remove(component, "src", entry.primary(ImageFormat::Png));
    set_or_remove(component, "src_webp", entry.primary(ImageFormat::Webp));
    set_or_remove(component, "src_avif", entry.primary(ImageFormat::Avif));

    let srcset: Map<String, Value> = ImageFormat::ALL
        .iter()
        .map(|&format| {
            let urls = entry
                .srcset(format)
                .iter()
                .cloned()
                .map(Value::String)
                .collect();
            (format.key().to_string(), Value::Array(urls))
        })
        .collect();
    component.insert("srcset".to_string(), Value::Object(srcset));
}

/// Patch every image component of `doc` in place.
///
/// Returns `None` only when `components` is a truthy non-list value.
fn patch_components(doc: &mut Value, manifest: &ImageManifest) -> Option<PatchSummary> {
    let mut summary = PatchSummary::default();
    let components = components_mut(doc)?;

    for component in components.iter_mut().filter(|c| is_image(c)) {
        let Some(obj) = component.as_object_mut() else {
            continue;
        };
        let id = obj.get("id").and_then(Value::as_str).map(str::to_string);
        let entry = id.as_deref().and_then(|id| manifest.find(id));
        match entry {
            Some(entry) => {
                apply_entry(obj, entry);
                summary.patched.push(entry.id.clone());
            }
            None => summary.unmatched.push(id.unwrap_or_default()),
        }
    }
    Some(summary)
}

/// Patch a parsed layout document in place.
///
/// A document whose `components` is `true`, a non-zero number or an object is
/// left untouched and reported with an empty summary; [`patch_file`] treats
/// it as fatal.
pub fn patch_document(doc: &mut Value, manifest: &ImageManifest) -> PatchSummary {
    patch_components(doc, manifest).unwrap_or_default()
}

/// Patch and rewrite one layout file.
pub fn patch_file(path: &Path, manifest: &ImageManifest) -> Result<PatchSummary, LayoutError> {
    let content = std::fs::read_to_string(path)?;
    let mut doc: Value = serde_json::from_str(&content).map_err(|source| LayoutError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let summary = patch_components(&mut doc, manifest)
        .ok_or_else(|| LayoutError::InvalidComponents(path.to_path_buf()))?;
    let json = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, json)?;
    Ok(summary)
}

/// Patch every `*.json` file directly inside `dir`, in filename order.
///
/// The first failure stops the run. Files before it have already been
/// rewritten; files after it are not touched.
pub fn patch_layouts(
    dir: &Path,
    manifest: &ImageManifest,
) -> Result<Vec<LayoutReport>, LayoutError> {
    let mut reports = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let file = entry.file_name().to_string_lossy().into_owned();
        if !file.ends_with(".json") {
            continue;
        }
        let summary = patch_file(entry.path(), manifest)?;
        reports.push(LayoutReport { file, summary });
    }
    Ok(reports)
}
