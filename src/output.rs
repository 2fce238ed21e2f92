//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! ==> Stage 1: Fingerprinting images
//!     001 hero.1280.png → hero.1280.b71e04aa.png
//!     002 hero.640.png → hero.640.3fa2c1d9.png
//! ==> Stage 2: Writing manifest
//!     2 images → public/image-manifest.json
//! ==> Stage 3: Patching layouts
//!     home.json (1 patched, 1 unmatched)
//!         hero: patched
//!         missing: no manifest entry
//! ```
//!
//! ## Check
//!
//! ```text
//! Renames
//!     001 hero.1280.png → hero.1280.b71e04aa.png
//!
//! Manifest
//!     001 hero (png: 2, webp: 0, avif: 0)
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function returns `Vec<String>` and does no I/O, so output
//! is unit-testable. `print_*` wrappers write to stdout.

use crate::config::SiteIdentity;
use crate::fingerprint::Renamed;
use crate::pipeline::{BuildEvent, Stage};
use crate::types::{ImageFormat, ImageManifest};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn rename_line(index: usize, original: &str, hashed: &str) -> String {
    format!(
        "{}{} {} \u{2192} {}",
        indent(1),
        format_index(index),
        original,
        hashed
    )
}

fn stage_heading(stage: Stage) -> &'static str {
    match stage {
        Stage::Fingerprint => "==> Stage 1: Fingerprinting images",
        Stage::Manifest => "==> Stage 2: Writing manifest",
        Stage::Layouts => "==> Stage 3: Patching layouts",
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format a single build progress event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::StageStarted(stage) => vec![stage_heading(*stage).to_string()],
        BuildEvent::ImageRenamed {
            index,
            original,
            hashed,
        } => vec![rename_line(*index, original, hashed)],
        BuildEvent::ManifestWritten { path, image_count } => vec![format!(
            "{}{} images \u{2192} {}",
            indent(1),
            image_count,
            path.display()
        )],
        BuildEvent::LayoutPatched(report) => {
            let summary = &report.summary;
            let mut lines = vec![format!(
                "{}{} ({} patched, {} unmatched)",
                indent(1),
                report.file,
                summary.patched.len(),
                summary.unmatched.len()
            )];
            for id in &summary.patched {
                lines.push(format!("{}{}: patched", indent(2), id));
            }
            for id in &summary.unmatched {
                let shown = if id.is_empty() { "(no id)" } else { id.as_str() };
                lines.push(format!("{}{}: no manifest entry", indent(2), shown));
            }
            lines
        }
    }
}

/// Print a build progress event to stdout.
pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the rename plan and the manifest it would produce.
pub fn format_preview(plan: &[Renamed], manifest: &ImageManifest) -> Vec<String> {
    let mut lines = vec!["Renames".to_string()];
    for (i, item) in plan.iter().enumerate() {
        lines.push(rename_line(i + 1, &item.original, &item.hashed));
    }

    lines.push(String::new());
    lines.push("Manifest".to_string());
    for (i, entry) in manifest.images.iter().enumerate() {
        let counts: Vec<String> = ImageFormat::ALL
            .iter()
            .map(|&f| format!("{}: {}", f.key(), entry.srcset(f).len()))
            .collect();
        lines.push(format!(
            "{}{} {} ({})",
            indent(1),
            format_index(i + 1),
            entry.id,
            counts.join(", ")
        ));
    }
    lines
}

/// Print the check output to stdout.
pub fn print_preview(plan: &[Renamed], manifest: &ImageManifest) {
    for line in format_preview(plan, manifest) {
        println!("{}", line);
    }
}

/// Warning shown when URLs will carry `undefined` placeholders.
pub fn format_identity_warning(identity: &SiteIdentity) -> Option<String> {
    let missing = identity.missing();
    if missing.is_empty() {
        return None;
    }
    Some(format!(
        "Warning: {} not set, URLs will contain \"undefined\"",
        missing.join(" and ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutReport, PatchSummary};
    use crate::naming::parse_file_name;
    use crate::types::ManifestEntry;
    use std::path::PathBuf;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    // =========================================================================
    // Build events
    // =========================================================================

    #[test]
    fn format_stage_started() {
        let lines = format_build_event(&BuildEvent::StageStarted(Stage::Manifest));
        assert_eq!(lines, vec!["==> Stage 2: Writing manifest"]);
    }

    #[test]
    fn format_image_renamed() {
        let lines = format_build_event(&BuildEvent::ImageRenamed {
            index: 3,
            original: "hero.640.png".into(),
            hashed: "hero.640.3fa2c1d9.png".into(),
        });
        assert_eq!(lines, vec!["    003 hero.640.png → hero.640.3fa2c1d9.png"]);
    }

    #[test]
    fn format_manifest_written() {
        let lines = format_build_event(&BuildEvent::ManifestWritten {
            path: PathBuf::from("public/image-manifest.json"),
            image_count: 4,
        });
        assert_eq!(lines, vec!["    4 images → public/image-manifest.json"]);
    }

    #[test]
    fn format_layout_patched() {
        let lines = format_build_event(&BuildEvent::LayoutPatched(LayoutReport {
            file: "home.json".into(),
            summary: PatchSummary {
                patched: vec!["hero".into()],
                unmatched: vec!["missing".into(), String::new()],
            },
        }));
        assert_eq!(
            lines,
            vec![
                "    home.json (1 patched, 2 unmatched)",
                "        hero: patched",
                "        missing: no manifest entry",
                "        (no id): no manifest entry",
            ]
        );
    }

    // =========================================================================
    // Preview
    // =========================================================================

    #[test]
    fn format_preview_sections() {
        let parsed = parse_file_name("hero.640.png");
        let plan = vec![Renamed {
            original: "hero.640.png".into(),
            hashed: parsed.hashed("3fa2c1d9"),
            fingerprint: "3fa2c1d9".into(),
            parsed,
        }];
        let manifest = ImageManifest {
            images: vec![ManifestEntry {
                id: "hero".into(),
                src: Some("u".into()),
                src_webp: None,
                src_avif: None,
                srcset_png: vec!["u".into()],
                srcset_webp: vec![],
                srcset_avif: vec![],
            }],
        };

        let lines = format_preview(&plan, &manifest);

        assert_eq!(
            lines,
            vec![
                "Renames",
                "    001 hero.640.png → hero.640.3fa2c1d9.png",
                "",
                "Manifest",
                "    001 hero (png: 1, webp: 0, avif: 0)",
            ]
        );
    }

    // =========================================================================
    // Identity warning
    // =========================================================================

    #[test]
    fn no_warning_when_identity_complete() {
        assert_eq!(
            format_identity_warning(&SiteIdentity::new("acme", "site")),
            None
        );
    }

    #[test]
    fn warning_names_missing_parts() {
        assert_eq!(
            format_identity_warning(&SiteIdentity::default()).as_deref(),
            Some("Warning: owner and repository not set, URLs will contain \"undefined\"")
        );
        let owner_only = SiteIdentity {
            owner: Some("acme".into()),
            repository: None,
        };
        assert_eq!(
            format_identity_warning(&owner_only).as_deref(),
            Some("Warning: repository not set, URLs will contain \"undefined\"")
        );
    }
}
