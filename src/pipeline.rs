//! Runs the three stages in order.
//!
//! ```text
//! 1. Fingerprint  images/          →  images/<name>.<hash>.<ext>
//! 2. Manifest     renamed files    →  image-manifest.json
//! 3. Layouts      manifest         →  layouts/*.json (rewritten)
//! ```
//!
//! Each stage runs to completion before the next starts, and the first error
//! ends the run. Nothing is rolled back: images renamed before a failure keep
//! their new names.
//!
//! Progress is reported through an optional channel so the CLI can print
//! while the library stays silent.

use crate::config::PathsConfig;
use crate::fingerprint::{self, FingerprintError, Renamed};
use crate::layout::{self, LayoutError, LayoutReport};
use crate::manifest::{self, ManifestError, SiteUrl};
use crate::types::ImageManifest;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Fingerprinting failed: {0}")]
    Fingerprint(#[from] FingerprintError),
    #[error("Manifest failed: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Layout patching failed: {0}")]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fingerprint,
    Manifest,
    Layouts,
}

/// Progress events emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    StageStarted(Stage),
    ImageRenamed {
        /// 1-based position in processing order.
        index: usize,
        original: String,
        hashed: String,
    },
    ManifestWritten {
        path: PathBuf,
        image_count: usize,
    },
    LayoutPatched(LayoutReport),
}

/// Everything a build produced.
#[derive(Debug)]
pub struct BuildResult {
    pub renamed: Vec<Renamed>,
    pub manifest: ImageManifest,
    pub layouts: Vec<LayoutReport>,
}

fn emit(events: Option<&Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        // A closed receiver is not an error.
        tx.send(event).ok();
    }
}

/// Run the full pipeline: fingerprint, write manifest, patch layouts.
pub fn run(
    paths: &PathsConfig,
    site: &SiteUrl,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildResult, PipelineError> {
    let events = events.as_ref();

    emit(events, BuildEvent::StageStarted(Stage::Fingerprint));
    let renamed = fingerprint::fingerprint_directory(&paths.images)?;
    for (i, item) in renamed.iter().enumerate() {
        emit(
            events,
            BuildEvent::ImageRenamed {
                index: i + 1,
                original: item.original.clone(),
                hashed: item.hashed.clone(),
            },
        );
    }

    emit(events, BuildEvent::StageStarted(Stage::Manifest));
    let manifest = manifest::build_manifest(manifest::group_images(&renamed), site);
    manifest::write_manifest(&manifest, &paths.manifest)?;
    emit(
        events,
        BuildEvent::ManifestWritten {
            path: paths.manifest.clone(),
            image_count: manifest.images.len(),
        },
    );

    emit(events, BuildEvent::StageStarted(Stage::Layouts));
    let layouts = layout::patch_layouts(&paths.layouts, &manifest)?;
    for report in &layouts {
        emit(events, BuildEvent::LayoutPatched(report.clone()));
    }

    Ok(BuildResult {
        renamed,
        manifest,
        layouts,
    })
}

/// Compute the rename plan and resulting manifest without touching disk.
pub fn preview(
    paths: &PathsConfig,
    site: &SiteUrl,
) -> Result<(Vec<Renamed>, ImageManifest), PipelineError> {
    let plan = fingerprint::plan_directory(&paths.images)?;
    let manifest = manifest::build_manifest(manifest::group_images(&plan), site);
    Ok((plan, manifest))
}

/// Re-apply an existing manifest file to the layouts directory.
pub fn repatch(
    paths: &PathsConfig,
    events: Option<Sender<BuildEvent>>,
) -> Result<Vec<LayoutReport>, PipelineError> {
    let events = events.as_ref();
    let manifest = manifest::read_manifest(&paths.manifest)?;
    emit(events, BuildEvent::StageStarted(Stage::Layouts));
    let layouts = layout::patch_layouts(&paths.layouts, &manifest)?;
    for report in &layouts {
        emit(events, BuildEvent::LayoutPatched(report.clone()));
    }
    Ok(layouts)
}
