//! # asset-stamp
//!
//! Build-time fingerprinting for static site images. Content hashes go into
//! the filenames, a manifest maps each logical image to its published URLs,
//! and layout documents get those URLs written straight into their image
//! components.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Fingerprint  public/assets/images/  →  renamed in place (<name>.<hash>.<ext>)
//! 2. Manifest     renamed files          →  public/image-manifest.json
//! 3. Layouts      manifest               →  public/layouts/*.json (rewritten)
//! ```
//!
//! The stages run strictly in order in a single thread. There is no cache and
//! no rollback: every build renames every file it finds, so the image
//! directory is expected to hold freshly exported originals.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`fingerprint`] | Stage 1: hashes file contents and renames files in place |
//! | [`manifest`] | Stage 2: groups variants by image ID and resolves public URLs |
//! | [`layout`] | Stage 3: injects URLs and srcsets into layout image components |
//! | [`pipeline`] | Runs the stages in order and reports progress events |
//! | [`config`] | `asset-stamp.toml` loading, validation, and site identity |
//! | [`types`] | Manifest types shared between the build and `patch` |
//! | [`naming`] | Filename parsing: extension, size suffix, image ID |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Image IDs From Filenames
//!
//! Size variants are exported as `<name>.<width>.<ext>`. Dropping the trailing
//! numeric segment gives the image ID, so `hero.640.png`, `hero.1280.png` and
//! `hero.640.webp` all describe `hero`. Layout authors reference images by
//! that ID and never deal with hashes.
//!
//! ## Primary URL By String Order
//!
//! Each format gets one primary URL: the hashed filename that sorts first in
//! descending string order. This is not the largest size in general
//! (`hero.640` beats `hero.1280`). Published pages depend on the current
//! choice, so it is kept rather than "fixed" to a numeric sort.
//!
//! ## Explicit Site Identity
//!
//! URLs need the GitHub owner and repository. The CLI resolves them once from
//! config or environment into a [`config::SiteIdentity`]; library code takes
//! it as a parameter and never reads the environment.

pub mod config;
pub mod fingerprint;
pub mod layout;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
