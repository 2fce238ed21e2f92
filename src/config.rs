//! Build configuration.
//!
//! Handles loading, validating, and merging `asset-stamp.toml`. Stock defaults
//! match the layout of a typical published site, so most projects need no
//! config file at all.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! images = "public/assets/images"         # Directory of images to fingerprint
//! layouts = "public/layouts"              # Directory of layout *.json files
//! manifest = "public/image-manifest.json" # Manifest output path
//!
//! [site]
//! image_subpath = "assets/images"         # Path of the images below the site root
//! owner = "my-org"                        # Overrides GITHUB_REPOSITORY_OWNER
//! repository = "my-site"                  # Overrides GITHUB_REPOSITORY
//! ```
//!
//! ## Site Identity
//!
//! Public URLs have the form
//! `https://{owner}.github.io/{repository}/{image_subpath}/{file}`. Owner and
//! repository come from `[site]` when set, otherwise from the CI environment.
//! The library never reads the environment itself: [`SiteIdentity::resolve`]
//! takes a lookup function and the result is passed down explicitly.
//!
//! A missing owner or repository is not an error. The URL simply carries the
//! literal `undefined` in its place, which is what published sites built
//! without CI variables have always contained.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "asset-stamp.toml";

/// Environment variable holding the repository owner in CI.
pub const OWNER_ENV: &str = "GITHUB_REPOSITORY_OWNER";

/// Environment variable holding `owner/repository` in CI.
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `asset-stamp.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StampConfig {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Public URL settings.
    pub site: SiteConfig,
}

impl StampConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("paths.images", &self.paths.images),
            ("paths.layouts", &self.paths.layouts),
            ("paths.manifest", &self.paths.manifest),
        ] {
            if value.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        let subpath = &self.site.image_subpath;
        if subpath.starts_with('/') || subpath.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.image_subpath must not start or end with '/'".into(),
            ));
        }
        Ok(())
    }
}

/// Filesystem locations the pipeline reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub images: PathBuf,
    pub layouts: PathBuf,
    pub manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            images: PathBuf::from("public/assets/images"),
            layouts: PathBuf::from("public/layouts"),
            manifest: PathBuf::from("public/image-manifest.json"),
        }
    }
}

/// Public URL settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Path of the image directory below the site root, no surrounding slashes.
    pub image_subpath: String,
    /// Site owner. Falls back to `GITHUB_REPOSITORY_OWNER` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Repository name. Falls back to the part of `GITHUB_REPOSITORY` after `/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            image_subpath: "assets/images".to_string(),
            owner: None,
            repository: None,
        }
    }
}

/// Owner and repository used to build public URLs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteIdentity {
    pub owner: Option<String>,
    pub repository: Option<String>,
}

impl SiteIdentity {
    pub fn new(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            repository: Some(repository.into()),
        }
    }

    /// Resolve identity from config, falling back to `lookup` for values the
    /// config leaves unset.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`. The repository is the
    /// segment after the first `/` of `GITHUB_REPOSITORY`; a value without a
    /// slash yields no repository.
    pub fn resolve(site: &SiteConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let owner = site.owner.clone().or_else(|| lookup(OWNER_ENV));
        let repository = site.repository.clone().or_else(|| {
            lookup(REPOSITORY_ENV).and_then(|full| full.split('/').nth(1).map(str::to_string))
        });
        Self { owner, repository }
    }

    /// Names of the identity parts that are missing.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.owner.is_none() {
            missing.push("owner");
        }
        if self.repository.is_none() {
            missing.push("repository");
        }
        missing
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(StampConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<StampConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: StampConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, merged on top of stock defaults.
pub fn load_config(path: &Path) -> Result<StampConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `asset-stamp.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# asset-stamp Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Locations
# ---------------------------------------------------------------------------
[paths]
# Images to fingerprint. Every file directly in this directory is renamed
# to <name>.<hash>.<ext>. Subdirectories are left alone.
images = "public/assets/images"

# Layout documents. Every *.json file here is rewritten with resolved URLs.
layouts = "public/layouts"

# Where the image manifest is written (overwritten on every build).
manifest = "public/image-manifest.json"

# ---------------------------------------------------------------------------
# Public URLs
# ---------------------------------------------------------------------------
[site]
# Path of the image directory below the site root.
image_subpath = "assets/images"

# URLs are https://<owner>.github.io/<repository>/<image_subpath>/<file>.
# When unset, owner comes from GITHUB_REPOSITORY_OWNER and repository from
# the part of GITHUB_REPOSITORY after the slash.
# owner = "my-org"
# repository = "my-site"
"##
}
