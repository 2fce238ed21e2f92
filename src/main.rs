use asset_stamp::config::{self, SiteIdentity, StampConfig};
use asset_stamp::manifest::SiteUrl;
use asset_stamp::{output, pipeline};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "asset-stamp")]
#[command(about = "Fingerprint site images and patch layouts with their URLs")]
#[command(long_about = "\
Fingerprint site images and patch layouts with their URLs

Every file in the image directory is renamed to <name>.<hash>.<ext>, where
<hash> is the first 8 hex characters of the SHA-256 of its contents. Size
variants named <id>.<width>.<ext> are grouped under <id> in the manifest.
Layout JSON files get resolved URLs written into their image components.

Site structure (defaults):

  public/
  ├── assets/images/
  │   ├── hero.640.png         # → hero.640.3fa2c1d9.png, image id \"hero\"
  │   ├── hero.1280.png
  │   └── hero.640.webp
  ├── layouts/
  │   └── home.json            # { \"components\": [{ \"type\": \"image\", \"id\": \"hero\" }] }
  └── image-manifest.json      # written by build

URLs are https://<owner>.github.io/<repository>/assets/images/<file>. Owner
and repository come from asset-stamp.toml or GITHUB_REPOSITORY_OWNER and
GITHUB_REPOSITORY.

Renaming is destructive and not idempotent: building twice hashes the hashed
names again. Run 'asset-stamp check' to preview.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Image directory (overrides paths.images)
    #[arg(long, global = true)]
    images: Option<PathBuf>,

    /// Layouts directory (overrides paths.layouts)
    #[arg(long, global = true)]
    layouts: Option<PathBuf>,

    /// Manifest path (overrides paths.manifest)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: fingerprint → manifest → layouts
    Build,
    /// Show the renames and manifest a build would produce, without changes
    Check,
    /// Re-apply an existing manifest to the layouts directory
    Patch,
    /// Print a stock asset-stamp.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Build => {
            let stamp_config = load_with_overrides(&cli)?;
            let paths = &stamp_config.paths;
            let site = resolve_site(&stamp_config);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_build_event(&event);
                }
            });
            let result = pipeline::run(paths, &site, Some(tx));
            printer.join().ok();
            let result = result?;
            println!(
                "==> Build complete: {} files, {} images, {} layouts",
                result.renamed.len(),
                result.manifest.images.len(),
                result.layouts.len()
            );
        }
        Command::Check => {
            let stamp_config = load_with_overrides(&cli)?;
            let paths = &stamp_config.paths;
            let site = resolve_site(&stamp_config);
            println!("==> Checking {}", paths.images.display());
            let (plan, manifest) = pipeline::preview(paths, &site)?;
            output::print_preview(&plan, &manifest);
            println!("==> No files were changed");
        }
        Command::Patch => {
            let stamp_config = load_with_overrides(&cli)?;
            let paths = &stamp_config.paths;
            println!("==> Applying {}", paths.manifest.display());
            let reports = pipeline::repatch(paths, None)?;
            for report in reports {
                output::print_build_event(&pipeline::BuildEvent::LayoutPatched(report));
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file and apply path flags on top.
fn load_with_overrides(cli: &Cli) -> Result<StampConfig, config::ConfigError> {
    let mut stamp_config = config::load_config(&cli.config)?;
    if let Some(images) = &cli.images {
        stamp_config.paths.images = images.clone();
    }
    if let Some(layouts) = &cli.layouts {
        stamp_config.paths.layouts = layouts.clone();
    }
    if let Some(manifest) = &cli.manifest {
        stamp_config.paths.manifest = manifest.clone();
    }
    stamp_config.validate()?;
    Ok(stamp_config)
}

/// Resolve the public base URL, warning when identity is incomplete.
fn resolve_site(stamp_config: &StampConfig) -> SiteUrl {
    let identity = SiteIdentity::resolve(&stamp_config.site, |key| std::env::var(key).ok());
    if let Some(warning) = output::format_identity_warning(&identity) {
        eprintln!("{}", warning);
    }
    SiteUrl::new(&identity, &stamp_config.site.image_subpath)
}
