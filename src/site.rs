// Site writer: runs parse -> render -> write over the whole export.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    config::Settings,
    error::{SiteError, SiteResult},
    models::Listing,
    parser,
    render,
};

const STYLESHEET: &str = include_str!("../assets/style.css");
const SCRIPT: &str = include_str!("../assets/main.js");

/// Outcome of one generation run.
#[derive(Debug)]
pub struct GenerationReport {
    pub listings: usize,
    pub pages_dir: PathBuf,
}

fn write_file(path: &Path, contents: &str) -> SiteResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| SiteError::io(path, e))
}

/// Refuses an existing `output` that is, or contains, the working directory
/// or the input file.
fn check_output_dir(output: &Path, input: &Path) -> SiteResult<()> {
    if !output.exists() {
        return Ok(());
    }
    let output = output.canonicalize().map_err(|e| SiteError::io(output, e))?;
    let cwd = std::env::current_dir()
        .and_then(|dir| dir.canonicalize())
        .map_err(|e| SiteError::io(".", e))?;
    let input = input.canonicalize().map_err(|e| SiteError::io(input, e))?;

    if cwd.starts_with(&output) || input.starts_with(&output) {
        tracing::error!("Output directory {} would remove the input or working directory", output.display());
        return Err(SiteError::UnsafeOutputDir(output));
    }
    Ok(())
}

/// Deletes the previous output and recreates the empty directory layout.
fn reset_output_dir(settings: &Settings) -> SiteResult<()> {
    let root = &settings.output_dir;
    check_output_dir(root, &settings.input_path)?;
    if root.exists() {
        tracing::debug!("Removing previous output at {}", root.display());
        fs::remove_dir_all(root).map_err(|e| SiteError::io(root, e))?;
    }
    for dir in [settings.assets_dir(), settings.pages_dir()] {
        fs::create_dir_all(&dir).map_err(|e| SiteError::io(&dir, e))?;
    }
    Ok(())
}

fn write_assets(settings: &Settings) -> SiteResult<()> {
    let assets = settings.assets_dir();
    write_file(&assets.join("style.css"), STYLESHEET)?;
    write_file(&assets.join("main.js"), SCRIPT)
}

fn write_listing_page(listing: &Listing, settings: &Settings) -> SiteResult<()> {
    let html = render::render_listing(listing, settings)?;
    let path = settings.pages_dir().join(&listing.slug).join("index.html");
    write_file(&path, &html)
}

/// Regenerates the whole site from `settings.input_path`.
///
/// The input is fully parsed before anything under `output_dir` is touched,
/// so a missing or unreadable export leaves the previous site in place.
pub fn generate(settings: &Settings) -> SiteResult<GenerationReport> {
    settings.validate()?;
    let listings = parser::read_listings(&settings.input_path, settings)?;

    reset_output_dir(settings)?;
    write_assets(settings)?;

    for listing in &listings {
        write_listing_page(listing, settings)?;
    }
    tracing::info!("Wrote {} listing pages", listings.len());

    let index = render::render_index(&listings, settings)?;
    write_file(&settings.output_dir.join("index.html"), &index)?;
    tracing::info!("Wrote index to {}", settings.output_dir.display());

    Ok(GenerationReport {
        listings: listings.len(),
        pages_dir: settings.pages_dir(),
    })
}
