// Generator settings, loaded with the 'config' crate.
// Every key has a default so a bare run needs no config file at all.

use config::{Config, File};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{SiteError, SiteResult};
use crate::slug::SlugScript;

// Relative, slash-separated, URL-safe segments; no `.`/`..`, no leading slash.
static LISTINGS_DIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+(/[A-Za-z0-9_-]+)*$").expect("valid regex"));

/// Base name of the optional settings file (`sitegen.toml`).
pub const CONFIG_FILE: &str = "sitegen";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CSV export to read.
    pub input_path: PathBuf,
    /// Root of the generated site. Wiped and rebuilt on every run.
    pub output_dir: PathBuf,
    /// Subdirectory of `output_dir` holding one folder per listing. May be
    /// empty (pages sit directly under `output_dir`) or nested (`a/b`).
    pub listings_dir: String,
    pub slug_script: SlugScript,
    /// Feature cells containing this text mark the listing as sponsored.
    pub ad_marker: String,
    /// Number of highlight chips shown on an index card.
    pub card_highlight_limit: usize,
    pub placeholder_image: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            input_path: PathBuf::from("google-2025-12-23.csv"),
            output_dir: PathBuf::from("docs"),
            listings_dir: "shops".to_string(),
            slug_script: SlugScript::Ascii,
            ad_marker: "廣告".to_string(),
            card_highlight_limit: 4,
            placeholder_image: "https://placehold.co/800x500?text=Plumbing+Service".to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> SiteResult<Self> {
        Self::from_file(CONFIG_FILE)
    }

    /// Loads settings from `name` (any extension `config` understands), falling
    /// back to defaults for missing keys or a missing file.
    pub fn from_file(name: &str) -> SiteResult<Self> {
        let builder = Config::builder().add_source(File::with_name(name).required(false));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values that would put pages outside `output_dir` or break links.
    pub fn validate(&self) -> SiteResult<()> {
        if !self.listings_dir.is_empty() && !LISTINGS_DIR.is_match(&self.listings_dir) {
            return Err(SiteError::InvalidSetting {
                key: "listings_dir",
                reason: format!(
                    "{:?} must be empty or relative segments of letters, digits, `-` or `_` joined by `/`",
                    self.listings_dir
                ),
            });
        }
        Ok(())
    }

    fn listing_segments(&self) -> impl Iterator<Item = &str> {
        self.listings_dir.split('/').filter(|s| !s.is_empty())
    }

    /// Relative path from a listing page back to the site root, e.g. `../../`.
    pub fn page_root(&self) -> String {
        "../".repeat(self.listing_segments().count() + 1)
    }

    /// Index-relative link to the page for `slug`.
    pub fn listing_href(&self, slug: &str) -> String {
        let mut parts: Vec<&str> = self.listing_segments().collect();
        parts.push(slug);
        format!("./{}/index.html", parts.join("/"))
    }

    /// Directory holding the per-listing pages.
    pub fn pages_dir(&self) -> PathBuf {
        self.output_dir.join(&self.listings_dir)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.output_dir.join("assets")
    }
}
