// Row parser: CSV export -> Listing records.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    config::Settings,
    error::{SiteError, SiteResult},
    models::Listing,
    slug::SlugAllocator,
};

// Positional columns of the Google Maps export.
const COL_MAP_URL: usize = 0;
const COL_NAME: usize = 1;
const COL_RATING: usize = 2;
const COL_REVIEWS: usize = 3;
const COL_CATEGORY: usize = 4;
const COL_ADDRESS: usize = 5;
const COL_STATUS: usize = 6;
const COL_HOURS: usize = 7;
// column 8 is unused
const COL_PHONE: usize = 9;
const COL_IMAGE: usize = 10;
const FIRST_FEATURE_COL: usize = 11;

const BULLET: char = '·';
const MAX_RATING: f64 = 5.0;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("valid regex"));

/// Trims whitespace and bullet separators; `None` if nothing is left.
pub fn tidy(value: Option<&str>) -> Option<String> {
    let cleaned = value?.trim_matches(|c: char| c.is_whitespace() || c == BULLET);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Like [`tidy`], but only keeps absolute http(s) links.
fn tidy_url(value: Option<&str>) -> Option<String> {
    tidy(value).filter(|url| url.starts_with("https://") || url.starts_with("http://"))
}

/// Placeholder display name for a row without one.
pub fn placeholder_name(ordinal: usize) -> String {
    format!("未命名店家-{ordinal}")
}

/// Decimal rating in 0.0..=5.0; anything else counts as "not provided".
pub fn parse_rating(value: Option<&str>) -> Option<f64> {
    let raw = tidy(value)?;
    match raw.parse::<f64>() {
        Ok(r) if r.is_finite() && (0.0..=MAX_RATING).contains(&r) => Some(r),
        _ => {
            tracing::debug!(value = %raw, "Ignoring unusable rating");
            None
        }
    }
}

/// Review count from text like `(1,234)`; non-digits are dropped first.
pub fn parse_review_count(value: Option<&str>) -> Option<u32> {
    let raw = value?;
    let digits = NON_DIGITS.replace_all(raw, "");
    if digits.is_empty() {
        return None;
    }
    match digits.parse::<u32>() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "Ignoring unusable review count");
            None
        }
    }
}

fn is_decorative(text: &str) -> bool {
    !text.chars().any(char::is_alphanumeric)
}

/// Cleans the trailing feature cells. Returns the visible highlights and
/// whether any cell carried the advertising marker.
pub fn collect_highlights<'a>(
    cells: impl IntoIterator<Item = &'a str>,
    ad_marker: &str,
) -> (Vec<String>, bool) {
    let mut highlights: Vec<String> = Vec::new();
    let mut sponsored = false;

    for cell in cells {
        let Some(text) = tidy(Some(cell)) else {
            continue;
        };
        if !ad_marker.is_empty() && text.contains(ad_marker) {
            sponsored = true;
            continue;
        }
        if is_decorative(&text) || text.starts_with("http") {
            continue;
        }
        if !highlights.contains(&text) {
            highlights.push(text);
        }
    }

    (highlights, sponsored)
}

/// Builds one listing from a positional record. `ordinal` is 1-based.
pub fn parse_record(
    record: &StringRecord,
    ordinal: usize,
    settings: &Settings,
    slugs: &mut SlugAllocator,
) -> Listing {
    let cell = |idx: usize| record.get(idx);

    let given_name = tidy(cell(COL_NAME));
    // Slug the real name only; a blank one falls back to `shop-{ordinal}`.
    let slug = slugs.allocate(given_name.as_deref().unwrap_or(""), ordinal);
    let name = given_name.unwrap_or_else(|| placeholder_name(ordinal));
    let features = record.iter().skip(FIRST_FEATURE_COL);
    let (highlights, sponsored) = collect_highlights(features, &settings.ad_marker);

    Listing {
        map_url: tidy_url(cell(COL_MAP_URL)),
        rating: parse_rating(cell(COL_RATING)),
        review_count: parse_review_count(cell(COL_REVIEWS)),
        category: tidy(cell(COL_CATEGORY)),
        address: tidy(cell(COL_ADDRESS)),
        status: tidy(cell(COL_STATUS)),
        hours: tidy(cell(COL_HOURS).map(|h| h.replace(BULLET, "")).as_deref()),
        phone: tidy(cell(COL_PHONE)),
        image_url: tidy_url(cell(COL_IMAGE)),
        highlights,
        sponsored,
        name,
        slug,
    }
}

/// Reads every listing from `path`, allocating slugs in row order.
pub fn read_listings(path: &Path, settings: &Settings) -> SiteResult<Vec<Listing>> {
    if !path.is_file() {
        return Err(SiteError::MissingInput(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut slugs = SlugAllocator::new(settings.slug_script);
    let mut listings = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let ordinal = index + 1;
        if record.iter().all(|field| field.trim().is_empty()) {
            tracing::debug!(ordinal, "Skipping blank row");
            continue;
        }
        let listing = parse_record(&record, ordinal, settings, &mut slugs);
        tracing::debug!(
            ordinal,
            slug = %listing.slug,
            highlights = listing.highlights.len(),
            sponsored = listing.sponsored,
            "Parsed listing"
        );
        listings.push(listing);
    }

    tracing::info!("Parsed {} listings from {}", listings.len(), path.display());
    Ok(listings)
}
