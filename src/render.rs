// Page rendering: askama templates under `templates/`.
// Askama escapes every interpolated value for HTML unless marked `|safe`.

use std::collections::BTreeSet;

use askama::Template;

use crate::{config::Settings, error::SiteResult, models::Listing};

/// Distinct, sorted values for the index page's filter dropdowns.
#[derive(Debug, Default, PartialEq)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub categories: Vec<String>,
}

impl FilterOptions {
    pub fn from_listings(listings: &[Listing]) -> Self {
        let statuses: BTreeSet<&str> = listings.iter().filter_map(|l| l.status.as_deref()).collect();
        let categories: BTreeSet<&str> = listings
            .iter()
            .filter_map(|l| l.category.as_deref())
            .collect();

        FilterOptions {
            statuses: statuses.into_iter().map(str::to_string).collect(),
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }
}

/// One index card: the listing plus the values resolved from settings.
struct Card<'a> {
    listing: &'a Listing,
    href: String,
    image: &'a str,
    preview: &'a [String],
}

impl<'a> Card<'a> {
    fn new(listing: &'a Listing, settings: &'a Settings) -> Self {
        Card {
            listing,
            href: settings.listing_href(&listing.slug),
            image: image_src(listing, settings),
            preview: listing.highlight_preview(settings.card_highlight_limit),
        }
    }
}

fn image_src<'a>(listing: &'a Listing, settings: &'a Settings) -> &'a str {
    listing
        .image_url
        .as_deref()
        .unwrap_or(&settings.placeholder_image)
}

// Template for the top-level index page
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    root: &'a str,
    cards: Vec<Card<'a>>,
    filters: FilterOptions,
}

// Template for one listing's own page, `listings_dir` depth + 1 below the root
#[derive(Template)]
#[template(path = "listing.html")]
struct ListingTemplate<'a> {
    root: String,
    listing: &'a Listing,
    image: &'a str,
}

/// Renders the index page with a card for every listing, in input order.
pub fn render_index(listings: &[Listing], settings: &Settings) -> SiteResult<String> {
    let template = IndexTemplate {
        root: "./",
        cards: listings.iter().map(|l| Card::new(l, settings)).collect(),
        filters: FilterOptions::from_listings(listings),
    };
    match template.render() {
        Ok(html) => Ok(html),
        Err(e) => {
            tracing::error!("Failed to render index template: {}", e);
            Err(e.into())
        }
    }
}

/// Renders the detail page for `listing`.
pub fn render_listing(listing: &Listing, settings: &Settings) -> SiteResult<String> {
    let template = ListingTemplate {
        root: settings.page_root(),
        listing,
        image: image_src(listing, settings),
    };
    match template.render() {
        Ok(html) => Ok(html),
        Err(e) => {
            tracing::error!(slug = %listing.slug, "Failed to render listing template: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RATING_MISSING, sample_listing};

    fn bare_listing() -> Listing {
        Listing {
            name: "無資料水電".to_string(),
            slug: "shop-3".to_string(),
            map_url: None,
            rating: None,
            review_count: None,
            category: None,
            address: None,
            status: None,
            hours: None,
            phone: None,
            image_url: None,
            highlights: Vec::new(),
            sponsored: false,
        }
    }

    #[test]
    fn filter_options_are_distinct_and_sorted() {
        let listings = vec![
            Listing {
                status: Some("營業中".to_string()),
                category: Some("水電行".to_string()),
                ..sample_listing()
            },
            Listing {
                status: Some("24 小時營業".to_string()),
                category: Some("電器行".to_string()),
                ..sample_listing()
            },
            Listing {
                status: Some("營業中".to_string()),
                category: None,
                ..sample_listing()
            },
            bare_listing(),
        ];
        let filters = FilterOptions::from_listings(&listings);
        assert_eq!(filters.statuses, vec!["24 小時營業", "營業中"]);
        assert_eq!(filters.categories, vec!["水電行", "電器行"]);
    }

    #[test]
    fn index_has_card_per_listing() {
        let listings = vec![
            sample_listing(),
            Listing {
                slug: "joes-plumbing-2".to_string(),
                ..sample_listing()
            },
        ];
        let html = render_index(&listings, &Settings::default()).unwrap();

        assert_eq!(html.matches("<article class=\"card\"").count(), 2);
        assert!(html.contains("shops/joes-plumbing/index.html"));
        assert!(html.contains("shops/joes-plumbing-2/index.html"));
        assert!(html.contains("4.5 ★★★★ （120 則評論）"));
        assert!(html.contains("tel:0422345678"));
        assert!(html.contains("maps.google.com"));
        assert!(html.contains("assets/main.js"));
        assert!(html.contains("<option value=\"營業中\">營業中</option>"));
    }

    #[test]
    fn index_card_preview_is_bounded() {
        let settings = Settings {
            card_highlight_limit: 2,
            ..Settings::default()
        };
        let html = render_index(&[sample_listing()], &settings).unwrap();
        assert!(html.contains("<span class=\"chip\">Drain Cleaning</span>"));
        assert!(html.contains("<span class=\"chip\">到府服務</span>"));
        assert!(!html.contains("<span class=\"chip\">熱水器</span>"));
    }

    #[test]
    fn missing_fields_render_placeholders() {
        let listing = bare_listing();
        let settings = Settings::default();

        let index = render_index(std::slice::from_ref(&listing), &settings).unwrap();
        assert!(index.contains(RATING_MISSING));
        assert!(!index.contains("0.0"));
        assert!(!index.contains("tel:"));
        assert!(!index.contains("Google 地圖</a>"));
        assert!(index.contains("地址未提供"));
        assert!(index.contains("placehold.co"));

        let detail = render_listing(&listing, &settings).unwrap();
        assert!(detail.contains(RATING_MISSING));
        assert!(!detail.contains("0.0"));
        assert!(!detail.contains("tel:"));
        assert!(!detail.contains("查看地圖路線"));
        assert!(!detail.contains("在 Google 地圖開啟"));
        assert!(detail.contains("未提供電話"));
        assert!(detail.contains("營業時間未提供"));
        assert!(detail.contains("尚未提供額外服務資訊"));
    }

    #[test]
    fn detail_page_lists_everything() {
        let listing = Listing {
            sponsored: true,
            ..sample_listing()
        };
        let html = render_listing(&listing, &Settings::default()).unwrap();

        assert!(html.contains("Plumbing | 水電行專屬網站</title>"));
        for feature in &listing.highlights {
            assert!(html.contains(feature.as_str()), "missing {feature}");
        }
        assert!(html.contains("href=\"../../index.html\""));
        assert!(html.contains("href=\"../../assets/style.css\""));
        assert!(html.contains("tel:0422345678"));
        assert!(html.contains("04 2234 5678"));
        assert!(html.contains("09:00 開始營業"));
        assert!(html.contains("贊助商"));
        assert!(!html.contains("尚未提供額外服務資訊"));
    }

    #[test]
    fn links_follow_listings_dir_depth() {
        let listing = sample_listing();

        let flat = Settings {
            listings_dir: String::new(),
            ..Settings::default()
        };
        let index = render_index(std::slice::from_ref(&listing), &flat).unwrap();
        assert!(index.contains("href=\"./joes-plumbing/index.html\""));
        let detail = render_listing(&listing, &flat).unwrap();
        assert!(detail.contains("href=\"../index.html\""));
        assert!(detail.contains("href=\"../assets/style.css\""));

        let nested = Settings {
            listings_dir: "a/b".to_string(),
            ..Settings::default()
        };
        let index = render_index(std::slice::from_ref(&listing), &nested).unwrap();
        assert!(index.contains("href=\"./a/b/joes-plumbing/index.html\""));
        let detail = render_listing(&listing, &nested).unwrap();
        assert!(detail.contains("href=\"../../../index.html\""));
        assert!(detail.contains("href=\"../../../assets/style.css\""));
    }

    #[test]
    fn user_text_is_escaped() {
        let listing = Listing {
            name: "<script>alert(1)</script>".to_string(),
            address: Some("\"><img onerror=x>".to_string()),
            highlights: vec!["<b>bold</b>".to_string()],
            ..sample_listing()
        };
        let settings = Settings::default();

        for html in [
            render_index(std::slice::from_ref(&listing), &settings).unwrap(),
            render_listing(&listing, &settings).unwrap(),
        ] {
            assert!(!html.contains("<script>alert(1)</script>"));
            assert!(html.contains("&lt;script&gt;"));
            assert!(!html.contains("\"><img onerror=x>"));
            assert!(!html.contains("<b>bold</b>"));
        }
    }
}
