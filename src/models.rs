// Listing record shared by the parser and the renderer.

/// One business parsed from a row of the export.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub name: String,
    pub slug: String,
    pub map_url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub hours: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub highlights: Vec<String>,
    pub sponsored: bool,
}

pub const RATING_MISSING: &str = "尚無評分";

impl Listing {
    /// CSS modifier for the status badge.
    pub fn status_class(&self) -> &'static str {
        match self.status.as_deref() {
            None => "neutral",
            Some(s) if s.contains("24") => "open-24",
            Some(s) if s.contains("營業") => "",
            Some(_) => "neutral",
        }
    }

    /// Filled stars, `rating` rounded half to even (4.5 -> 4, 3.5 -> 4).
    pub fn stars(&self) -> String {
        match self.rating {
            Some(r) => "★".repeat(r.round_ties_even().clamp(0.0, 5.0) as usize),
            None => String::new(),
        }
    }

    /// e.g. `4.5 ★★★★ （120 則評論）`, or the missing-rating placeholder.
    pub fn rating_display(&self) -> String {
        let Some(rating) = self.rating else {
            return RATING_MISSING.to_string();
        };
        let mut parts = vec![format!("{rating:.1}")];
        let stars = self.stars();
        if !stars.is_empty() {
            parts.push(stars);
        }
        if let Some(n) = self.review_count.filter(|n| *n > 0) {
            parts.push(format!("（{n} 則評論）"));
        }
        parts.join(" ")
    }

    pub fn highlight_preview(&self, limit: usize) -> &[String] {
        &self.highlights[..self.highlights.len().min(limit)]
    }

    /// `tel:` URI for the dialer link; `None` when there is no usable number.
    pub fn tel_href(&self) -> Option<String> {
        let phone = self.phone.as_deref()?;
        let dial: String = phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+' || *c == '-')
            .collect();
        if dial.chars().any(|c| c.is_ascii_digit()) {
            Some(format!("tel:{dial}"))
        } else {
            None
        }
    }

    /// Highlights joined for the client-side keyword filter.
    pub fn search_text(&self) -> String {
        self.highlights.join(" ")
    }
}

#[cfg(test)]
pub(crate) fn sample_listing() -> Listing {
    Listing {
        name: "Joe's Plumbing".to_string(),
        slug: "joes-plumbing".to_string(),
        map_url: Some("https://maps.google.com/?cid=1".to_string()),
        rating: Some(4.5),
        review_count: Some(120),
        category: Some("水電行".to_string()),
        address: Some("1 Main St".to_string()),
        status: Some("營業中".to_string()),
        hours: Some("09:00 開始營業".to_string()),
        phone: Some("04 2234 5678".to_string()),
        image_url: Some("https://img.example/x.jpg".to_string()),
        highlights: vec![
            "Drain Cleaning".to_string(),
            "到府服務".to_string(),
            "24 小時".to_string(),
            "熱水器".to_string(),
            "抓漏".to_string(),
        ],
        sponsored: false,
    }
}
