// URL slugs for listing pages.

use std::collections::HashSet;

use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Which characters survive slugging besides ASCII letters and digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugScript {
    /// ASCII letters and digits only.
    #[default]
    Ascii,
    /// Also keeps CJK unified ideographs, so Chinese names stay readable.
    Native,
}

impl SlugScript {
    fn keeps(self, c: char) -> bool {
        c.is_ascii_alphanumeric() || (self == SlugScript::Native && is_cjk_ideograph(c))
    }
}

fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Turns a display name into a lowercase, dash-separated slug. May be empty.
pub fn slugify(name: &str, script: SlugScript) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.nfkd() {
        // "Joe's" -> "joes", "Café" -> "cafe"
        if is_combining_mark(c) || c == '\'' || c == '\u{2019}' {
            continue;
        }
        if script.keeps(c) {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Hands out unique slugs for one generation run.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    script: SlugScript,
    seen: HashSet<String>,
}

impl SlugAllocator {
    pub fn new(script: SlugScript) -> Self {
        SlugAllocator {
            script,
            seen: HashSet::new(),
        }
    }

    /// Allocates a slug for `name`. `ordinal` is the 1-based row position and
    /// only used when the name yields nothing sluggable.
    pub fn allocate(&mut self, name: &str, ordinal: usize) -> String {
        let mut base = slugify(name, self.script);
        if base.is_empty() {
            base = format!("shop-{ordinal}");
        }

        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.seen.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }

        self.seen.insert(candidate.clone());
        candidate
    }
}
