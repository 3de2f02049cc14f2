//! Class fingerprints for Amazon search-result markup.
//!
//! This file contains every structural marker used to locate result cards and
//! their fields. Update the defaults here when Amazon changes its HTML, or
//! override them from `config.toml` without rebuilding.
//!
//! A fingerprint is a tag name plus a class string. Multi-token class strings
//! must equal the element's whole `class` attribute (token order matters,
//! runs of whitespace are insignificant). A single-token class string matches
//! any element that carries that class.

use crate::error::{Error, Result};
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Result card container.
pub const CONTAINER_TAG: &str = "div";
pub const CONTAINER_CLASS: &str = "sg-col-4-of-24 sg-col-4-of-12 s-result-item s-asin \
     sg-col-4-of-16 AdHolder sg-col s-widget-spacing-small sg-col-4-of-20 gsx-ies-anchor";

/// Product thumbnail.
pub const IMAGE_TAG: &str = "img";
pub const IMAGE_CLASS: &str = "s-image s-image-optimized-rendering";

/// Product title text.
pub const TITLE_TAG: &str = "span";
pub const TITLE_CLASS: &str = "a-size-base-plus a-color-base a-text-normal";

/// Star rating text ("4.5 out of 5 stars").
pub const RATING_TAG: &str = "span";
pub const RATING_CLASS: &str = "a-icon-alt";

/// Whole price (dollars part).
pub const PRICE_TAG: &str = "span";
pub const PRICE_CLASS: &str = "a-price-whole";

/// "200+ bought in past month".
pub const RECENT_SALES_TAG: &str = "span";
pub const RECENT_SALES_CLASS: &str = "a-size-base a-color-secondary";

/// A tag name plus class string identifying one kind of element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub tag: String,
    pub class: String,
}

impl Fingerprint {
    /// Creates a fingerprint, normalizing tag case and class whitespace.
    pub fn new(tag: impl Into<String>, class: impl AsRef<str>) -> Self {
        Self {
            tag: tag.into().trim().to_ascii_lowercase(),
            class: normalize_class(class.as_ref()),
        }
    }

    /// Returns the number of class tokens.
    pub fn token_count(&self) -> usize {
        self.class.split_whitespace().count()
    }

    /// Checks whether an element carries this fingerprint.
    pub fn matches(&self, element: &Element) -> bool {
        if !element.name().eq_ignore_ascii_case(&self.tag) {
            return false;
        }

        let Some(class) = element.attr("class") else {
            return false;
        };

        let class = normalize_class(class);
        if class == self.class {
            return true;
        }

        // Single class names also match as a member of the class list
        self.token_count() == 1 && class.split(' ').any(|c| c == self.class)
    }

    /// Validates and compiles this fingerprint into a matcher.
    pub fn compile(&self, field: &'static str) -> Result<Matcher> {
        let normalized = Fingerprint::new(self.tag.clone(), &self.class);

        if normalized.tag.is_empty()
            || !normalized.tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(Error::InvalidFingerprint {
                field,
                reason: format!("invalid tag name '{}'", self.tag),
            });
        }

        if normalized.class.is_empty() {
            return Err(Error::InvalidFingerprint { field, reason: "empty class".to_string() });
        }

        let selector = Selector::parse(&format!("{}[class]", normalized.tag)).map_err(|e| {
            Error::InvalidFingerprint { field, reason: format!("selector error: {}", e) }
        })?;

        Ok(Matcher { selector, fingerprint: normalized })
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} class=\"{}\">", self.tag, self.class)
    }
}

fn normalize_class(class: &str) -> String {
    class.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A compiled fingerprint, ready to run against a parsed document.
#[derive(Debug, Clone)]
pub struct Matcher {
    selector: Selector,
    fingerprint: Fingerprint,
}

impl Matcher {
    /// Returns every matching element in the document, in document order.
    pub fn select_all<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document.select(&self.selector).filter(|e| self.fingerprint.matches(e.value())).collect()
    }

    /// Returns the first matching descendant of `scope`.
    pub fn find_in<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        scope.select(&self.selector).find(|e| self.fingerprint.matches(e.value()))
    }

    /// The normalized fingerprint this matcher checks.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

/// The full set of fingerprints for one search-results layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fingerprints {
    pub container: Fingerprint,
    pub image: Fingerprint,
    pub title: Fingerprint,
    pub rating: Fingerprint,
    pub price: Fingerprint,
    pub recent_sales: Fingerprint,
}

impl Default for Fingerprints {
    fn default() -> Self {
        Self {
            container: Fingerprint::new(CONTAINER_TAG, CONTAINER_CLASS),
            image: Fingerprint::new(IMAGE_TAG, IMAGE_CLASS),
            title: Fingerprint::new(TITLE_TAG, TITLE_CLASS),
            rating: Fingerprint::new(RATING_TAG, RATING_CLASS),
            price: Fingerprint::new(PRICE_TAG, PRICE_CLASS),
            recent_sales: Fingerprint::new(RECENT_SALES_TAG, RECENT_SALES_CLASS),
        }
    }
}

/// Compiled matchers for every field.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub container: Matcher,
    pub image: Matcher,
    pub title: Matcher,
    pub rating: Matcher,
    pub price: Matcher,
    pub recent_sales: Matcher,
}

impl Selectors {
    /// Compiles a fingerprint set, failing on the first invalid entry.
    pub fn compile(fingerprints: &Fingerprints) -> Result<Self> {
        Ok(Self {
            container: fingerprints.container.compile("container")?,
            image: fingerprints.image.compile("image")?,
            title: fingerprints.title.compile("title")?,
            rating: fingerprints.rating.compile("rating")?,
            price: fingerprints.price.compile("price")?,
            recent_sales: fingerprints.recent_sales.compile("recent_sales")?,
        })
    }

    /// Returns (field name, matcher) pairs, container first.
    pub fn entries(&self) -> [(&'static str, &Matcher); 6] {
        [
            ("container", &self.container),
            ("image", &self.image),
            ("title", &self.title),
            ("rating", &self.rating),
            ("price", &self.price),
            ("recent_sales", &self.recent_sales),
        ]
    }
}

/// Default matchers for the current Amazon layout.
pub static DEFAULT: LazyLock<Selectors> =
    LazyLock::new(|| Selectors::compile(&Fingerprints::default()).unwrap());
