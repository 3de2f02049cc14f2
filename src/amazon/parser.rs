//! HTML extractor for saved Amazon search-result pages.

use crate::amazon::models::Record;
use crate::amazon::selectors::{self, Selectors};
use crate::config::Config;
use crate::error::{Error, Result};
use scraper::{ElementRef, Html};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, trace, warn};
use url::Url;

/// Base URL that relative image sources are resolved against.
pub const DEFAULT_BASE_URL: &str = "https://m.media-amazon.com/images/";

static BASE_URL: LazyLock<Url> = LazyLock::new(|| Url::parse(DEFAULT_BASE_URL).unwrap());

/// Extracts product records from search-result markup.
///
/// Extraction never fails on markup: a page whose layout doesn't match the
/// fingerprints yields no records, and a card missing some fields yields a
/// record with those fields empty.
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: Selectors,
    base_url: Url,
}

impl Default for Extractor {
    fn default() -> Self {
        Self { selectors: selectors::DEFAULT.clone(), base_url: BASE_URL.clone() }
    }
}

impl Extractor {
    /// Creates an extractor for the current Amazon layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an extractor from configured fingerprints and base URL.
    pub fn from_config(config: &Config) -> Result<Self> {
        let selectors = Selectors::compile(&config.fingerprints)?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|source| Error::InvalidBaseUrl { url: config.base_url.clone(), source })?;

        Ok(Self { selectors, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    /// Extracts one record per result card, in document order.
    pub fn extract(&self, html: &str) -> Vec<Record> {
        let document = Html::parse_document(html);

        let cards = self.selectors.container.select_all(&document);
        debug!("Found {} result cards", cards.len());

        let records: Vec<Record> = cards
            .into_iter()
            .map(|card| {
                let record = self.extract_card(card);
                trace!("Extracted record: {:?}", record);
                record
            })
            .collect();

        let empty = records.iter().filter(|r| r.is_empty()).count();
        if empty > 0 {
            debug!("{} of {} cards had no recognizable fields", empty, records.len());
        }

        records
    }

    /// Reads a page from disk and extracts its records.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Vec<Record>> {
        let html = read_document(path)?;
        Ok(self.extract(&html))
    }

    /// Derives a record from a single result card.
    fn extract_card(&self, card: ElementRef) -> Record {
        let link = self
            .selectors
            .image
            .find_in(card)
            .and_then(|img| img.value().attr("src"))
            .map(|src| self.resolve_link(src))
            .unwrap_or_default();

        Record {
            link,
            title: self.field_text(&self.selectors.title, card),
            rating: self.field_text(&self.selectors.rating, card),
            price: self.field_text(&self.selectors.price, card),
            last_month_sold: self.field_text(&self.selectors.recent_sales, card),
        }
    }

    fn field_text(&self, matcher: &selectors::Matcher, card: ElementRef) -> String {
        matcher.find_in(card).map(clean_text).unwrap_or_default()
    }

    /// Turns an image `src` into an absolute URL.
    ///
    /// Sources starting with "http" are kept as-is. Anything else is joined
    /// onto the base URL, so `41abc.jpg` lands under the base path while
    /// `/x.jpg` replaces it. The joined URL is WHATWG-normalized, so spaces
    /// and non-ASCII characters in the path come out percent-encoded.
    pub fn resolve_link(&self, src: &str) -> String {
        if src.starts_with("http") {
            return src.to_string();
        }

        match self.base_url.join(src) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!("Could not resolve image source '{}': {}", src, e);
                src.to_string()
            }
        }
    }
}

/// Extracts records using the default layout fingerprints.
pub fn extract(html: &str) -> Vec<Record> {
    Extractor::default().extract(html)
}

/// Reads a page from disk as UTF-8 text.
pub fn read_document(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    debug!("Reading page from: {}", path.display());

    let bytes =
        std::fs::read(path).map_err(|source| Error::Read { path: path.to_path_buf(), source })?;

    decode_document(&bytes, path).map(str::to_owned)
}

fn decode_document(bytes: &[u8], origin: impl AsRef<Path>) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|source| Error::Decode { path: origin.as_ref().to_path_buf(), source })
}

/// Collapses an element's text: each text node is trimmed, empty ones are
/// dropped, and the rest are concatenated.
pub fn clean_text(element: ElementRef) -> String {
    element.text().map(str::trim).filter(|s| !s.is_empty()).collect()
}
