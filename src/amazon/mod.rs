//! Amazon search-result extraction: fingerprints, record model and extractor.

pub mod models;
pub mod parser;
pub mod selectors;

pub use models::Record;
pub use parser::{extract, read_document, Extractor};
pub use selectors::{Fingerprint, Fingerprints};
