//! amz-extract - Turn saved Amazon search-result pages into CSV
//!
//! Result cards are located by their class fingerprints, and each card yields
//! one record of image link, title, rating, price and recent sales. Missing
//! fields are left empty instead of failing the page.

pub mod amazon;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;

pub use amazon::{extract, Extractor, Record};
pub use config::Config;
pub use error::{Error, Result};
pub use format::write_csv;
