//! Data model for records extracted from a search-results page.

use serde::{Deserialize, Serialize};

/// One product card from a search-results page.
///
/// Every field is free text exactly as captured from the page. A field whose
/// element was missing is the empty string, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Absolute product image URL
    pub link: String,
    /// Product title
    pub title: String,
    /// Rating text, e.g. "4.5 out of 5 stars"
    pub rating: String,
    /// Whole price digits
    pub price: String,
    /// Recent sales text, e.g. "200+ bought in past month"
    pub last_month_sold: String,
}

impl Record {
    /// Column names in output order.
    pub const COLUMNS: [&'static str; 5] = ["link", "title", "rating", "price", "last_month_sold"];

    /// Returns field values in the same order as [`Record::COLUMNS`].
    pub fn fields(&self) -> [&str; 5] {
        [
            self.link.as_str(),
            self.title.as_str(),
            self.rating.as_str(),
            self.price.as_str(),
            self.last_month_sold.as_str(),
        ]
    }

    /// Returns true if no field was found on the page.
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|f| f.is_empty())
    }
}
