//! CLI command implementations.

pub mod extract;
pub mod preview;

pub use extract::{ExtractCommand, ExtractOutcome};
pub use preview::PreviewCommand;
