//! Preview command implementation.

use crate::amazon::Extractor;
use crate::config::{Config, OutputFormat};
use crate::format::Formatter;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Extracts records from a saved page and renders them for the terminal.
pub struct PreviewCommand {
    config: Config,
}

impl PreviewCommand {
    /// Creates a new preview command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the rendered records. CSV config falls back to the table view.
    pub fn execute(&self, input: &Path) -> Result<String> {
        let extractor =
            Extractor::from_config(&self.config).context("Invalid extractor configuration")?;

        let records = extractor.extract_file(input)?;
        info!("Extracted {} records from {}", records.len(), input.display());

        let format = match self.config.format {
            OutputFormat::Json => OutputFormat::Json,
            _ => OutputFormat::Table,
        };

        Ok(Formatter::new(format).format_records(&records))
    }
}
