//! Extract command implementation.

use crate::amazon::parser::read_document;
use crate::amazon::Extractor;
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Summary of a completed extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOutcome {
    pub records: usize,
    pub destination: PathBuf,
}

impl fmt::Display for ExtractOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Saved {} records to {}", self.records, self.destination.display())
    }
}

/// Extracts records from a saved page and writes them to a file.
pub struct ExtractCommand {
    config: Config,
}

impl ExtractCommand {
    /// Creates a new extract command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the extraction and writes the output file.
    pub fn execute(&self, input: &Path, output: Option<&Path>) -> Result<ExtractOutcome> {
        let extractor =
            Extractor::from_config(&self.config).context("Invalid extractor configuration")?;

        let destination = match output {
            Some(path) => path.to_path_buf(),
            None => default_destination(input, self.config.format.extension()),
        };

        if is_same_file(&destination, input) {
            bail!(
                "Refusing to overwrite the input file {}; pass --output",
                input.display()
            );
        }

        info!("Extracting records from: {}", input.display());

        let html = read_document(input)?;
        let records = extractor.extract(&html);

        if records.is_empty() {
            warn!("No result cards matched; the page layout may have changed");
        }

        Formatter::new(self.config.format).write(&records, &destination)?;

        info!("Wrote {} records as {}", records.len(), self.config.format);

        Ok(ExtractOutcome { records: records.len(), destination })
    }
}

/// Checks whether two paths name the same file, resolving `..` and links.
/// Falls back to comparing the paths as written when either can't be resolved.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Swaps the input's extension for the output format's.
pub fn default_destination(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}
