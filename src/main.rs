//! amz-extract - Turn saved Amazon search-result pages into CSV

use amz_extract::commands::{ExtractCommand, PreviewCommand};
use amz_extract::config::{Config, OutputFormat};
use amz_extract::Extractor;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-extract",
    version,
    about = "Extract product records from saved Amazon search-result pages",
    long_about = "Reads an Amazon search-results page saved from a browser and writes one \
                  row per result card (image link, title, rating, price, recent sales) to CSV."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL for relative image sources
    #[arg(long, global = true, env = "AMZ_EXTRACT_BASE_URL")]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records from a saved page into a file
    #[command(alias = "x")]
    Extract {
        /// Saved HTML page
        input: PathBuf,

        /// Destination file (defaults to the input path with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: csv, json or table
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Print extracted records to the terminal
    #[command(alias = "p")]
    Preview {
        /// Saved HTML page
        input: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the active class fingerprints
    Fingerprints,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Commands::Extract { input, output, format } => {
            if let Some(format) = format {
                config.format = format;
            }

            let cmd = ExtractCommand::new(config);
            let outcome = cmd.execute(&input, output.as_deref())?;
            println!("{}", outcome);
        }

        Commands::Preview { input, json } => {
            config.format = if json { OutputFormat::Json } else { OutputFormat::Table };

            let cmd = PreviewCommand::new(config);
            println!("{}", cmd.execute(&input)?);
        }

        Commands::Fingerprints => {
            let extractor = Extractor::from_config(&config)?;

            println!("Base URL: {}\n", extractor.base_url());
            println!("{:<14} {}", "Field", "Fingerprint");
            println!("{:-<14} {:-<40}", "", "");

            for (field, matcher) in extractor.selectors().entries() {
                println!("{:<14} {}", field, matcher.fingerprint());
            }
        }
    }

    Ok(())
}
