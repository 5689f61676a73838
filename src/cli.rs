use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Option-flow feature panel and forward-IC research tool: build daily
/// volume/open-interest features from option quotes and score them against
/// next-day returns.
#[derive(Parser)]
#[command(name = "option-ic", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Output the JSON schema for pipeline configuration files
    Schema,

    /// Output the default pipeline configuration as JSON
    DefaultConfig,

    /// Report data-quality diagnostics for a quote CSV
    Validate {
        /// Path to the option quote CSV
        file: PathBuf,
    },

    /// Build the daily feature panel and rank features by forward IC
    Analyse {
        /// Path to the option quote CSV
        file: PathBuf,

        /// Pipeline configuration JSON (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the joined daily panel to this CSV file
        #[arg(long)]
        panel_out: Option<PathBuf>,

        /// Write the ranked IC summary to this CSV file
        #[arg(long)]
        summary_out: Option<PathBuf>,

        /// Write decile and rolling-IC series for the top features to this JSON file
        #[arg(long)]
        diagnostics_out: Option<PathBuf>,

        /// Score only these panel columns (comma separated)
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<String>>,

        /// Number of top-ranked features that get diagnostic series
        #[arg(long)]
        top: Option<usize>,
    },

    /// Generate a synthetic option quote CSV
    Example {
        /// Number of trading days to generate
        #[arg(long, default_value = "600")]
        days: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Starting spot price
        #[arg(long, default_value = "400.0")]
        spot: f64,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}
