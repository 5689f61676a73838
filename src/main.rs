use clap::Parser;
use tracing_subscriber::EnvFilter;

use option_ic::{example, pipeline, schema, validate};

mod cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Schema => schema::run(),
        cli::Command::DefaultConfig => schema::run_default_config(),
        cli::Command::Validate { file } => validate::run(&file),
        cli::Command::Analyse {
            file,
            config,
            panel_out,
            summary_out,
            diagnostics_out,
            features,
            top,
        } => pipeline::run(&pipeline::AnalyseConfig {
            quotes_path: file,
            config_path: config,
            panel_out,
            summary_out,
            diagnostics_out,
            features,
            top,
        }),
        cli::Command::Example {
            days,
            seed,
            spot,
            output,
        } => example::run(
            &example::ExampleConfig {
                days,
                seed,
                start_spot: spot,
            },
            output.as_deref(),
        ),
    }
}
