use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::data;
use crate::features;
use crate::ic::{self, DiagnosticsSink, FeatureSummary, IcReport, JsonDiagnosticsSink, NullSink};
use crate::model::{DailyPanel, OptionQuoteRow, PipelineConfig};
use crate::validate::{self, QuoteDiagnostics};

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub diagnostics: QuoteDiagnostics,
    pub panel: DailyPanel,
    pub ic: IcReport,
}

/// Raw quotes → validated quotes → daily panel → bucket join → IC report.
/// Diagnostic series for the top features go to `sink`.
pub fn run_pipeline(
    rows: Vec<OptionQuoteRow>,
    config: &PipelineConfig,
    sink: &mut dyn DiagnosticsSink,
) -> crate::error::Result<PipelineReport> {
    config.validate()?;

    let (valid, diagnostics) = validate::validate(rows);
    let panel = build_panel(&valid, config)?;
    drop(valid);

    let report = ic::analyse(&panel, config.ic.features.as_deref(), &config.ic)?;
    sink.consume(&report.diagnostics)?;

    Ok(PipelineReport {
        diagnostics,
        panel,
        ic: report,
    })
}

/// Daily time features joined with bucketed notional features.
pub fn build_panel(valid: &[OptionQuoteRow], config: &PipelineConfig) -> crate::error::Result<DailyPanel> {
    let daily = features::build_daily(valid, &config.time)?;
    features::aggregate(valid, daily, &config.buckets)
}

/// Configuration for the `analyse` command.
pub struct AnalyseConfig {
    pub quotes_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub panel_out: Option<PathBuf>,
    pub summary_out: Option<PathBuf>,
    pub diagnostics_out: Option<PathBuf>,
    pub features: Option<Vec<String>>,
    pub top: Option<usize>,
}

/// CLI entry point for the `analyse` subcommand.
pub fn run(cli: &AnalyseConfig) -> Result<()> {
    let mut config = match &cli.config_path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(features) = &cli.features {
        config.ic.features = Some(features.clone());
    }
    if let Some(top) = cli.top {
        config.ic.top_features = top;
    }

    let rows = data::load_quotes(&cli.quotes_path)
        .with_context(|| format!("loading quotes from {}", cli.quotes_path.display()))?;
    info!(rows = rows.len(), "loaded quotes");

    let mut json_sink;
    let mut null_sink = NullSink;
    let sink: &mut dyn DiagnosticsSink = match &cli.diagnostics_out {
        Some(path) => {
            json_sink = JsonDiagnosticsSink::new(path);
            &mut json_sink
        }
        None => &mut null_sink,
    };

    let report = run_pipeline(rows, &config, sink).context("running pipeline")?;

    report.diagnostics.print_table();
    FeatureSummary::print_table(&report.ic.summary);
    println!(
        "  {} trading days, {} dropped without next-day return",
        report.panel.len(),
        report.ic.dropped_rows
    );
    if !report.ic.top_features.is_empty() {
        println!("  Top features: {}", report.ic.top_features.join(", "));
    }

    if let Some(path) = &cli.panel_out {
        data::write_panel_csv(&report.panel, path)
            .with_context(|| format!("writing panel to {}", path.display()))?;
    }
    if let Some(path) = &cli.summary_out {
        data::write_summary_csv(&report.ic.summary, path)
            .with_context(|| format!("writing summary to {}", path.display()))?;
    }

    Ok(())
}
