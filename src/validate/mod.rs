mod checks;

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::data;
use crate::model::OptionQuoteRow;

pub use checks::RowAnomalies;

/// Data-quality rates over the pre-filter row count, as percentages (0–100).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuoteDiagnostics {
    pub total_rows: usize,
    pub removed_rows: usize,
    pub missing_liquidity_pct: f64,
    pub invalid_greeks_pct: f64,
    pub invalid_price_pct: f64,
    pub invalid_spot_pct: f64,
    pub delta_out_of_bounds_pct: f64,
    pub negative_dte_pct: f64,
    pub crossed_quote_pct: f64,
}

impl QuoteDiagnostics {
    pub fn print_table(&self) {
        println!("\n{}", "═".repeat(72));
        println!("  Quote Data Quality ({} rows)", self.total_rows);
        println!("{}", "═".repeat(72));
        let lines = [
            ("NA open interest or volume", self.missing_liquidity_pct),
            ("NA or non-finite greeks", self.invalid_greeks_pct),
            ("NA or negative prices/values", self.invalid_price_pct),
            ("NA or non-positive spot", self.invalid_spot_pct),
            ("Delta outside expected bounds", self.delta_out_of_bounds_pct),
            ("Negative DTE", self.negative_dte_pct),
            ("Bid > ask (removed)", self.crossed_quote_pct),
        ];
        for (label, pct) in lines {
            println!("  {:<50} {:>8.3}%", label, pct);
        }
        println!("  {}", "-".repeat(66));
        println!("  Removed {} crossed rows", self.removed_rows);
        println!("{}", "═".repeat(72));
    }
}

/// Screen raw quotes. Returns the rows that are not crossed (bid > ask on
/// either leg), untouched and in input order, plus the anomaly rates.
pub fn validate(rows: Vec<OptionQuoteRow>) -> (Vec<OptionQuoteRow>, QuoteDiagnostics) {
    let total = rows.len();
    let mut counts = [0usize; 7];

    let valid: Vec<OptionQuoteRow> = rows
        .into_iter()
        .filter(|row| {
            let a = RowAnomalies::of(row);
            let flags = [
                a.missing_liquidity,
                a.invalid_greeks,
                a.invalid_price,
                a.invalid_spot,
                a.delta_out_of_bounds,
                a.negative_dte,
                a.crossed_quote,
            ];
            for (count, flag) in counts.iter_mut().zip(flags) {
                *count += flag as usize;
            }
            !a.crossed_quote
        })
        .collect();

    let pct = |n: usize| {
        if total == 0 {
            0.0
        } else {
            100.0 * n as f64 / total as f64
        }
    };

    let diagnostics = QuoteDiagnostics {
        total_rows: total,
        removed_rows: total - valid.len(),
        missing_liquidity_pct: pct(counts[0]),
        invalid_greeks_pct: pct(counts[1]),
        invalid_price_pct: pct(counts[2]),
        invalid_spot_pct: pct(counts[3]),
        delta_out_of_bounds_pct: pct(counts[4]),
        negative_dte_pct: pct(counts[5]),
        crossed_quote_pct: pct(counts[6]),
    };

    info!(
        total,
        removed = diagnostics.removed_rows,
        "removed crossed quotes (bid > ask)"
    );

    (valid, diagnostics)
}

/// CLI entry point for the `validate` subcommand.
pub fn run(path: &Path) -> anyhow::Result<()> {
    let rows = data::load_quotes(path)?;
    let (valid, diagnostics) = validate(rows);
    diagnostics.print_table();
    println!("  {} rows remain after validation.", valid.len());
    Ok(())
}
