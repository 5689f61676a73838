use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Forward-IC score of one scored feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub feature: String,
    /// Spearman rank correlation against next-day return.
    pub ic: Option<f64>,
    pub tstat: Option<f64>,
    pub pvalue: Option<f64>,
    /// Rows used for the correlation.
    pub n_obs: usize,
    /// Rows dropped because this feature was undefined there.
    pub dropped: usize,
}

impl FeatureSummary {
    /// Sort by IC descending. Undefined ICs go last; equal ICs keep their order.
    pub fn rank(summary: &mut [FeatureSummary]) {
        summary.sort_by(|a, b| match (a.ic, b.ic) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    pub fn print_table(summary: &[FeatureSummary]) {
        println!("\n{}", "═".repeat(96));
        println!("  Forward IC Summary (sorted by IC)");
        println!("{}", "═".repeat(96));
        println!(
            "  {:<50} {:>9} {:>9} {:>10} {:>7} {:>6}",
            "Feature", "IC", "t-stat", "p-value", "N", "Drop",
        );
        println!("  {}", "-".repeat(92));
        for s in summary {
            println!(
                "  {:<50} {:>9} {:>9} {:>10} {:>7} {:>6}",
                s.feature,
                fmt_opt(s.ic, 4),
                fmt_opt(s.tstat, 3),
                fmt_opt(s.pvalue, 4),
                s.n_obs,
                s.dropped,
            );
        }
        println!("{}", "═".repeat(96));
    }
}

fn fmt_opt(v: Option<f64>, prec: usize) -> String {
    match v {
        Some(x) => format!("{x:+.prec$}"),
        None => "NA".to_string(),
    }
}
