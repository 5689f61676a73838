//! Forward information-coefficient analysis of daily features.
//!
//! Each candidate column is standardised over the panel (z-score), and both
//! the z-score and its day-over-day change are scored by Spearman rank
//! correlation against the next day's return.

pub mod diagnostics;
pub mod sink;
pub mod summary;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::features::NEXT_DAY_RET;
use crate::model::{DailyPanel, IcConfig};
use crate::stats;

pub use diagnostics::{DecilePoint, FeatureDiagnostics, RollingIcPoint, decile_curve, rolling_ic};
pub use sink::{CollectingSink, DiagnosticsSink, JsonDiagnosticsSink, NullSink};
pub use summary::FeatureSummary;

/// Columns never scored by default: identifiers, raw prices and greeks,
/// returns, realised volatility and calendar flags.
///
/// Only the default `vol_5d`, `vol_21d` and `vol_63d` windows are listed.
/// With custom `vol_windows`, pass an explicit feature list (`IcConfig::features`)
/// or the extra `vol_{w}d` columns are scored too.
pub const NON_FEATURE_COLUMNS: &[&str] = &[
    "tradeDate",
    "spot",
    "expirDate",
    "ret_1d",
    "nextDayRet",
    "dte",
    "strike",
    "delta",
    "gamma",
    "vega",
    "theta",
    "rho",
    "vol_5d",
    "vol_21d",
    "vol_63d",
    "callValue",
    "callBidPrice",
    "callAskPrice",
    "callOpenInterest",
    "callVolume",
    "putValue",
    "putBidPrice",
    "putAskPrice",
    "putOpenInterest",
    "putVolume",
    "is_monday",
    "is_friday",
    "is_option_expiry",
    "month",
    "is_month_end_trading",
    "is_quarter_end_trading",
    "is_year_end_trading",
    "mid_call",
    "mid_put",
    "spotPrice",
];

/// Output of one analysis run.
#[derive(Debug, Clone)]
pub struct IcReport {
    /// Ranked by IC descending.
    pub summary: Vec<FeatureSummary>,
    /// Top-ranked scored features with a defined IC, in rank order.
    pub top_features: Vec<String>,
    pub diagnostics: Vec<FeatureDiagnostics>,
    /// Rows dropped because next-day return was undefined.
    pub dropped_rows: usize,
}

/// Panel columns scored when no explicit list is given.
pub fn default_feature_columns(daily: &DailyPanel) -> Vec<String> {
    daily
        .column_names()
        .filter(|c| !NON_FEATURE_COLUMNS.contains(c))
        .map(str::to_string)
        .collect()
}

/// A standardised series ready for scoring.
struct ScoredSeries {
    name: String,
    values: Vec<Option<f64>>,
}

/// Score features against next-day return.
///
/// `feature_columns` overrides the default selection. Rows with an undefined
/// next-day return are dropped once for the whole panel; rows where a scored
/// feature is undefined are dropped for that feature only.
pub fn analyse(daily: &DailyPanel, feature_columns: Option<&[String]>, config: &IcConfig) -> Result<IcReport> {
    config.validate()?;

    let features = match feature_columns {
        Some(cols) => cols.to_vec(),
        None => default_feature_columns(daily),
    };
    for f in &features {
        if !daily.has_column(f) {
            return Err(PipelineError::UnknownFeature { name: f.clone() });
        }
    }
    let forward = daily.column(NEXT_DAY_RET).ok_or_else(|| PipelineError::MissingColumns {
        columns: vec![NEXT_DAY_RET.to_string()],
    })?;

    // Pre-trim to rows with a defined forward return.
    let keep: Vec<bool> = forward.iter().map(Option::is_some).collect();
    let mut wanted: Vec<&str> = vec![NEXT_DAY_RET];
    wanted.extend(features.iter().map(String::as_str));
    let trimmed = daily.select(&wanted)?.filter_rows(&keep);
    let dropped_rows = daily.len() - trimmed.len();
    info!(dropped_rows, "dropped rows with undefined next-day return");

    let dates = trimmed.trade_dates();
    let forward: Vec<f64> = trimmed
        .column(NEXT_DAY_RET)
        .map(|c| c.iter().flatten().copied().collect())
        .unwrap_or_default();

    let scored = standardise(&trimmed, &features);

    let mut summary: Vec<FeatureSummary> = scored.iter().map(|s| score(s, &forward)).collect();
    FeatureSummary::rank(&mut summary);

    let top_features: Vec<String> = summary
        .iter()
        .filter(|s| s.ic.is_some())
        .take(config.top_features)
        .map(|s| s.feature.clone())
        .collect();

    let diagnostics = top_features
        .iter()
        .filter_map(|name| scored.iter().find(|s| &s.name == name))
        .map(|s| diagnose(s, dates, &forward, config))
        .collect();

    Ok(IcReport {
        summary,
        top_features,
        diagnostics,
        dropped_rows,
    })
}

/// `{col}_z` and `{col}_z_chg1` for every feature, in feature order.
fn standardise(panel: &DailyPanel, features: &[String]) -> Vec<ScoredSeries> {
    let mut out = Vec::with_capacity(features.len() * 2);
    for col in features {
        let values = panel.column(col).unwrap_or_default();
        let defined: Vec<f64> = values.iter().flatten().copied().filter(|v| !v.is_nan()).collect();

        let z: Vec<Option<f64>> = match (stats::mean(&defined), stats::sample_std(&defined)) {
            (Some(m), Some(s)) if s > 0.0 => values
                .iter()
                .map(|v| v.filter(|x| !x.is_nan()).map(|x| (x - m) / s))
                .collect(),
            _ => vec![None; values.len()],
        };
        let z_chg = stats::diff(&z);

        out.push(ScoredSeries {
            name: format!("{col}_z"),
            values: z,
        });
        out.push(ScoredSeries {
            name: format!("{col}_z_chg1"),
            values: z_chg,
        });
    }
    out
}

/// Defined (feature, forward) pairs of a scored series.
fn pairs(series: &ScoredSeries, forward: &[f64]) -> (Vec<usize>, Vec<f64>, Vec<f64>) {
    let mut rows = Vec::new();
    let mut x = Vec::new();
    let mut y = Vec::new();
    for (i, (v, r)) in series.values.iter().zip(forward).enumerate() {
        if let Some(v) = v {
            rows.push(i);
            x.push(*v);
            y.push(*r);
        }
    }
    (rows, x, y)
}

fn score(series: &ScoredSeries, forward: &[f64]) -> FeatureSummary {
    let (_, x, y) = pairs(series, forward);
    let n = x.len();
    let dropped = series.values.len() - n;
    if dropped > 0 {
        debug!(feature = %series.name, dropped, "dropped rows with undefined feature value");
    }

    let ic = stats::spearman(&x, &y);
    FeatureSummary {
        feature: series.name.clone(),
        ic,
        tstat: ic.and_then(|r| stats::correlation_tstat(r, n)),
        pvalue: ic.and_then(|r| stats::correlation_pvalue(r, n)),
        n_obs: n,
        dropped,
    }
}

fn diagnose(series: &ScoredSeries, dates: &[NaiveDate], forward: &[f64], config: &IcConfig) -> FeatureDiagnostics {
    let (rows, x, y) = pairs(series, forward);
    let local_dates: Vec<NaiveDate> = rows.iter().map(|&i| dates[i]).collect();
    FeatureDiagnostics {
        feature: series.name.clone(),
        decile_curve: decile_curve(&x, &y, config.deciles),
        rolling_ic: rolling_ic(&local_dates, &x, &y, config.rolling_window),
    }
}
