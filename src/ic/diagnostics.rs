use chrono::NaiveDate;
use serde::Serialize;

use crate::stats;

/// Mean forward return of one feature-rank bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecilePoint {
    /// 0 = lowest feature values.
    pub decile: usize,
    pub mean_forward_return: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingIcPoint {
    pub trade_date: NaiveDate,
    /// Undefined until a full window is available, or when a window is constant.
    pub ic: Option<f64>,
}

/// Series handed to the visualization sink for one scored feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDiagnostics {
    pub feature: String,
    pub decile_curve: Vec<DecilePoint>,
    pub rolling_ic: Vec<RollingIcPoint>,
}

/// Mean forward return per equal-frequency bin of `feature`.
///
/// Bin edges sit at the linearly interpolated quantiles k/`bins`; duplicate
/// edges are collapsed, so heavily tied features yield fewer bins. Bins are
/// right-closed and the first one also takes the minimum. Empty bins are
/// left out.
pub fn decile_curve(feature: &[f64], forward: &[f64], bins: usize) -> Vec<DecilePoint> {
    if feature.len() != forward.len() || feature.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut sorted = feature.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut edges: Vec<f64> = (0..=bins)
        .filter_map(|k| stats::quantile_sorted(&sorted, k as f64 / bins as f64))
        .collect();
    edges.dedup();
    if edges.len() < 2 {
        return Vec::new();
    }
    let n_bins = edges.len() - 1;

    let mut sums = vec![0.0; n_bins];
    let mut counts = vec![0usize; n_bins];
    for (&x, &r) in feature.iter().zip(forward) {
        let bin = edges[1..].partition_point(|&e| e < x).min(n_bins - 1);
        sums[bin] += r;
        counts[bin] += 1;
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .filter(|(_, (_, c))| *c > 0)
        .map(|(decile, (sum, count))| DecilePoint {
            decile,
            mean_forward_return: sum / count as f64,
            count,
        })
        .collect()
}

/// Rolling Spearman IC: both series are ranked once over their full length,
/// then correlated over each trailing `window`.
pub fn rolling_ic(dates: &[NaiveDate], feature: &[f64], forward: &[f64], window: usize) -> Vec<RollingIcPoint> {
    let n = dates.len().min(feature.len()).min(forward.len());
    let feature_rank = stats::average_ranks(&feature[..n]);
    let forward_rank = stats::average_ranks(&forward[..n]);

    (0..n)
        .map(|i| {
            let ic = if window >= 2 && i + 1 >= window {
                let lo = i + 1 - window;
                stats::pearson(&feature_rank[lo..=i], &forward_rank[lo..=i])
            } else {
                None
            };
            RollingIcPoint {
                trade_date: dates[i],
                ic,
            }
        })
        .collect()
}
