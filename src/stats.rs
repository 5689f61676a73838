//! Small numeric kernels shared by the feature builders and the IC engine.
//!
//! Undefined inputs and outputs are `None`; a statistic that cannot be
//! computed (too few points, zero variance) is `None` rather than NaN.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Sample standard deviation (divisor n − 1), `None` below two points.
pub fn sample_std(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs)?;
    let var = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
    Some(var.sqrt())
}

/// Trailing sample standard deviation over `window` points, inclusive of
/// the current one. A window containing an undefined value is undefined.
pub fn rolling_std(xs: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; xs.len()];
    if window == 0 {
        return out;
    }
    for end in window..=xs.len() {
        let slice = &xs[end - window..end];
        let vals: Option<Vec<f64>> = slice.iter().copied().collect();
        out[end - 1] = vals.and_then(|v| sample_std(&v));
    }
    out
}

/// Simple percentage change between consecutive points.
pub fn pct_change(xs: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = vec![None; xs.len()];
    for i in 1..xs.len() {
        out[i] = match (xs[i - 1], xs[i]) {
            (Some(prev), Some(cur)) if prev != 0.0 => Some(cur / prev - 1.0),
            _ => None,
        };
    }
    out
}

/// First difference; undefined where either side is undefined.
pub fn diff(xs: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = vec![None; xs.len()];
    for i in 1..xs.len() {
        if let (Some(prev), Some(cur)) = (xs[i - 1], xs[i]) {
            out[i] = Some(cur - prev);
        }
    }
    out
}

/// 1-based ranks with ties sharing the average of their positions.
pub fn average_ranks(xs: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && xs[order[j]] == xs[order[i]] {
            j += 1;
        }
        // positions i..j (0-based) share rank mean(i+1..=j)
        let avg = (i + 1 + j) as f64 / 2.0;
        for &k in &order[i..j] {
            ranks[k] = avg;
        }
        i = j;
    }
    ranks
}

/// Pearson correlation, `None` for mismatched lengths, fewer than two
/// points or a constant series.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;

    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mx;
        let dy = yi - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    let r = cov / (vx * vy).sqrt();
    Some(r.clamp(-1.0, 1.0))
}

/// Spearman rank correlation: Pearson on average ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    pearson(&average_ranks(x), &average_ranks(y))
}

/// t-statistic of a correlation over `n` points. Undefined when |r| ≥ 1,
/// `r` is not finite or `n` < 3.
pub fn correlation_tstat(r: f64, n: usize) -> Option<f64> {
    if !r.is_finite() || r.abs() >= 1.0 || n < 3 {
        return None;
    }
    Some(r * ((n as f64 - 2.0) / (1.0 - r * r)).sqrt())
}

/// Two-sided p-value of a correlation under a Student-t with n − 2 degrees
/// of freedom. A perfect correlation has p = 0.
pub fn correlation_pvalue(r: f64, n: usize) -> Option<f64> {
    if !r.is_finite() || n < 3 {
        return None;
    }
    if r.abs() >= 1.0 {
        return Some(0.0);
    }
    let t = correlation_tstat(r, n)?;
    let dist = StudentsT::new(0.0, 1.0, n as f64 - 2.0).ok()?;
    Some((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

/// Quantile of sorted data at `q` in [0, 1] with linear interpolation
/// between closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
