use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

pub const DEFAULT_TENOR_CUTOFFS: [f64; 4] = [7.0, 30.0, 90.0, 365.0];
pub const DEFAULT_TENOR_LABELS: [&str; 5] = ["7d", "1mo", "3mo", "12mo", "far"];
pub const DEFAULT_ATM_LOWER: f64 = 0.4;
pub const DEFAULT_ATM_UPPER: f64 = 0.6;
pub const DEFAULT_RATIO_EPSILON: f64 = 1e-8;

// ── Legs and metrics ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    Call,
    Put,
}

impl Leg {
    pub const ALL: [Leg; 2] = [Leg::Call, Leg::Put];

    pub fn label(self) -> &'static str {
        match self {
            Leg::Call => "call",
            Leg::Put => "put",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Leg::Call => 0,
            Leg::Put => 1,
        }
    }
}

/// Notional flow measured per bucket cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotionalMetric {
    Volume,
    OpenInterest,
}

impl NotionalMetric {
    pub const ALL: [NotionalMetric; 2] = [NotionalMetric::Volume, NotionalMetric::OpenInterest];

    /// Suffix used in `{leg}_{suffix}_{tenor}_{moneyness}` column names.
    pub fn suffix(self) -> &'static str {
        match self {
            NotionalMetric::Volume => "notvol",
            NotionalMetric::OpenInterest => "notoi",
        }
    }

    /// Suffix used in `pc_ratio_notional_{suffix}_{tenor}_{moneyness}` column names.
    pub fn ratio_suffix(self) -> &'static str {
        match self {
            NotionalMetric::Volume => "vol",
            NotionalMetric::OpenInterest => "oi",
        }
    }

    pub fn index(self) -> usize {
        match self {
            NotionalMetric::Volume => 0,
            NotionalMetric::OpenInterest => 1,
        }
    }
}

// ── Moneyness ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Moneyness {
    Itm,
    Atm,
    Otm,
}

impl Moneyness {
    /// Declared column order.
    pub const ALL: [Moneyness; 3] = [Moneyness::Itm, Moneyness::Atm, Moneyness::Otm];

    pub fn label(self) -> &'static str {
        match self {
            Moneyness::Itm => "itm",
            Moneyness::Atm => "atm",
            Moneyness::Otm => "otm",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Moneyness::Itm => 0,
            Moneyness::Atm => 1,
            Moneyness::Otm => 2,
        }
    }
}

impl fmt::Display for Moneyness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Delta thresholds separating at-, out- and in-the-money legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MoneynessRule {
    /// Lower bound of the at-the-money band (inclusive).
    #[serde(default = "default_atm_lower")]
    pub atm_lower: f64,
    /// Upper bound of the at-the-money band (inclusive).
    #[serde(default = "default_atm_upper")]
    pub atm_upper: f64,
}

impl Default for MoneynessRule {
    fn default() -> Self {
        Self {
            atm_lower: DEFAULT_ATM_LOWER,
            atm_upper: DEFAULT_ATM_UPPER,
        }
    }
}

impl MoneynessRule {
    /// Classify a leg's delta. Call deltas are used signed, put deltas by
    /// magnitude. A missing delta falls through to in-the-money.
    pub fn classify(&self, leg: Leg, delta: Option<f64>) -> Moneyness {
        let d = match (leg, delta) {
            (_, None) => return Moneyness::Itm,
            (Leg::Call, Some(d)) => d,
            (Leg::Put, Some(d)) => d.abs(),
        };
        if d >= self.atm_lower && d <= self.atm_upper {
            Moneyness::Atm
        } else if d < self.atm_lower {
            Moneyness::Otm
        } else {
            Moneyness::Itm
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.atm_lower.is_finite() && self.atm_upper.is_finite()) || self.atm_lower > self.atm_upper {
            return Err(PipelineError::InvalidConfig {
                reason: format!(
                    "moneyness band [{}, {}] must be finite with lower <= upper",
                    self.atm_lower, self.atm_upper
                ),
            });
        }
        Ok(())
    }
}

// ── Tenor ────────────────────────────────────────────────────────────

/// Days-to-expiry partition. `cutoffs[i]` is the inclusive upper bound of
/// bucket `i`; the first bucket is open below and the last open above, so
/// `labels` has one more entry than `cutoffs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TenorBuckets {
    #[serde(default = "default_tenor_cutoffs")]
    pub cutoffs: Vec<f64>,
    #[serde(default = "default_tenor_labels")]
    pub labels: Vec<String>,
}

impl Default for TenorBuckets {
    fn default() -> Self {
        Self {
            cutoffs: default_tenor_cutoffs(),
            labels: default_tenor_labels(),
        }
    }
}

impl TenorBuckets {
    /// Index into `labels` for a days-to-expiry value.
    pub fn bucket_index(&self, dte: f64) -> Option<usize> {
        if dte.is_nan() {
            return None;
        }
        Some(self.cutoffs.iter().position(|&c| dte <= c).unwrap_or(self.cutoffs.len()))
    }

    pub fn label(&self, idx: usize) -> &str {
        &self.labels[idx]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.cutoffs.is_empty() {
            return Err(PipelineError::InvalidConfig {
                reason: "tenor cutoffs must not be empty".into(),
            });
        }
        if self.labels.len() != self.cutoffs.len() + 1 {
            return Err(PipelineError::InvalidConfig {
                reason: format!(
                    "{} tenor cutoffs need {} labels, got {}",
                    self.cutoffs.len(),
                    self.cutoffs.len() + 1,
                    self.labels.len()
                ),
            });
        }
        if self.cutoffs.iter().any(|c| !c.is_finite()) || self.cutoffs.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PipelineError::InvalidConfig {
                reason: format!("tenor cutoffs {:?} must be finite and strictly increasing", self.cutoffs),
            });
        }
        let mut seen = std::collections::HashSet::new();
        for label in &self.labels {
            if !seen.insert(label.as_str()) {
                return Err(PipelineError::InvalidConfig {
                    reason: format!("duplicate tenor label `{label}`"),
                });
            }
        }
        Ok(())
    }
}

// ── Bucket configuration ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BucketConfig {
    #[serde(default)]
    pub tenor: TenorBuckets,
    #[serde(default)]
    pub moneyness: MoneynessRule,
    /// Added to the call-side denominator of put/call ratios.
    #[serde(default = "default_ratio_epsilon")]
    pub ratio_epsilon: f64,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            tenor: TenorBuckets::default(),
            moneyness: MoneynessRule::default(),
            ratio_epsilon: DEFAULT_RATIO_EPSILON,
        }
    }
}

impl BucketConfig {
    pub fn validate(&self) -> Result<()> {
        self.tenor.validate()?;
        self.moneyness.validate()?;
        if !(self.ratio_epsilon.is_finite() && self.ratio_epsilon > 0.0) {
            return Err(PipelineError::InvalidConfig {
                reason: format!("ratio_epsilon must be positive, got {}", self.ratio_epsilon),
            });
        }
        Ok(())
    }

    /// Name of a notional column, e.g. `put_notoi_1mo_atm`.
    pub fn notional_column(&self, leg: Leg, metric: NotionalMetric, tenor: usize, m: Moneyness) -> String {
        format!("{}_{}_{}_{}", leg.label(), metric.suffix(), self.tenor.label(tenor), m.label())
    }

    /// Name of a put/call ratio column, e.g. `pc_ratio_notional_vol_7d_otm`.
    pub fn ratio_column(&self, metric: NotionalMetric, tenor: usize, m: Moneyness) -> String {
        format!(
            "pc_ratio_notional_{}_{}_{}",
            metric.ratio_suffix(),
            self.tenor.label(tenor),
            m.label()
        )
    }
}

/// (tenor bucket, moneyness bucket) cell of one leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub tenor: usize,
    pub moneyness: Moneyness,
}

fn default_tenor_cutoffs() -> Vec<f64> {
    DEFAULT_TENOR_CUTOFFS.to_vec()
}

fn default_tenor_labels() -> Vec<String> {
    DEFAULT_TENOR_LABELS.iter().map(|s| s.to_string()).collect()
}

fn default_atm_lower() -> f64 {
    DEFAULT_ATM_LOWER
}

fn default_atm_upper() -> f64 {
    DEFAULT_ATM_UPPER
}

fn default_ratio_epsilon() -> f64 {
    DEFAULT_RATIO_EPSILON
}
