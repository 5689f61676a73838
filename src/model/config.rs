use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::bucket::BucketConfig;
use crate::error::{PipelineError, Result};

pub const DEFAULT_VOL_WINDOWS: [usize; 3] = [5, 21, 63];
pub const DEFAULT_ANNUALISATION: f64 = 252.0;
pub const DEFAULT_ROLLING_WINDOW: usize = 252;
pub const DEFAULT_DECILES: usize = 10;
pub const DEFAULT_TOP_FEATURES: usize = 5;

/// Monthly and holiday-shifted option expiries, 2020 through 2025.
pub const DEFAULT_EXPIRY_DATES: &[(i32, u32, u32)] = &[
    // 2020
    (2020, 1, 17), (2020, 2, 21), (2020, 3, 20), (2020, 4, 9), (2020, 4, 17), (2020, 5, 15),
    (2020, 6, 19), (2020, 7, 2), (2020, 7, 17), (2020, 8, 21), (2020, 9, 18), (2020, 10, 16),
    (2020, 11, 20), (2020, 12, 18), (2020, 12, 24), (2020, 12, 31),
    // 2021
    (2021, 1, 15), (2021, 2, 19), (2021, 3, 19), (2021, 4, 1), (2021, 4, 16), (2021, 5, 21),
    (2021, 6, 18), (2021, 7, 16), (2021, 8, 20), (2021, 9, 17), (2021, 10, 15), (2021, 11, 19),
    (2021, 12, 17), (2021, 12, 23),
    // 2022
    (2022, 1, 21), (2022, 2, 18), (2022, 3, 18), (2022, 4, 14), (2022, 5, 20), (2022, 6, 17),
    (2022, 7, 15), (2022, 8, 19), (2022, 9, 16), (2022, 10, 21), (2022, 11, 18), (2022, 12, 16),
    // 2023
    (2023, 1, 20), (2023, 2, 17), (2023, 3, 17), (2023, 4, 6), (2023, 4, 21), (2023, 5, 19),
    (2023, 6, 16), (2023, 7, 21), (2023, 8, 18), (2023, 9, 15), (2023, 10, 20), (2023, 11, 17),
    (2023, 12, 15),
    // 2024
    (2024, 1, 19), (2024, 2, 16), (2024, 3, 15), (2024, 3, 28), (2024, 4, 19), (2024, 5, 17),
    (2024, 6, 21), (2024, 7, 19), (2024, 8, 16), (2024, 9, 20), (2024, 10, 18), (2024, 11, 15),
    (2024, 12, 20),
    // 2025
    (2025, 1, 17), (2025, 2, 21), (2025, 3, 21), (2025, 4, 17), (2025, 5, 16), (2025, 6, 20),
    (2025, 7, 3), (2025, 7, 18), (2025, 8, 15), (2025, 9, 19), (2025, 10, 17), (2025, 11, 21),
    (2025, 12, 19),
];

pub fn default_expiry_dates() -> Vec<NaiveDate> {
    DEFAULT_EXPIRY_DATES
        .iter()
        .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}

// ── Stage configs ────────────────────────────────────────────────────

/// Daily spot, return, realised volatility and calendar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeFeatureConfig {
    #[serde(default = "default_expiry_dates")]
    pub expiry_dates: Vec<NaiveDate>,
    /// Trailing windows (in trading days) for realised volatility.
    #[serde(default = "default_vol_windows")]
    pub vol_windows: Vec<usize>,
    #[serde(default = "default_annualisation")]
    pub annualisation: f64,
    #[serde(default = "default_true")]
    pub compute_realised: bool,
    #[serde(default = "default_true")]
    pub compute_calendar: bool,
}

impl Default for TimeFeatureConfig {
    fn default() -> Self {
        Self {
            expiry_dates: default_expiry_dates(),
            vol_windows: default_vol_windows(),
            annualisation: DEFAULT_ANNUALISATION,
            compute_realised: true,
            compute_calendar: true,
        }
    }
}

impl TimeFeatureConfig {
    pub fn expiry_set(&self) -> HashSet<NaiveDate> {
        self.expiry_dates.iter().copied().collect()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(w) = self.vol_windows.iter().find(|&&w| w < 2) {
            return Err(PipelineError::InvalidConfig {
                reason: format!("realised volatility window {w} is shorter than 2 observations"),
            });
        }
        let mut seen = HashSet::new();
        if let Some(w) = self.vol_windows.iter().find(|w| !seen.insert(**w)) {
            return Err(PipelineError::InvalidConfig {
                reason: format!("realised volatility window {w} is listed twice"),
            });
        }
        if !(self.annualisation.is_finite() && self.annualisation > 0.0) {
            return Err(PipelineError::InvalidConfig {
                reason: format!("annualisation must be positive, got {}", self.annualisation),
            });
        }
        Ok(())
    }
}

/// Information-coefficient scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IcConfig {
    /// Columns to score. When absent, every panel column outside the
    /// non-feature set is scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
    #[serde(default = "default_deciles")]
    pub deciles: usize,
    /// How many top-ranked scored features get decile and rolling-IC series.
    #[serde(default = "default_top_features")]
    pub top_features: usize,
}

impl Default for IcConfig {
    fn default() -> Self {
        Self {
            features: None,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            deciles: DEFAULT_DECILES,
            top_features: DEFAULT_TOP_FEATURES,
        }
    }
}

impl IcConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rolling_window < 2 {
            return Err(PipelineError::InvalidConfig {
                reason: format!("rolling IC window must be at least 2, got {}", self.rolling_window),
            });
        }
        if self.deciles == 0 {
            return Err(PipelineError::InvalidConfig {
                reason: "decile count must be at least 1".into(),
            });
        }
        Ok(())
    }
}

// ── Pipeline config ──────────────────────────────────────────────────

/// Full configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PipelineConfig {
    #[serde(default)]
    pub time: TimeFeatureConfig,
    #[serde(default)]
    pub buckets: BucketConfig,
    #[serde(default)]
    pub ic: IcConfig,
}

impl PipelineConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.time.validate()?;
        self.buckets.validate()?;
        self.ic.validate()
    }
}

fn default_vol_windows() -> Vec<usize> {
    DEFAULT_VOL_WINDOWS.to_vec()
}

fn default_annualisation() -> f64 {
    DEFAULT_ANNUALISATION
}

fn default_true() -> bool {
    true
}

fn default_rolling_window() -> usize {
    DEFAULT_ROLLING_WINDOW
}

fn default_deciles() -> usize {
    DEFAULT_DECILES
}

fn default_top_features() -> usize {
    DEFAULT_TOP_FEATURES
}
