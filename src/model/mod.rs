pub mod bucket;
pub mod config;
pub mod panel;
pub mod quote;

pub use bucket::{BucketConfig, BucketKey, Leg, Moneyness, MoneynessRule, NotionalMetric, TenorBuckets};
pub use config::{IcConfig, PipelineConfig, TimeFeatureConfig};
pub use panel::{DailyPanel, DailyRecord};
pub use quote::OptionQuoteRow;
