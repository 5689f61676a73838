//! Daily feature construction: the time-feature builder and the
//! volume/open-interest bucket aggregator.

pub mod calendar;
pub mod time;
pub mod volume_oi;

pub use time::{NEXT_DAY_RET, RET_1D, SPOT, build_daily, vol_column};
pub use volume_oi::{LegNotional, NotionalRow, aggregate, bucket_table};
