use chrono::NaiveDate;
use tracing::debug;

use super::calendar;
use crate::error::Result;
use crate::model::{DailyPanel, OptionQuoteRow, TimeFeatureConfig};
use crate::stats;

pub const SPOT: &str = "spot";
pub const RET_1D: &str = "ret_1d";
pub const NEXT_DAY_RET: &str = "nextDayRet";

/// Name of the realised-volatility column for a window, e.g. `vol_21d`.
pub fn vol_column(window: usize) -> String {
    format!("vol_{window}d")
}

/// Build the daily panel from validated quotes: spot, one-day and next-day
/// returns, then realised volatility and calendar flags when enabled.
pub fn build_daily(rows: &[OptionQuoteRow], config: &TimeFeatureConfig) -> Result<DailyPanel> {
    config.validate()?;

    let (dates, spot) = daily_spot(rows);
    let ret_1d = stats::pct_change(&spot);
    let next_day_ret = forward(&ret_1d);

    let vols: Vec<(String, Vec<Option<f64>>)> = if config.compute_realised {
        config
            .vol_windows
            .iter()
            .map(|&w| {
                let vol = stats::rolling_std(&ret_1d, w)
                    .into_iter()
                    .map(|s| s.map(|s| s * config.annualisation.sqrt()))
                    .collect();
                (vol_column(w), vol)
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut daily = DailyPanel::new(dates);
    daily.push_column(SPOT, spot)?;
    daily.push_column(RET_1D, ret_1d)?;
    daily.push_column(NEXT_DAY_RET, next_day_ret)?;
    for (name, vol) in vols {
        daily.push_column(name, vol)?;
    }

    if config.compute_calendar {
        calendar::add_calendar_flags(&mut daily, &config.expiry_set())?;
    }

    debug!(days = daily.len(), "built daily time features");
    Ok(daily)
}

/// One spot per trade date: rows are stably sorted by date and the first
/// non-missing spot of each date is kept.
fn daily_spot(rows: &[OptionQuoteRow]) -> (Vec<NaiveDate>, Vec<Option<f64>>) {
    let mut sorted: Vec<&OptionQuoteRow> = rows.iter().collect();
    sorted.sort_by_key(|r| r.trade_date);

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut spot: Vec<Option<f64>> = Vec::new();
    for row in sorted {
        let value = row.spot_price.filter(|s| !s.is_nan());
        if dates.last() == Some(&row.trade_date) {
            if let Some(last) = spot.last_mut() {
                if last.is_none() {
                    *last = value;
                }
            }
        } else {
            dates.push(row.trade_date);
            spot.push(value);
        }
    }
    (dates, spot)
}

/// Shift a series one step earlier: `out[t] = xs[t + 1]`, undefined at the end.
fn forward(xs: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out: Vec<Option<f64>> = xs.iter().skip(1).copied().collect();
    if !xs.is_empty() {
        out.push(None);
    }
    out
}
