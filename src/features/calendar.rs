use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::Result;
use crate::model::DailyPanel;

pub const IS_MONDAY: &str = "is_monday";
pub const IS_FRIDAY: &str = "is_friday";
pub const IS_OPTION_EXPIRY: &str = "is_option_expiry";
pub const MONTH: &str = "month";
pub const IS_MONTH_END: &str = "is_month_end_trading";
pub const IS_QUARTER_END: &str = "is_quarter_end_trading";
pub const IS_YEAR_END: &str = "is_year_end_trading";

/// Append weekday, expiry, month and period-end flags.
///
/// Period-end flags mark the last date present in the panel for each
/// calendar month, quarter and year, so sparse panels still flag their last
/// traded day of a period.
pub(crate) fn add_calendar_flags(daily: &mut DailyPanel, expiries: &HashSet<NaiveDate>) -> Result<()> {
    let dates = daily.trade_dates().to_vec();

    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    let monday = dates.iter().map(|d| flag(d.weekday() == Weekday::Mon)).collect();
    let friday = dates.iter().map(|d| flag(d.weekday() == Weekday::Fri)).collect();
    let expiry = dates.iter().map(|d| flag(expiries.contains(d))).collect();
    let month = dates.iter().map(|d| d.month() as f64).collect();

    let month_end = last_in_period(&dates, |d| (d.year(), d.month()));
    let quarter_end = last_in_period(&dates, |d| (d.year(), (d.month() - 1) / 3));
    let year_end = last_in_period(&dates, |d| (d.year(), 0));

    daily.push_dense(IS_MONDAY, monday)?;
    daily.push_dense(IS_FRIDAY, friday)?;
    daily.push_dense(IS_OPTION_EXPIRY, expiry)?;
    daily.push_dense(MONTH, month)?;
    daily.push_dense(IS_MONTH_END, month_end)?;
    daily.push_dense(IS_QUARTER_END, quarter_end)?;
    daily.push_dense(IS_YEAR_END, year_end)?;
    Ok(())
}

/// 1.0 where a date is the maximum date of its period among `dates`.
fn last_in_period(dates: &[NaiveDate], period: impl Fn(&NaiveDate) -> (i32, u32)) -> Vec<f64> {
    let mut last: HashMap<(i32, u32), NaiveDate> = HashMap::new();
    for d in dates {
        let entry = last.entry(period(d)).or_insert(*d);
        if d > entry {
            *entry = *d;
        }
    }
    dates
        .iter()
        .map(|d| if last.get(&period(d)) == Some(d) { 1.0 } else { 0.0 })
        .collect()
}
