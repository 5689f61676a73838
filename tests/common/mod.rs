#![allow(dead_code)]

use chrono::{Datelike, Days, NaiveDate, Weekday};

use option_ic::model::{DailyPanel, OptionQuoteRow};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// `n` consecutive weekdays starting at `start` (inclusive if a weekday).
pub fn weekdays(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(n);
    let mut d = start;
    while out.len() < n {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(d);
        }
        d = d.checked_add_days(Days::new(1)).unwrap();
    }
    out
}

/// A clean quote: call 1.0/1.2, put 2.0/2.2, volume 10, open interest 100,
/// at-the-money deltas.
pub fn quote(trade_date: NaiveDate, dte: i64, spot: f64) -> OptionQuoteRow {
    OptionQuoteRow {
        trade_date,
        dte: Some(dte as f64),
        spot_price: Some(spot),
        call_bid_price: Some(1.0),
        call_ask_price: Some(1.2),
        call_value: Some(1.1),
        call_volume: Some(10.0),
        call_open_interest: Some(100.0),
        put_bid_price: Some(2.0),
        put_ask_price: Some(2.2),
        put_value: Some(2.1),
        put_volume: Some(10.0),
        put_open_interest: Some(100.0),
        call_delta: Some(0.5),
        put_delta: Some(-0.5),
        gamma: Some(0.01),
        vega: Some(0.1),
        call_theta: Some(-0.05),
        call_rho: Some(0.02),
    }
}

/// One clean 10-dte quote per (date, spot).
pub fn daily_quotes(days: &[(NaiveDate, f64)]) -> Vec<OptionQuoteRow> {
    days.iter().map(|&(d, s)| quote(d, 10, s)).collect()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn col<'a>(panel: &'a DailyPanel, name: &str) -> &'a [Option<f64>] {
    panel
        .column(name)
        .unwrap_or_else(|| panic!("panel has no column `{name}`"))
}
