use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Columns an input quote file must carry. Cells may be empty, the columns may not.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "tradeDate",
    "dte",
    "spotPrice",
    "callBidPrice",
    "callAskPrice",
    "callValue",
    "callVolume",
    "callOpenInterest",
    "putBidPrice",
    "putAskPrice",
    "putValue",
    "putVolume",
    "putOpenInterest",
    "callDelta",
    "putDelta",
    "gamma",
    "vega",
    "callTheta",
    "callRho",
];

/// One contract (strike × expiry) observed on one trade date.
///
/// Both legs of the contract share a row: call fields and put fields sit side
/// by side, as in the end-of-day option chain exports this crate reads.
/// Gamma and vega are shared between legs; theta and rho are call-side only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionQuoteRow {
    pub trade_date: NaiveDate,
    /// Days to expiry. Exports may write it as `10.0` or leave it empty.
    pub dte: Option<f64>,
    pub spot_price: Option<f64>,

    pub call_bid_price: Option<f64>,
    pub call_ask_price: Option<f64>,
    pub call_value: Option<f64>,
    pub call_volume: Option<f64>,
    pub call_open_interest: Option<f64>,

    pub put_bid_price: Option<f64>,
    pub put_ask_price: Option<f64>,
    pub put_value: Option<f64>,
    pub put_volume: Option<f64>,
    pub put_open_interest: Option<f64>,

    pub call_delta: Option<f64>,
    pub put_delta: Option<f64>,
    pub gamma: Option<f64>,
    pub vega: Option<f64>,
    pub call_theta: Option<f64>,
    pub call_rho: Option<f64>,
}

impl OptionQuoteRow {
    /// A row for `trade_date` with every optional field empty.
    pub fn empty(trade_date: NaiveDate, dte: Option<f64>) -> Self {
        Self {
            trade_date,
            dte,
            spot_price: None,
            call_bid_price: None,
            call_ask_price: None,
            call_value: None,
            call_volume: None,
            call_open_interest: None,
            put_bid_price: None,
            put_ask_price: None,
            put_value: None,
            put_volume: None,
            put_open_interest: None,
            call_delta: None,
            put_delta: None,
            gamma: None,
            vega: None,
            call_theta: None,
            call_rho: None,
        }
    }

    /// True when either leg is quoted with bid above ask.
    /// Comparisons against a missing price are false.
    pub fn is_crossed(&self) -> bool {
        gt(self.call_bid_price, self.call_ask_price) || gt(self.put_bid_price, self.put_ask_price)
    }
}

/// A value counts as missing when absent or NaN.
pub fn is_missing(v: Option<f64>) -> bool {
    v.is_none_or(f64::is_nan)
}

fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}
