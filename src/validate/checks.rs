use crate::model::quote::{OptionQuoteRow, is_missing};

/// Per-row data-quality flags. Only `crossed_quote` removes a row; the rest
/// are reported and left for the caller to act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowAnomalies {
    /// Call/put volume or open interest missing.
    pub missing_liquidity: bool,
    /// Any of call/put delta, gamma, vega, call theta, call rho missing or non-finite.
    pub invalid_greeks: bool,
    /// Any bid/ask/value field missing or negative.
    pub invalid_price: bool,
    /// Spot missing or not positive.
    pub invalid_spot: bool,
    /// Call delta outside [0, 1] or put delta outside [-1, 0].
    pub delta_out_of_bounds: bool,
    pub negative_dte: bool,
    /// Bid above ask on either leg.
    pub crossed_quote: bool,
}

impl RowAnomalies {
    pub fn of(row: &OptionQuoteRow) -> Self {
        Self {
            missing_liquidity: [
                row.call_volume,
                row.put_volume,
                row.call_open_interest,
                row.put_open_interest,
            ]
            .into_iter()
            .any(is_missing),
            invalid_greeks: [
                row.call_delta,
                row.put_delta,
                row.gamma,
                row.vega,
                row.call_theta,
                row.call_rho,
            ]
            .into_iter()
            .any(|v| !v.is_some_and(f64::is_finite)),
            invalid_price: [
                row.call_value,
                row.put_value,
                row.call_bid_price,
                row.call_ask_price,
                row.put_bid_price,
                row.put_ask_price,
            ]
            .into_iter()
            .any(|v| is_missing(v) || v.is_some_and(|p| p < 0.0)),
            invalid_spot: is_missing(row.spot_price) || row.spot_price.is_some_and(|s| s <= 0.0),
            delta_out_of_bounds: !within(row.call_delta, 0.0, 1.0) || !within(row.put_delta, -1.0, 0.0),
            negative_dte: row.dte.is_some_and(|d| d < 0.0),
            crossed_quote: row.is_crossed(),
        }
    }
}

fn within(v: Option<f64>, lo: f64, hi: f64) -> bool {
    v.is_some_and(|d| d >= lo && d <= hi)
}
