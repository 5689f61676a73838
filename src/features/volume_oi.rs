use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::Result;
use crate::model::quote::is_missing;
use crate::model::{BucketConfig, BucketKey, DailyPanel, Leg, Moneyness, NotionalMetric, OptionQuoteRow};

/// Mid price, notional flow and moneyness bucket of one leg of a quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegNotional {
    pub mid: Option<f64>,
    /// Volume × mid.
    pub volume: Option<f64>,
    /// Open interest × mid.
    pub open_interest: Option<f64>,
    pub moneyness: Moneyness,
}

impl LegNotional {
    pub fn metric(&self, metric: NotionalMetric) -> Option<f64> {
        match metric {
            NotionalMetric::Volume => self.volume,
            NotionalMetric::OpenInterest => self.open_interest,
        }
    }
}

/// A quote enriched with per-leg notionals and its bucket assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotionalRow {
    pub trade_date: NaiveDate,
    /// Index into the configured tenor labels; `None` when dte fits no bucket.
    pub tenor: Option<usize>,
    pub call: LegNotional,
    pub put: LegNotional,
}

impl NotionalRow {
    pub fn from_quote(row: &OptionQuoteRow, config: &BucketConfig) -> Self {
        let make_leg = |leg: Leg, bid, ask, volume, oi, delta| {
            let mid = mid_price(bid, ask);
            LegNotional {
                mid,
                volume: product(volume, mid),
                open_interest: product(oi, mid),
                moneyness: config.moneyness.classify(leg, delta),
            }
        };
        Self {
            trade_date: row.trade_date,
            tenor: row.dte.and_then(|d| config.tenor.bucket_index(d)),
            call: make_leg(
                Leg::Call,
                row.call_bid_price,
                row.call_ask_price,
                row.call_volume,
                row.call_open_interest,
                row.call_delta,
            ),
            put: make_leg(
                Leg::Put,
                row.put_bid_price,
                row.put_ask_price,
                row.put_volume,
                row.put_open_interest,
                row.put_delta,
            ),
        }
    }

    pub fn leg(&self, leg: Leg) -> &LegNotional {
        match leg {
            Leg::Call => &self.call,
            Leg::Put => &self.put,
        }
    }

    /// The cell this row's `leg` lands in, if its tenor is bucketed.
    pub fn bucket(&self, leg: Leg) -> Option<BucketKey> {
        self.tenor.map(|tenor| BucketKey {
            tenor,
            moneyness: self.leg(leg).moneyness,
        })
    }
}

fn mid_price(bid: Option<f64>, ask: Option<f64>) -> Option<f64> {
    match (bid, ask) {
        (Some(b), Some(a)) if !(b.is_nan() || a.is_nan()) => Some((b + a) / 2.0),
        _ => None,
    }
}

fn product(qty: Option<f64>, mid: Option<f64>) -> Option<f64> {
    if is_missing(qty) {
        return None;
    }
    Some(qty? * mid?)
}

// ── Cell accumulation ────────────────────────────────────────────────

/// Dense per-date sums over (metric, tenor, moneyness, leg), in that
/// declared order.
struct CellSums {
    n_tenor: usize,
    sums: Vec<f64>,
}

impl CellSums {
    fn new(n_tenor: usize) -> Self {
        Self {
            n_tenor,
            sums: vec![0.0; NotionalMetric::ALL.len() * n_tenor * Moneyness::ALL.len() * Leg::ALL.len()],
        }
    }

    fn slot(&self, metric: NotionalMetric, key: BucketKey, leg: Leg) -> usize {
        ((metric.index() * self.n_tenor + key.tenor) * Moneyness::ALL.len() + key.moneyness.index()) * Leg::ALL.len()
            + leg.index()
    }

    fn add(&mut self, row: &NotionalRow) {
        for leg in Leg::ALL {
            let Some(key) = row.bucket(leg) else {
                continue;
            };
            for metric in NotionalMetric::ALL {
                if let Some(v) = row.leg(leg).metric(metric).filter(|v| !v.is_nan()) {
                    let slot = self.slot(metric, key, leg);
                    self.sums[slot] += v;
                }
            }
        }
    }

    fn get(&self, metric: NotionalMetric, key: BucketKey, leg: Leg) -> f64 {
        self.sums[self.slot(metric, key, leg)]
    }
}

// ── Public API ───────────────────────────────────────────────────────

/// Wide per-date bucket table: one record per trade date that has at least
/// one tenor-bucketed quote.
///
/// Columns, generated from the configured labels:
/// - `{leg}_{notvol|notoi}_{tenor}_{moneyness}` for every metric, tenor,
///   moneyness and leg, in that nesting order. Cells without quotes are 0.
/// - `pc_ratio_notional_{vol|oi}_{tenor}_{moneyness}` = put / (call + ε) for
///   every tenor and moneyness.
pub fn bucket_table(rows: &[OptionQuoteRow], config: &BucketConfig) -> Result<DailyPanel> {
    config.validate()?;
    let n_tenor = config.tenor.len();

    let mut by_date: BTreeMap<NaiveDate, CellSums> = BTreeMap::new();
    let mut unbucketed = 0usize;
    for quote in rows {
        let row = NotionalRow::from_quote(quote, config);
        if row.tenor.is_none() {
            unbucketed += 1;
            continue;
        }
        by_date
            .entry(row.trade_date)
            .or_insert_with(|| CellSums::new(n_tenor))
            .add(&row);
    }
    if unbucketed > 0 {
        warn!(unbucketed, "quotes with no tenor bucket were skipped");
    }

    let dates: Vec<NaiveDate> = by_date.keys().copied().collect();
    let cells: Vec<CellSums> = by_date.into_values().collect();
    let mut table = DailyPanel::new(dates);

    for metric in NotionalMetric::ALL {
        for tenor in 0..n_tenor {
            for moneyness in Moneyness::ALL {
                let key = BucketKey { tenor, moneyness };
                for leg in Leg::ALL {
                    let values = cells.iter().map(|c| c.get(metric, key, leg)).collect();
                    table.push_dense(config.notional_column(leg, metric, tenor, moneyness), values)?;
                }
            }
        }
    }

    for tenor in 0..n_tenor {
        for moneyness in Moneyness::ALL {
            let key = BucketKey { tenor, moneyness };
            for metric in NotionalMetric::ALL {
                let values = cells
                    .iter()
                    .map(|c| c.get(metric, key, Leg::Put) / (c.get(metric, key, Leg::Call) + config.ratio_epsilon))
                    .collect();
                table.push_dense(config.ratio_column(metric, tenor, moneyness), values)?;
            }
        }
    }

    Ok(table)
}

/// Extend the daily panel with bucketed notional and put/call ratio columns.
///
/// The join is inner on trade date: dates missing from either side are
/// dropped, so every surviving record carries both time and bucket features.
pub fn aggregate(rows: &[OptionQuoteRow], daily: DailyPanel, config: &BucketConfig) -> Result<DailyPanel> {
    let table = bucket_table(rows, config)?;
    let before = daily.len();
    let bucket_days = table.len();
    let joined = daily.inner_join(&table)?;

    info!(
        daily_days = before,
        bucket_days,
        joined_days = joined.len(),
        "joined bucket features onto daily panel"
    );
    Ok(joined)
}
