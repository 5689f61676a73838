use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::prelude::*;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::model::OptionQuoteRow;

const TENORS: [i64; 10] = [2, 9, 16, 30, 45, 75, 120, 250, 400, 700];
const MONEYNESS: [f64; 9] = [0.8, 0.85, 0.9, 0.95, 1.0, 1.05, 1.1, 1.15, 1.2];
const RATE: f64 = 0.04;

/// Settings for the `example` command.
pub struct ExampleConfig {
    pub days: usize,
    pub seed: u64,
    pub start_spot: f64,
}

/// Write a synthetic option-chain CSV: a GBM spot path with a strike ×
/// expiry grid per trading day, Black-Scholes greeks and random flow.
/// A small share of rows carry crossed quotes or missing liquidity so the
/// validator has something to report.
pub fn run(config: &ExampleConfig, output: Option<&Path>) -> Result<()> {
    let rows = generate(config);
    match output {
        Some(path) => {
            let mut wtr = csv::Writer::from_path(path)
                .with_context(|| format!("creating {}", path.display()))?;
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
            eprintln!("Wrote {} quotes over {} days to {}", rows.len(), config.days, path.display());
        }
        None => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

pub fn generate(config: &ExampleConfig) -> Vec<OptionQuoteRow> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let dates = trading_days(NaiveDate::from_ymd_opt(2023, 1, 3).unwrap_or_default(), config.days);
    let spots = gbm_path(config.start_spot, dates.len(), 0.0004, 0.012, &mut rng);

    let mut rows = Vec::with_capacity(dates.len() * TENORS.len() * MONEYNESS.len());
    for (date, spot) in dates.into_iter().zip(spots) {
        let iv_level = 0.18 + 0.04 * standard_normal(&mut rng).abs();
        for &dte in &TENORS {
            for &m in &MONEYNESS {
                let strike = (spot * m / 5.0).round() * 5.0;
                let iv = iv_level + 0.1 * (m - 1.0).powi(2);
                rows.push(quote(date, dte, spot, strike, iv, &mut rng));
            }
        }
    }
    rows
}

fn quote(date: NaiveDate, dte: i64, spot: f64, strike: f64, iv: f64, rng: &mut impl Rng) -> OptionQuoteRow {
    let g = black_scholes(spot, strike, dte as f64 / 365.0, iv);
    let spread = rng.random_range(0.01..0.05);
    let liquidity = (-(strike / spot - 1.0).powi(2) * 40.0).exp() * 5000.0 / (1.0 + dte as f64 / 30.0);

    let mut row = OptionQuoteRow::empty(date, Some(dte as f64));
    row.spot_price = Some(spot);
    row.call_value = Some(g.call);
    row.put_value = Some(g.put);
    row.call_bid_price = Some(g.call * (1.0 - spread));
    row.call_ask_price = Some(g.call * (1.0 + spread));
    row.put_bid_price = Some(g.put * (1.0 - spread));
    row.put_ask_price = Some(g.put * (1.0 + spread));
    row.call_volume = Some((liquidity * rng.random_range(0.2..1.8)).round());
    row.put_volume = Some((liquidity * rng.random_range(0.2..2.2)).round());
    row.call_open_interest = Some((liquidity * rng.random_range(5.0..15.0)).round());
    row.put_open_interest = Some((liquidity * rng.random_range(5.0..18.0)).round());
    row.call_delta = Some(g.call_delta);
    row.put_delta = Some(g.call_delta - 1.0);
    row.gamma = Some(g.gamma);
    row.vega = Some(g.vega);
    row.call_theta = Some(g.call_theta);
    row.call_rho = Some(g.call_rho);

    let roll: f64 = rng.random();
    if roll < 0.01 {
        row.call_bid_price = row.call_ask_price.map(|a| a * 1.1);
    } else if roll < 0.02 {
        row.put_volume = None;
    }
    row
}

// ── Pricing ──────────────────────────────────────────────────────────

struct Greeks {
    call: f64,
    put: f64,
    call_delta: f64,
    gamma: f64,
    vega: f64,
    call_theta: f64,
    call_rho: f64,
}

fn black_scholes(s: f64, k: f64, t: f64, sigma: f64) -> Greeks {
    let n = Normal::standard();
    let t = t.max(1.0 / 365.0);
    let sqrt_t = t.sqrt();
    let d1 = ((s / k).ln() + (RATE + 0.5 * sigma * sigma) * t) / (sigma * sqrt_t);
    let d2 = d1 - sigma * sqrt_t;
    let disc = (-RATE * t).exp();

    let call = s * n.cdf(d1) - k * disc * n.cdf(d2);
    let put = k * disc * n.cdf(-d2) - s * n.cdf(-d1);
    Greeks {
        call,
        put,
        call_delta: n.cdf(d1),
        gamma: n.pdf(d1) / (s * sigma * sqrt_t),
        vega: s * n.pdf(d1) * sqrt_t / 100.0,
        call_theta: (-s * n.pdf(d1) * sigma / (2.0 * sqrt_t) - RATE * k * disc * n.cdf(d2)) / 365.0,
        call_rho: k * t * disc * n.cdf(d2) / 100.0,
    }
}

fn trading_days(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(n);
    let mut d = start;
    while out.len() < n {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(d);
        }
        d = match d.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    out
}

/// S_t = S_0 * exp(sum(drift - vol²/2 + vol*Z_i))
fn gbm_path(start: f64, n: usize, drift: f64, vol: f64, rng: &mut impl Rng) -> Vec<f64> {
    let mut prices = Vec::with_capacity(n);
    let mut log_cum = 0.0;
    for _ in 0..n {
        prices.push(start * f64::exp(log_cum));
        log_cum += drift - 0.5 * vol * vol + vol * standard_normal(rng);
    }
    prices
}

fn standard_normal(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.random_range(0.0001f64..1.0);
    let u2: f64 = rng.random_range(0.0f64..std::f64::consts::TAU);
    (-2.0 * u1.ln()).sqrt() * u2.cos()
}
