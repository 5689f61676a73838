mod common;

use common::{approx, col, daily_quotes, date, quote};
use option_ic::PipelineError;
use option_ic::features::{self, NEXT_DAY_RET, RET_1D, SPOT, vol_column};
use option_ic::model::TimeFeatureConfig;
use option_ic::stats;

fn no_calendar() -> TimeFeatureConfig {
    TimeFeatureConfig {
        compute_calendar: false,
        ..TimeFeatureConfig::default()
    }
}

#[test]
fn one_day_and_next_day_returns() {
    let rows = daily_quotes(&[
        (date(2024, 3, 4), 100.0),
        (date(2024, 3, 5), 102.0),
        (date(2024, 3, 6), 101.0),
    ]);
    let daily = features::build_daily(&rows, &no_calendar()).unwrap();

    let ret = col(&daily, RET_1D);
    assert_eq!(ret[0], None);
    assert!(approx(ret[1].unwrap(), 0.02));
    assert!(approx(ret[2].unwrap(), 101.0 / 102.0 - 1.0));
    assert!((ret[2].unwrap() + 0.0098).abs() < 1e-4);

    let next = col(&daily, NEXT_DAY_RET);
    assert_eq!(next[0], ret[1]);
    assert_eq!(next[1], ret[2]);
    assert_eq!(next[2], None);
}

#[test]
fn next_day_return_is_shifted_one_day_return() {
    let spots = [100.0, 101.5, 99.0, 99.5, 103.0, 102.0, 104.5, 104.0];
    let days: Vec<_> = spots
        .iter()
        .enumerate()
        .map(|(i, &s)| (date(2024, 5, 1 + i as u32), s))
        .collect();
    let daily = features::build_daily(&daily_quotes(&days), &no_calendar()).unwrap();

    let ret = col(&daily, RET_1D);
    let next = col(&daily, NEXT_DAY_RET);
    for t in 0..daily.len() - 1 {
        assert_eq!(next[t], ret[t + 1]);
    }
    assert_eq!(next[daily.len() - 1], None);
}

#[test]
fn spot_is_first_observed_value_per_date() {
    let d1 = date(2024, 3, 5);
    let d0 = date(2024, 3, 4);
    let mut missing = quote(d1, 30, 0.0);
    missing.spot_price = None;
    let rows = vec![
        missing,
        quote(d1, 10, 105.0),
        quote(d0, 10, 100.0),
        quote(d1, 20, 110.0),
        quote(d0, 20, 90.0),
    ];

    let daily = features::build_daily(&rows, &no_calendar()).unwrap();
    assert_eq!(daily.trade_dates(), &[d0, d1]);
    assert_eq!(col(&daily, SPOT), &[Some(100.0), Some(105.0)]);
}

#[test]
fn columns_follow_declared_order() {
    let rows = daily_quotes(&[(date(2024, 3, 4), 100.0), (date(2024, 3, 5), 101.0)]);
    let daily = features::build_daily(&rows, &TimeFeatureConfig::default()).unwrap();
    let names: Vec<&str> = daily.column_names().collect();
    assert_eq!(
        names,
        vec![
            "spot",
            "ret_1d",
            "nextDayRet",
            "vol_5d",
            "vol_21d",
            "vol_63d",
            "is_monday",
            "is_friday",
            "is_option_expiry",
            "month",
            "is_month_end_trading",
            "is_quarter_end_trading",
            "is_year_end_trading",
        ]
    );
}

#[test]
fn realised_vol_needs_a_full_window() {
    let spots = [100.0, 102.0, 101.0, 104.0, 103.0, 103.5];
    let days: Vec<_> = spots
        .iter()
        .enumerate()
        .map(|(i, &s)| (date(2024, 6, 3 + i as u32), s))
        .collect();
    let config = TimeFeatureConfig {
        vol_windows: vec![2, 3],
        ..no_calendar()
    };
    let daily = features::build_daily(&daily_quotes(&days), &config).unwrap();
    let ret = col(&daily, RET_1D);

    for w in [2usize, 3] {
        let vol = col(&daily, &vol_column(w));
        for (t, v) in vol.iter().enumerate() {
            if t < w {
                assert_eq!(*v, None, "vol_{w}d at {t}");
            } else {
                assert!(v.unwrap() >= 0.0);
            }
        }
    }

    let vol2 = col(&daily, "vol_2d");
    let expected = stats::sample_std(&[ret[1].unwrap(), ret[2].unwrap()]).unwrap() * 252f64.sqrt();
    assert!(approx(vol2[2].unwrap(), expected));
}

#[test]
fn constant_spot_has_zero_vol() {
    let days: Vec<_> = (0..8).map(|i| (date(2024, 6, 3 + i), 250.0)).collect();
    let config = TimeFeatureConfig {
        vol_windows: vec![5],
        ..no_calendar()
    };
    let daily = features::build_daily(&daily_quotes(&days), &config).unwrap();
    let vol = col(&daily, "vol_5d");
    assert_eq!(vol[5], Some(0.0));
    assert_eq!(vol[7], Some(0.0));
}

#[test]
fn calendar_flags_use_last_traded_day_of_each_period() {
    let dates = [
        date(2024, 1, 29), // Monday
        date(2024, 1, 31), // Wednesday, last in January
        date(2024, 2, 2),  // Friday, only February date
        date(2024, 3, 28), // Thursday expiry, last in March and Q1
        date(2024, 12, 20), // Friday expiry
        date(2024, 12, 27), // Friday, last in December, Q4 and 2024
    ];
    let days: Vec<_> = dates.iter().map(|&d| (d, 100.0)).collect();
    let daily = features::build_daily(&daily_quotes(&days), &TimeFeatureConfig::default()).unwrap();

    let dense = |name: &str| -> Vec<f64> { col(&daily, name).iter().map(|v| v.unwrap()).collect() };
    assert_eq!(dense("is_monday"), vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(dense("is_friday"), vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
    assert_eq!(dense("is_option_expiry"), vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
    assert_eq!(dense("month"), vec![1.0, 1.0, 2.0, 3.0, 12.0, 12.0]);
    assert_eq!(dense("is_month_end_trading"), vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0]);
    assert_eq!(dense("is_quarter_end_trading"), vec![0.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
    assert_eq!(dense("is_year_end_trading"), vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn custom_expiry_dates_replace_defaults() {
    let d = date(2024, 3, 28);
    let config = TimeFeatureConfig {
        expiry_dates: vec![date(2024, 3, 27)],
        ..TimeFeatureConfig::default()
    };
    let daily = features::build_daily(&daily_quotes(&[(d, 100.0)]), &config).unwrap();
    assert_eq!(col(&daily, "is_option_expiry"), &[Some(0.0)]);
}

#[test]
fn disabled_stages_add_no_columns() {
    let config = TimeFeatureConfig {
        compute_realised: false,
        compute_calendar: false,
        ..TimeFeatureConfig::default()
    };
    let daily = features::build_daily(&daily_quotes(&[(date(2024, 3, 4), 100.0)]), &config).unwrap();
    let names: Vec<&str> = daily.column_names().collect();
    assert_eq!(names, vec!["spot", "ret_1d", "nextDayRet"]);
}

#[test]
fn rebuilding_from_daily_rows_is_idempotent() {
    let days: Vec<_> = [100.0, 101.0, 99.5, 102.0, 103.0, 101.0, 100.0]
        .iter()
        .enumerate()
        .map(|(i, &s)| (date(2024, 7, 1 + i as u32), s))
        .collect();
    let config = TimeFeatureConfig {
        vol_windows: vec![3],
        ..TimeFeatureConfig::default()
    };

    // Many quotes per day collapse to the same panel as one quote per day.
    let mut intraday = Vec::new();
    for &(d, s) in &days {
        for dte in [5, 40, 200] {
            intraday.push(quote(d, dte, s));
        }
    }
    let first = features::build_daily(&intraday, &config).unwrap();
    let daily_rows: Vec<_> = first
        .records()
        .map(|r| quote(r.trade_date(), 10, r.get(SPOT).unwrap()))
        .collect();
    let second = features::build_daily(&daily_rows, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn zero_spot_gives_undefined_return() {
    let rows = daily_quotes(&[
        (date(2024, 3, 4), 0.0),
        (date(2024, 3, 5), 100.0),
        (date(2024, 3, 6), 101.0),
    ]);
    let daily = features::build_daily(&rows, &no_calendar()).unwrap();
    let ret = col(&daily, RET_1D);
    assert_eq!(ret[1], None);
    assert!(ret[2].is_some());
}

#[test]
fn invalid_window_is_rejected() {
    let config = TimeFeatureConfig {
        vol_windows: vec![1],
        ..TimeFeatureConfig::default()
    };
    let err = features::build_daily(&daily_quotes(&[(date(2024, 3, 4), 100.0)]), &config).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidConfig { .. }));
}
