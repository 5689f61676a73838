#![cfg(feature = "full")]

mod common;

use option_ic::PipelineError;
use option_ic::example::{ExampleConfig, generate};
use option_ic::features;
use option_ic::ic::{CollectingSink, DiagnosticsSink, JsonDiagnosticsSink, NullSink};
use option_ic::model::{OptionQuoteRow, PipelineConfig};
use option_ic::pipeline::run_pipeline;

const DAYS: usize = 300;

fn quotes(seed: u64) -> Vec<OptionQuoteRow> {
    generate(&ExampleConfig {
        days: DAYS,
        seed,
        start_spot: 400.0,
    })
}

fn config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.ic.rolling_window = 60;
    config.ic.top_features = 3;
    config
}

#[test]
fn generator_is_deterministic_per_seed() {
    assert_eq!(quotes(11), quotes(11));
    assert_ne!(quotes(11), quotes(12));
}

#[test]
fn end_to_end_run_produces_ranked_report() {
    let rows = quotes(7);
    let total = rows.len();
    let mut sink = CollectingSink::default();
    let report = run_pipeline(rows, &config(), &mut sink).unwrap();

    // Validation removes only crossed quotes.
    assert_eq!(report.diagnostics.total_rows, total);
    assert!(report.diagnostics.removed_rows > 0);
    assert!(report.diagnostics.crossed_quote_pct > 0.0);
    assert!(report.diagnostics.missing_liquidity_pct > 0.0);

    // Every generated day carries both time and bucket features.
    assert_eq!(report.panel.len(), DAYS);
    assert!(report.panel.trade_dates().windows(2).all(|w| w[0] < w[1]));
    assert!(report.panel.has_column("vol_63d"));
    assert!(report.panel.has_column("pc_ratio_notional_oi_3mo_atm"));

    // The last day has no next-day return.
    assert_eq!(report.ic.dropped_rows, 1);

    let scored = features::bucket_table(&[], &config().buckets).unwrap().column_names().count();
    assert_eq!(report.ic.summary.len(), 2 * scored);

    let defined: Vec<f64> = report.ic.summary.iter().map_while(|s| s.ic).collect();
    assert!(!defined.is_empty());
    assert!(defined.windows(2).all(|w| w[0] >= w[1]));
    assert!(report.ic.summary[defined.len()..].iter().all(|s| s.ic.is_none()));

    assert_eq!(report.ic.top_features.len(), 3);
    assert_eq!(sink.received, report.ic.diagnostics);
    for (diag, name) in sink.received.iter().zip(&report.ic.top_features) {
        assert_eq!(&diag.feature, name);
        assert!(diag.rolling_ic[..59].iter().all(|p| p.ic.is_none()));
        assert!(diag.rolling_ic[59..].iter().any(|p| p.ic.is_some()));
        assert!(!diag.decile_curve.is_empty());
    }
}

#[test]
fn put_call_ratios_are_always_finite() {
    let mut sink = NullSink;
    let report = run_pipeline(quotes(3), &config(), &mut sink).unwrap();
    for c in report.panel.columns().iter().filter(|c| c.name.starts_with("pc_ratio")) {
        assert!(c.values.iter().all(|v| v.is_some_and(f64::is_finite)), "{}", c.name);
    }
}

#[test]
fn configured_features_limit_scoring() {
    let mut config = config();
    config.ic.features = Some(vec!["put_notvol_1mo_atm".into(), "pc_ratio_notional_vol_1mo_atm".into()]);
    let mut sink = NullSink;
    let report = run_pipeline(quotes(5), &config, &mut sink).unwrap();

    let mut names: Vec<&str> = report.ic.summary.iter().map(|s| s.feature.as_str()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "pc_ratio_notional_vol_1mo_atm_z",
            "pc_ratio_notional_vol_1mo_atm_z_chg1",
            "put_notvol_1mo_atm_z",
            "put_notvol_1mo_atm_z_chg1",
        ]
    );
}

#[test]
fn unknown_configured_feature_fails_the_run() {
    let mut config = config();
    config.ic.features = Some(vec!["not_a_column".into()]);
    let mut sink = NullSink;
    let err = run_pipeline(quotes(5), &config, &mut sink).unwrap_err();
    assert!(matches!(err, PipelineError::UnknownFeature { .. }));
}

#[test]
fn json_sink_writes_top_feature_series() {
    let path = std::env::temp_dir().join(format!("option-ic-{}-diagnostics.json", std::process::id()));
    let mut sink = JsonDiagnosticsSink::new(&path);
    let report = run_pipeline(quotes(9), &config(), &mut sink).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    let series = json.as_array().unwrap();
    assert_eq!(series.len(), report.ic.top_features.len());
    assert_eq!(series[0]["feature"], report.ic.top_features[0].as_str());
    assert!(series[0]["rolling_ic"].as_array().is_some_and(|a| a.len() > 60));

    // The sink itself is usable through the trait object too.
    let dyn_sink: &mut dyn DiagnosticsSink = &mut sink;
    dyn_sink.consume(&[]).unwrap();
    std::fs::remove_file(&path).ok();
}
