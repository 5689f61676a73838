use std::path::Path;

use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::ic::FeatureSummary;
use crate::model::panel::TRADE_DATE;
use crate::model::quote::REQUIRED_COLUMNS;
use crate::model::{DailyPanel, OptionQuoteRow};

/// Load option quotes from a CSV file. Every column in `REQUIRED_COLUMNS`
/// must be present in the header; empty cells load as missing values.
pub fn load_quotes(path: &Path) -> Result<Vec<OptionQuoteRow>> {
    let rdr = csv::Reader::from_path(path)?;
    read_quotes(rdr)
}

/// Load option quotes from any CSV source.
pub fn read_quotes<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<OptionQuoteRow>> {
    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == **c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns { columns: missing });
    }

    let rows: Vec<OptionQuoteRow> = rdr.deserialize().collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Write the daily panel: `tradeDate` then every column in panel order.
/// Undefined values are written as empty cells.
pub fn write_panel_csv(panel: &DailyPanel, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec![TRADE_DATE.to_string()];
    header.extend(panel.column_names().map(str::to_string));
    wtr.write_record(&header)?;

    for (row, date) in panel.trade_dates().iter().enumerate() {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        record.extend(panel.columns().iter().map(|c| fmt_cell(c.values[row])));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct SummaryCsvRow<'a> {
    feature: &'a str,
    ic_spearman: Option<f64>,
    ic_tstat: Option<f64>,
    ic_pvalue: Option<f64>,
    n_obs: usize,
}

/// Write the ranked IC summary in its ranked order.
pub fn write_summary_csv(summary: &[FeatureSummary], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for s in summary {
        wtr.serialize(SummaryCsvRow {
            feature: &s.feature,
            ic_spearman: s.ic,
            ic_tstat: s.tstat,
            ic_pvalue: s.pvalue,
            n_obs: s.n_obs,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn fmt_cell(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => x.to_string(),
        _ => String::new(),
    }
}
