use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::error::{PipelineError, Result};

/// Name of the trade-date key column when a panel is written out.
pub const TRADE_DATE: &str = "tradeDate";

/// A named column of a daily panel. `None` marks an undefined value.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Daily panel: one record per trade date, ascending, with an append-only
/// ordered set of named feature columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyPanel {
    trade_dates: Vec<NaiveDate>,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
}

/// Read-only view of one panel row.
#[derive(Debug, Clone, Copy)]
pub struct DailyRecord<'a> {
    panel: &'a DailyPanel,
    row: usize,
}

impl DailyRecord<'_> {
    pub fn trade_date(&self) -> NaiveDate {
        self.panel.trade_dates[self.row]
    }

    /// Value of `column` on this row; `None` when the column is absent or the value undefined.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.panel.column(column).and_then(|c| c[self.row])
    }
}

impl DailyPanel {
    pub fn new(trade_dates: Vec<NaiveDate>) -> Self {
        Self {
            trade_dates,
            columns: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.trade_dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trade_dates.is_empty()
    }

    pub fn trade_dates(&self) -> &[NaiveDate] {
        &self.trade_dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.index.get(name).map(|&i| self.columns[i].values.as_slice())
    }

    pub fn record(&self, row: usize) -> Option<DailyRecord<'_>> {
        (row < self.len()).then_some(DailyRecord { panel: self, row })
    }

    pub fn records(&self) -> impl Iterator<Item = DailyRecord<'_>> {
        (0..self.len()).map(move |row| DailyRecord { panel: self, row })
    }

    /// Append a column. Existing columns are never overwritten.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(PipelineError::DuplicateColumn { name });
        }
        if values.len() != self.len() {
            return Err(PipelineError::LengthMismatch {
                name,
                expected: self.len(),
                actual: values.len(),
            });
        }
        self.index.insert(name.clone(), self.columns.len());
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Append a fully-defined column.
    pub fn push_dense(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        self.push_column(name, values.into_iter().map(Some).collect())
    }

    /// Inner join on trade date. Keeps the dates present in both panels, in
    /// this panel's order, with this panel's columns followed by `other`'s.
    pub fn inner_join(self, other: &DailyPanel) -> Result<DailyPanel> {
        let other_rows: HashMap<NaiveDate, usize> = other
            .trade_dates
            .iter()
            .enumerate()
            .map(|(i, d)| (*d, i))
            .collect();

        let pairs: Vec<(usize, usize)> = self
            .trade_dates
            .iter()
            .enumerate()
            .filter_map(|(i, d)| other_rows.get(d).map(|&j| (i, j)))
            .collect();

        let mut joined = DailyPanel::new(pairs.iter().map(|&(i, _)| self.trade_dates[i]).collect());
        for col in self.columns {
            let values = pairs.iter().map(|&(i, _)| col.values[i]).collect();
            joined.push_column(col.name, values)?;
        }
        for col in &other.columns {
            let values = pairs.iter().map(|&(_, j)| col.values[j]).collect();
            joined.push_column(col.name.clone(), values)?;
        }
        Ok(joined)
    }

    /// Keep only the rows for which `keep` is true.
    pub fn filter_rows(&self, keep: &[bool]) -> DailyPanel {
        let mut out = DailyPanel::new(
            self.trade_dates
                .iter()
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(d, _)| *d)
                .collect(),
        );
        for col in &self.columns {
            let values: Vec<Option<f64>> = col
                .values
                .iter()
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(v, _)| *v)
                .collect();
            out.index.insert(col.name.clone(), out.columns.len());
            out.columns.push(Column {
                name: col.name.clone(),
                values,
            });
        }
        out
    }

    /// A new panel carrying only the named columns, in the order given.
    pub fn select(&self, names: &[&str]) -> Result<DailyPanel> {
        let mut out = DailyPanel::new(self.trade_dates.clone());
        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(*name) {
                continue;
            }
            let values = self.column(name).ok_or_else(|| PipelineError::UnknownFeature {
                name: name.to_string(),
            })?;
            out.push_column(*name, values.to_vec())?;
        }
        Ok(out)
    }
}
