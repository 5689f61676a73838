use std::path::PathBuf;

use super::diagnostics::FeatureDiagnostics;
use crate::error::Result;

/// Consumer of diagnostic series (decile curves, rolling IC). Rendering lives
/// behind this trait; the engine only produces the series.
pub trait DiagnosticsSink {
    fn consume(&mut self, diagnostics: &[FeatureDiagnostics]) -> Result<()>;
}

/// Writes all series to one pretty-printed JSON file.
pub struct JsonDiagnosticsSink {
    path: PathBuf,
}

impl JsonDiagnosticsSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DiagnosticsSink for JsonDiagnosticsSink {
    fn consume(&mut self, diagnostics: &[FeatureDiagnostics]) -> Result<()> {
        let json = serde_json::to_string_pretty(diagnostics)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Keeps series in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub received: Vec<FeatureDiagnostics>,
}

impl DiagnosticsSink for CollectingSink {
    fn consume(&mut self, diagnostics: &[FeatureDiagnostics]) -> Result<()> {
        self.received.extend_from_slice(diagnostics);
        Ok(())
    }
}

/// Discards everything.
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn consume(&mut self, _diagnostics: &[FeatureDiagnostics]) -> Result<()> {
        Ok(())
    }
}
