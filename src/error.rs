use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input is missing required column(s): {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Feature column `{name}` is not present in the daily panel")]
    UnknownFeature { name: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Column `{name}` already exists in the daily panel")]
    DuplicateColumn { name: String },

    #[error("Column `{name}` has {actual} values but the panel has {expected} rows")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
