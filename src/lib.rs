pub mod data;
pub mod error;
pub mod features;
pub mod ic;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod stats;
pub mod validate;

#[cfg(feature = "full")]
pub mod example;

pub use error::{PipelineError, Result};
