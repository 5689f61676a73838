use schemars::schema_for;

use crate::model::PipelineConfig;

/// Generate and print the JSON Schema for `PipelineConfig`.
pub fn run() -> anyhow::Result<()> {
    let schema = schema_for!(PipelineConfig);
    let json = serde_json::to_string_pretty(&schema)?;
    println!("{json}");
    Ok(())
}

/// Print the default configuration as JSON.
pub fn run_default_config() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&PipelineConfig::default())?;
    println!("{json}");
    Ok(())
}
