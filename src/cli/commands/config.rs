//! Prints the effective configuration.

use crate::config::EffectiveConfig;
use crate::error::Result;

/// Print the configuration as JSON with every secret masked.
pub(super) fn execute_config(config: &EffectiveConfig, full: bool) -> Result<i32> {
    let json = serde_json::to_string_pretty(&config.as_map(full))?;
    println!("{json}");
    Ok(0)
}
