use std::path::Path;

use anyhow::{Result, Context};
use log::{debug, info};

use crate::timetable::types::ExtractOptions;
use crate::utils::file_utils;

/// Load extraction options from a TOML file.
/// Keys that are absent keep their default values.
pub fn load_options(path: impl AsRef<Path>) -> Result<ExtractOptions> {
    let path = path.as_ref();
    debug!("Loading extraction options from {}", path.display());

    let content = file_utils::read_text(path)?;
    let options = parse_options(&content)
        .with_context(|| format!("Failed to parse options file {}", path.display()))?;

    info!("Loaded extraction options from {}", path.display());
    Ok(options)
}

/// Parse extraction options from TOML text
pub fn parse_options(content: &str) -> Result<ExtractOptions> {
    let options: ExtractOptions = toml::from_str(content).context("Invalid TOML options")?;
    Ok(options)
}
