use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use nmrscan::catalog::{ExperimentCatalog, ExperimentDescriptor};

use super::RunConfig;

/// Configuration template file name
pub const CONFIG_TEMPLATE_FILE: &str = "RunConfig_templ.toml";

/// Per-experiment parameter template file name
pub const PARAMETERS_TEMPLATE_FILE: &str = "parameters_templ.json";

#[derive(Debug, Serialize)]
struct Remark {
    remark: &'static str,
}

/// Write configuration and parameter templates into a data directory
pub fn run(dir: PathBuf) -> Result<()> {
    let catalog = ExperimentCatalog::scan(&dir)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    let config_path = dir.join(CONFIG_TEMPLATE_FILE);
    fs::write(&config_path, RunConfig::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("{}", config_path.display());

    let parameters_path = dir.join(PARAMETERS_TEMPLATE_FILE);
    fs::write(&parameters_path, parameters_template(catalog.experiments())?)
        .with_context(|| format!("Failed to write {}", parameters_path.display()))?;
    println!("{}: {} experiments", parameters_path.display(), catalog.len());
    Ok(())
}

/// JSON object keyed `manip/expno`, sorted
fn parameters_template(experiments: &[ExperimentDescriptor]) -> Result<String> {
    let entries: BTreeMap<String, Remark> = experiments
        .iter()
        .map(|e| {
            let remark = if e.is_2d() {
                "2D experiment"
            } else {
                "1D experiment"
            };
            (format!("{}/{}", e.manip, e.expno), Remark { remark })
        })
        .collect();
    serde_json::to_string_pretty(&entries).context("Failed to serialize parameter template")
}
