use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use nmrscan::catalog::ExperimentCatalog;
use nmrscan::report::ReportStats;

use super::{ColumnArgs, RunConfig};

/// Default report file name inside the data directory
pub const REPORT_FILE: &str = "report.csv";

/// Write the master report of a data directory
pub fn run(
    dir: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    columns: ColumnArgs,
) -> Result<()> {
    let mut config = RunConfig::load(config.as_deref())?;
    columns.apply(&mut config);

    let catalog = ExperimentCatalog::scan(&dir)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;
    let output = output.unwrap_or_else(|| dir.join(REPORT_FILE));
    let stats = generate(&catalog, &config, &output)?;

    println!("{}: {}", output.display(), stats);
    Ok(())
}

/// Write the report of `catalog` to `output`
pub fn generate(catalog: &ExperimentCatalog, config: &RunConfig, output: &Path) -> Result<ReportStats> {
    info!("Writing report to {}", output.display());
    config
        .report
        .builder()
        .write_to(catalog, output)
        .with_context(|| format!("Failed to write report {}", output.display()))
}
