use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use nmrscan::bucket::write_table_file;
use nmrscan::catalog::{ExperimentCatalog, ExperimentDescriptor};
use nmrscan::report::summary::{write_analysis_summary, DIR_1D, DIR_2D};
use nmrscan::spectrum::ProcessedSpectrum;

use super::bucket::bucket_spectrum;
use super::report::{generate, REPORT_FILE};
use super::RunConfig;

/// Results directory created inside the data directory
pub const RESULTS_DIR: &str = "Results";

/// Analysis summary written inside the data directory
pub const ANALYSIS_FILE: &str = "analysis.csv";

/// Effective configuration written next to the report
pub const CONFIG_DUMP_FILE: &str = "RunConfig.dump.toml";

/// Processing number whose data is bucketed
const PROCNO: u32 = 1;

/// Report, bucket every experiment and summarise a data directory
pub fn run(dir: PathBuf, config: Option<PathBuf>, dry: bool) -> Result<()> {
    let config = RunConfig::load(config.as_deref())?;
    let results = dir.join(RESULTS_DIR);
    if results.exists() {
        bail!(
            "Results from a previous run are present in {}; remove them first",
            results.display()
        );
    }

    let catalog = ExperimentCatalog::scan(&dir)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;
    let stats = generate(&catalog, &config, &dir.join(REPORT_FILE))?;
    println!("{}: {}", dir.join(REPORT_FILE).display(), stats);

    let dump = dir.join(CONFIG_DUMP_FILE);
    fs::write(&dump, config.to_toml()?)
        .with_context(|| format!("Failed to write {}", dump.display()))?;
    if dry {
        info!("Dry run, skipping bucketing");
        return Ok(());
    }

    let mut written = 0;
    for experiment in &catalog {
        match process_experiment(experiment, &config, &results) {
            Ok(path) => {
                info!("{}", path.display());
                written += 1;
            }
            Err(e) => warn!(
                "Skipping {}/{}: {:#}",
                experiment.manip, experiment.expno, e
            ),
        }
    }
    println!(
        "Bucketed {} of {} experiments into {}",
        written,
        catalog.len(),
        results.display()
    );

    if !results.is_dir() {
        warn!("No bucket table written, no analysis summary");
        return Ok(());
    }
    let analysis = dir.join(ANALYSIS_FILE);
    let entries = write_analysis_summary(&results, &analysis)
        .with_context(|| format!("Failed to write {}", analysis.display()))?;
    println!("{}: {} entries", analysis.display(), entries);
    Ok(())
}

fn process_experiment(
    experiment: &ExperimentDescriptor,
    config: &RunConfig,
    results: &Path,
) -> Result<PathBuf> {
    let pdata = experiment.pdata_dir(PROCNO);
    let spectrum = ProcessedSpectrum::read(&pdata)
        .with_context(|| format!("No usable processed data in {}", pdata.display()))?;
    let buckets = bucket_spectrum(
        &spectrum,
        Some(&experiment.path),
        experiment.is_dosy,
        &config.bucket,
    )?;

    let path = table_path(results, experiment, &spectrum);
    write_table_file(buckets.table(), &path)?;
    Ok(path)
}

/// `Results/<manip>/1D/<expno>_bucketlist.csv` or
/// `Results/<manip>/2D/<kind>_<expno>_bucketlist.csv`
fn table_path(results: &Path, experiment: &ExperimentDescriptor, spectrum: &ProcessedSpectrum) -> PathBuf {
    let sample = results.join(&experiment.manip);
    match spectrum {
        ProcessedSpectrum::OneD(_) => sample
            .join(DIR_1D)
            .join(format!("{}_bucketlist.csv", experiment.expno)),
        ProcessedSpectrum::TwoD(_) => {
            let kind = if experiment.is_dosy { "DOSY" } else { "2D" };
            sample
                .join(DIR_2D)
                .join(format!("{}_{}_bucketlist.csv", kind, experiment.expno))
        }
    }
}
