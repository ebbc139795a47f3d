use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use nmrscan::report::summary::{analysis_summary, write_analysis_summary};

/// Summarise the bucket tables of a results directory
pub fn run(results: PathBuf, output: Option<PathBuf>) -> Result<()> {
    if !results.is_dir() {
        bail!("Results directory does not exist: {}", results.display());
    }

    match output {
        Some(path) => {
            let tables = write_analysis_summary(&results, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{}: {} entries", path.display(), tables);
        }
        None => {
            let text = analysis_summary(&results)
                .with_context(|| format!("Failed to summarise {}", results.display()))?;
            print!("{}", text);
        }
    }
    Ok(())
}
