use anyhow::{Context, Result};
use std::path::PathBuf;

use nmrscan::catalog::{ExperimentCatalog, ExperimentDescriptor};

/// List the experiments of a data directory
pub fn run(dir: PathBuf, json: bool) -> Result<()> {
    let catalog = ExperimentCatalog::scan(&dir)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    if json {
        let text = serde_json::to_string_pretty(catalog.experiments())
            .context("Failed to serialize catalog")?;
        println!("{}", text);
        return Ok(());
    }

    for experiment in &catalog {
        println!("{}", format_line(experiment));
    }
    println!("{} experiments", catalog.len());
    Ok(())
}

fn format_line(experiment: &ExperimentDescriptor) -> String {
    let name = format!("{}/{}", experiment.manip, experiment.expno);

    #[cfg(feature = "colorized_output")]
    {
        use console::style;

        let kind = match experiment.kind_label() {
            "DOSY" => style(experiment.kind_label()).magenta(),
            "2D" => style(experiment.kind_label()).cyan(),
            other => style(other).green(),
        };
        format!("{:<24} {:<6} {}", style(name).bold(), kind, experiment.date)
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        format!("{:<24} {:<6} {}", name, experiment.kind_label(), experiment.date)
    }
}
