use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod bucket;
mod config;
mod list;
mod process;
mod report;
mod summary;
mod template;

pub use config::RunConfig;

/// nmrscan - Catalog, report and bucket Bruker NMR experiments
#[derive(Parser)]
#[command(name = "nmrscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Extra report columns given on the command line
#[derive(clap::Args, Debug, Default)]
pub struct ColumnArgs {
    /// Append a parameter to the 1D columns (repeatable)
    #[arg(long = "add", value_name = "PARAM")]
    pub add: Vec<String>,

    /// Append a parameter to the 2D columns (repeatable)
    #[arg(long = "add-2d", value_name = "PARAM")]
    pub add_2d: Vec<String>,

    /// Append a parameter to the DOSY columns (repeatable)
    #[arg(long = "add-dosy", value_name = "PARAM")]
    pub add_dosy: Vec<String>,

    /// Append the title annotation columns
    #[arg(long)]
    pub title: bool,
}

impl ColumnArgs {
    /// Fold the flags into a loaded configuration
    pub fn apply(self, config: &mut RunConfig) {
        config.report.add.extend(self.add);
        config.report.add_2d.extend(self.add_2d);
        config.report.add_dosy.extend(self.add_dosy);
        config.report.title |= self.title;
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the master CSV report of a data directory
    Report {
        /// Data directory (one folder per sample)
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output CSV path (defaults to DIR/report.csv)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[command(flatten)]
        columns: ColumnArgs,
    },

    /// Bucket one processed spectrum
    Bucket {
        /// Processed data directory (EXPNO/pdata/PROCNO)
        #[arg(value_name = "PDATA_DIR")]
        pdata: PathBuf,

        /// Output CSV path (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Zoom range in ppm (1D only)
        #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"], allow_negative_numbers = true)]
        zoom: Option<Vec<f64>>,

        /// Bucket size in ppm (1D only)
        #[arg(long, value_name = "PPM")]
        size: Option<f64>,

        /// Add skewness and kurtosis columns
        #[arg(long)]
        moments: bool,
    },

    /// Report, bucket every experiment and summarise a data directory
    Process {
        /// Data directory (one folder per sample)
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Only write the report and the effective configuration
        #[arg(long)]
        dry: bool,
    },

    /// Summarise the bucket tables of a results directory
    Summary {
        /// Results directory (one folder per sample)
        #[arg(value_name = "RESULTS_DIR")]
        results: PathBuf,

        /// Output CSV path (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the experiments of a data directory
    List {
        /// Data directory (one folder per sample)
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write configuration and parameter templates into a data directory
    Template {
        /// Data directory (one folder per sample)
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Report {
            dir,
            output,
            config,
            columns,
        } => report::run(dir, output, config, columns),
        Commands::Bucket {
            pdata,
            output,
            config,
            zoom,
            size,
            moments,
        } => bucket::run(
            pdata,
            output,
            config,
            zoom.map(|z| (z[0], z[1])),
            size,
            moments,
        ),
        Commands::Process { dir, config, dry } => process::run(dir, config, dry),
        Commands::Summary { results, output } => summary::run(results, output),
        Commands::List { dir, json } => list::run(dir, json),
        Commands::Template { dir } => template::run(dir),
    }
}
