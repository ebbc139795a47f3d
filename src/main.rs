//! # nmrscan
//!
//! A command-line tool for cataloguing, reporting and bucketing directories of
//! Bruker NMR experiments.
//!
//! ## Usage
//!
//! ```bash
//! # Master report of every experiment below /data/run42
//! nmrscan report /data/run42 --title --add D8
//!
//! # Bucket one processed spectrum
//! nmrscan bucket /data/run42/PFDA/1/pdata/1 --zoom 0.5 9.5 --size 0.01
//!
//! # Report, bucket every experiment and write /data/run42/analysis.csv
//! nmrscan process /data/run42 --config nmrscan.toml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
