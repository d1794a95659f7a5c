//! # Quantifyer
//!
//! Command-line front end for the quantitation pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Check the tables
//! quantifyer validate -q quant.csv -c is_correspondence.csv -s samples.csv --qc qc.csv
//!
//! # Compute every metric the inputs allow
//! quantifyer run -q quant.csv -c is_correspondence.csv -s samples.csv \
//!     --qc qc.csv --is-concentration is_concentration.csv -o results.json
//!
//! # Plot-ready recovery per compound
//! quantifyer plot-data -q quant.csv -c is_correspondence.csv -s samples.csv \
//!     --qc qc.csv -m recovery -g by_compound
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
