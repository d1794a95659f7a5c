use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use quantifyer::calculator::ReplicateAverage;
use quantifyer::dataset::DatasetBundle;
use quantifyer::ingest::DatasetFiles;
use std::path::PathBuf;

mod config;
mod output;
mod plot;
mod run;
mod validate;

/// Quantifyer - Internal-Standard Quantitation for Mass Spectrometry
#[derive(Parser)]
#[command(name = "quantifyer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// The CSV tables of one run.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Quantitation export (wide: name, type, one column per sample)
    #[arg(short = 'q', long, value_name = "FILE")]
    quant: PathBuf,

    /// Internal-standard correspondence table
    #[arg(short = 'c', long, value_name = "FILE")]
    correspondence: PathBuf,

    /// Sample properties table
    #[arg(short = 's', long, value_name = "FILE")]
    samples: PathBuf,

    /// QC reference table
    #[arg(long, value_name = "FILE")]
    qc: Option<PathBuf>,

    /// Internal-standard concentration table
    #[arg(long, value_name = "FILE")]
    is_concentration: Option<PathBuf>,
}

impl InputArgs {
    fn files(&self) -> DatasetFiles {
        let mut files = DatasetFiles::new(&self.quant, &self.correspondence, &self.samples);
        if let Some(qc) = &self.qc {
            files = files.with_qc_file(qc);
        }
        if let Some(amounts) = &self.is_concentration {
            files = files.with_is_concentration_file(amounts);
        }
        files
    }

    /// Read and assemble the dataset
    pub fn load(&self) -> Result<DatasetBundle> {
        self.files()
            .load()
            .with_context(|| format!("Failed to load dataset from {}", self.quant.display()))
    }
}

/// Replicate averaging method.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AverageArg {
    /// Arithmetic mean
    Mean,
    /// Median
    Median,
}

impl From<AverageArg> for ReplicateAverage {
    fn from(arg: AverageArg) -> Self {
        match arg {
            AverageArg::Mean => ReplicateAverage::Mean,
            AverageArg::Median => ReplicateAverage::Median,
        }
    }
}

/// Calculation settings; each one overrides the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct CalculationArgs {
    /// Correction factor for compounds without a QC reference
    #[arg(long, value_name = "FACTOR")]
    default_correction_factor: Option<f64>,

    /// How replicates, blanks and recoveries are averaged
    #[arg(long, value_enum)]
    average: Option<AverageArg>,

    /// Do not subtract the blank level
    #[arg(long)]
    no_blank_subtraction: bool,

    /// Sample property concentrations are normalized by
    #[arg(long, value_name = "PROPERTY")]
    normalize_by: Option<String>,

    /// Fail when concentrations cannot be computed
    #[arg(long)]
    require_concentration: bool,

    /// Report concentrations without recovery correction
    #[arg(long)]
    no_recovery_correction: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the tables and compute every metric the inputs allow
    Run {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        calculation: CalculationArgs,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write the JSON results here instead of stdout
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Check the tables for consistency without calculating
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Aggregate one metric for plotting
    PlotData {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        calculation: CalculationArgs,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// recovery, response_factor, correction_factor or concentration
        #[arg(short = 'm', long)]
        metric: String,

        /// by_sample or by_compound
        #[arg(short = 'g', long, default_value = "by_compound")]
        grouping: String,

        /// Write the JSON view here instead of stdout
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
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
        Commands::Run {
            input,
            calculation,
            config,
            output,
        } => run::run(input, calculation, config, output),
        Commands::Validate { input, json } => validate::run(input, json),
        Commands::PlotData {
            input,
            calculation,
            config,
            metric,
            grouping,
            output,
        } => plot::run(input, calculation, config, &metric, &grouping, output),
    }
}
