use anyhow::{Context, Result};
use log::info;
use quantifyer::pipeline::{Pipeline, PipelineError, PipelineResults};
use std::path::PathBuf;

use super::config::Config;
use super::output::{write_json, Envelope};
use super::{CalculationArgs, InputArgs};

/// Validate the tables, run the selected strategy and write the results
pub fn run(
    input: InputArgs,
    calculation: CalculationArgs,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    info!("Quantifyer - Quantitation Run");
    info!("=============================");
    info!("Quantitation export: {}", input.quant.display());

    let results = execute(&input, &calculation, config)?;
    eprintln!("{}", results.summary());

    write_json(&Envelope::new(&input.quant, &results), output.as_deref())
}

/// Load the dataset and run the pipeline; validation failures print the
/// report and exit with status 1
pub fn execute(
    input: &InputArgs,
    calculation: &CalculationArgs,
    config: Option<PathBuf>,
) -> Result<PipelineResults> {
    let config = Config::load(config.as_deref())?.into_pipeline_config(calculation);
    let dataset = input.load()?;

    match Pipeline::new(config).execute(&dataset) {
        Ok(results) => {
            if results.validation.has_warnings() {
                #[cfg(feature = "colorized_output")]
                {
                    eprintln!("{}", results.validation.format_colored());
                }

                #[cfg(not(feature = "colorized_output"))]
                {
                    eprintln!("{}", results.validation);
                }
            }
            Ok(results)
        }
        Err(PipelineError::Validation(report)) => {
            #[cfg(feature = "colorized_output")]
            {
                eprintln!("{}", report.format_colored());
            }

            #[cfg(not(feature = "colorized_output"))]
            {
                eprintln!("{}", report);
            }

            std::process::exit(1);
        }
        Err(e) => Err(e).context("Pipeline failed"),
    }
}
