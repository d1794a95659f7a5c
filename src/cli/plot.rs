use anyhow::{Context, Result};
use log::info;
use quantifyer::plot::{aggregate, Grouping, Metric};
use std::path::PathBuf;

use super::output::{write_json, Envelope};
use super::run::execute;
use super::{CalculationArgs, InputArgs};

/// Run the pipeline and write the aggregation view of one metric
pub fn run(
    input: InputArgs,
    calculation: CalculationArgs,
    config: Option<PathBuf>,
    metric: &str,
    grouping: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let metric: Metric = metric.parse()?;
    let grouping: Grouping = grouping.parse()?;

    let results = execute(&input, &calculation, config)?;
    let view = aggregate(&results, metric, grouping)
        .with_context(|| format!("Cannot plot {} ({} strategy)", metric, results.strategy))?;
    info!("Aggregated {} into {} group(s)", metric, view.groups.len());

    write_json(&Envelope::new(&input.quant, &view), output.as_deref())
}
