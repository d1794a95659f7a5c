use anyhow::Result;
use log::info;
use quantifyer::validator::validate_labeled;

use super::output::write_json;
use super::InputArgs;

/// Validate the tables of a run
pub fn run(input: InputArgs, json: bool) -> Result<()> {
    info!("Quantifyer Validator");
    info!("====================");
    info!("Quantitation export: {}", input.quant.display());
    info!("");

    let dataset = input.load()?;
    let report = validate_labeled(&dataset, input.quant.display().to_string());

    if json {
        write_json(&report, None)?;
    } else {
        // Use colorized output if available
        #[cfg(feature = "colorized_output")]
        {
            println!("{}", report.format_colored());
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            println!("{}", report);
        }
    }

    // Exit with error code if validation failed
    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
