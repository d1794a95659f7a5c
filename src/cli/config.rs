//! TOML configuration file support.
//!
//! Instead of passing the calculation flags on every run, users can keep them
//! in a config file:
//!
//! ```toml
//! # quantifyer.toml
//! [calculation]
//! default_correction_factor = 1.0
//! replicate_average = "median"
//! blank_subtraction = true
//! normalization_property = "mass"
//!
//! [output]
//! recovery_corrected = true
//! require_concentration = false
//! ```
//!
//! Flags given on the command line override the file.

use anyhow::{Context, Result};
use quantifyer::calculator::{CalculationPolicy, ReplicateAverage};
use quantifyer::pipeline::{OutputRequest, PipelineConfig};
use serde::Deserialize;
use std::path::Path;

use super::CalculationArgs;

/// Root configuration structure for quantifyer.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Numeric policy of the calculators.
    #[serde(default)]
    pub calculation: CalculationPolicy,

    /// Which results are requested.
    #[serde(default)]
    pub output: OutputRequest,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file when one is given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides and build the pipeline configuration.
    pub fn into_pipeline_config(self, args: &CalculationArgs) -> PipelineConfig {
        let mut config = PipelineConfig {
            calculation: self.calculation,
            output: self.output,
        };

        if let Some(factor) = args.default_correction_factor {
            config.calculation.default_correction_factor = factor;
        }
        if let Some(average) = args.average {
            config.calculation.replicate_average = ReplicateAverage::from(average);
        }
        if args.no_blank_subtraction {
            config.calculation.blank_subtraction = false;
        }
        if let Some(property) = &args.normalize_by {
            config.calculation.normalization_property = property.clone();
        }
        if args.require_concentration {
            config.output.require_concentration = true;
        }
        if args.no_recovery_correction {
            config.output.recovery_corrected = false;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AverageArg;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [calculation]
            default_correction_factor = 0.9
            replicate_average = "median"
            blank_subtraction = false
            normalization_property = "mass"

            [output]
            recovery_corrected = false
            require_concentration = true
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.calculation.default_correction_factor, 0.9);
        assert_eq!(config.calculation.replicate_average, ReplicateAverage::Median);
        assert!(!config.calculation.blank_subtraction);
        assert_eq!(config.calculation.normalization_property, "mass");
        assert!(!config.output.recovery_corrected);
        assert!(config.output.require_concentration);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [calculation]
            normalization_property = "mass"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.calculation.normalization_property, "mass");
        assert_eq!(config.calculation.default_correction_factor, 1.0);
        assert!(config.calculation.blank_subtraction);
        assert!(config.output.recovery_corrected);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.calculation, CalculationPolicy::default());
        assert_eq!(config.output, OutputRequest::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::from_str("[calculation]\nreplicate_average = \"mode\"").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config::from_str("[calculation]\ndefault_correction_factor = 0.9").unwrap();
        let args = CalculationArgs {
            default_correction_factor: None,
            average: Some(AverageArg::Median),
            no_blank_subtraction: true,
            normalize_by: Some("mass".to_string()),
            require_concentration: false,
            no_recovery_correction: true,
        };

        let pipeline = config.into_pipeline_config(&args);
        assert_eq!(pipeline.calculation.default_correction_factor, 0.9);
        assert_eq!(pipeline.calculation.replicate_average, ReplicateAverage::Median);
        assert!(!pipeline.calculation.blank_subtraction);
        assert_eq!(pipeline.calculation.normalization_property, "mass");
        assert!(!pipeline.output.recovery_corrected);
        assert!(!pipeline.output.require_concentration);
    }
}
