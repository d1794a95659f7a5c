//! # Quantitation Pipeline
//!
//! Runs one dataset through validation, strategy selection and the
//! calculators, in this order:
//!
//! 1. [`validate`]: any error-severity issue aborts with
//!    [`PipelineError::Validation`]
//! 2. [`select_strategy`]: a [`Strategy::Invalid`] aborts with
//!    [`PipelineError::StrategyConfiguration`]
//! 3. correction factor → recovery → response factor → concentration
//!
//! Result slots the strategy does not compute are `None`, never empty tables.
//!
//! | Strategy | recovery | correction factor | concentration |
//! |----------|----------|-------------------|---------------|
//! | Full | ✓ | ✓ | ✓ (recovery corrected) |
//! | PartialNoRecovery | - | ✓ | ✓ |
//! | Minimal | ✓ | - | - |
//!
//! Response factors are computed whenever the internal-standard concentration
//! table and at least one IS check sample are present.
//!
//! ## Example
//!
//! ```rust,no_run
//! use quantifyer::pipeline::{Pipeline, PipelineConfig};
//! # fn bundle() -> quantifyer::dataset::DatasetBundle { unimplemented!() }
//!
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let results = pipeline.execute(&bundle())?;
//! println!("{}", results.summary());
//! # Ok::<(), quantifyer::pipeline::PipelineError>(())
//! ```

use std::fmt;

use log::{info, warn};
use serde::Serialize;

use crate::calculator::{
    calculate_concentration, calculate_correction_factor, calculate_recovery,
    calculate_response_factor, ConcentrationResult, CorrectionFactorResult, Coverage,
    RecoveryResult, ResponseFactorResult,
};
use crate::dataset::{DatasetBundle, SampleType};
use crate::validator::{validate, ValidationReport};

mod config;
mod error;
mod strategy;


pub use config::PipelineConfig;
pub use error::{PipelineError, StrategyConfigurationError};
pub use strategy::{select_strategy, DatasetProfile, MissingInput, OutputRequest, Strategy};

/// Tables produced by one run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResults {
    /// Strategy that was executed
    pub strategy: Strategy,
    /// Recovery per (spike sample, compound)
    pub recovery: Option<RecoveryResult>,
    /// Correction factor per compound
    pub correction_factors: Option<CorrectionFactorResult>,
    /// Response factor per (IS check sample, internal standard)
    pub response_factors: Option<ResponseFactorResult>,
    /// Concentration per (sample, compound)
    pub concentrations: Option<ConcentrationResult>,
    /// Validation report, including warnings
    pub validation: ValidationReport,
}

impl PipelineResults {
    /// Coverage of every computed table
    pub fn summary(&self) -> ResultsSummary {
        ResultsSummary {
            strategy: self.strategy,
            recovery: self.recovery.as_ref().map(|t| t.coverage()),
            correction_factors: self.correction_factors.as_ref().map(|t| t.coverage()),
            response_factors: self.response_factors.as_ref().map(|t| t.coverage()),
            concentrations: self.concentrations.as_ref().map(|t| t.coverage()),
            warnings: self.validation.warning_count(),
        }
    }
}

/// Coverage counts of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultsSummary {
    /// Strategy that was executed
    pub strategy: Strategy,
    /// Recovery coverage
    pub recovery: Option<Coverage>,
    /// Correction factor coverage
    pub correction_factors: Option<Coverage>,
    /// Response factor coverage
    pub response_factors: Option<Coverage>,
    /// Concentration coverage
    pub concentrations: Option<Coverage>,
    /// Validation warnings carried along
    pub warnings: usize,
}

impl fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quantitation Results:")?;
        writeln!(f, "  Strategy: {}", self.strategy)?;
        let rows = [
            ("Recovery", self.recovery),
            ("Correction factors", self.correction_factors),
            ("Response factors", self.response_factors),
            ("Concentrations", self.concentrations),
        ];
        for (name, coverage) in rows {
            match coverage {
                Some(coverage) => writeln!(f, "  {}: {}", name, coverage)?,
                None => writeln!(f, "  {}: not computed", name)?,
            }
        }
        write!(f, "  Validation warnings: {}", self.warnings)
    }
}

/// Validates a dataset and runs the calculators its inputs support
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Configuration of this pipeline
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Strategy this pipeline would run for a dataset
    pub fn strategy_for(&self, dataset: &DatasetBundle) -> Strategy {
        select_strategy(&DatasetProfile::of(dataset), &self.config.output)
    }

    /// Run one dataset
    pub fn execute(&self, dataset: &DatasetBundle) -> Result<PipelineResults, PipelineError> {
        let validation = validate(dataset);
        if validation.has_errors() {
            warn!(
                "Validation failed: {} error(s), {} warning(s)",
                validation.error_count(),
                validation.warning_count()
            );
            return Err(PipelineError::Validation(validation));
        }

        let strategy = self.strategy_for(dataset);
        if let Strategy::Invalid(missing) = strategy {
            return Err(StrategyConfigurationError { missing }.into());
        }
        info!("Selected strategy: {}", strategy);

        let policy = &self.config.calculation;

        let correction_factors = strategy
            .computes_concentration()
            .then(|| calculate_correction_factor(dataset, policy));
        if let Some(table) = &correction_factors {
            info!("Correction factors: {}", table.coverage());
        }

        let recovery = strategy
            .computes_recovery()
            .then(|| calculate_recovery(dataset));
        if let Some(table) = &recovery {
            info!("Recovery: {}", table.coverage());
        }

        let response_factors = (dataset.has_standard_amounts()
            && dataset
                .samples_of_type(&SampleType::InternalStandardCheck)
                .next()
                .is_some())
        .then(|| calculate_response_factor(dataset));
        if let Some(table) = &response_factors {
            info!("Response factors: {}", table.coverage());
        }

        let concentrations = correction_factors.as_ref().map(|factors| {
            let injected = if strategy.corrects_recovery() {
                recovery.as_ref()
            } else {
                None
            };
            calculate_concentration(dataset, factors, injected, policy)
        });
        if let Some(table) = &concentrations {
            info!("Concentrations: {}", table.coverage());
        }

        Ok(PipelineResults {
            strategy,
            recovery,
            correction_factors,
            response_factors,
            concentrations,
            validation,
        })
    }

    /// Run independent datasets in parallel
    #[cfg(feature = "parallel")]
    pub fn execute_batch(
        &self,
        datasets: &[DatasetBundle],
    ) -> Vec<Result<PipelineResults, PipelineError>> {
        use rayon::prelude::*;

        datasets
            .par_iter()
            .map(|dataset| self.execute(dataset))
            .collect()
    }
}
