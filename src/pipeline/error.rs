use thiserror::Error;

use super::strategy::MissingInput;
use crate::validator::ValidationReport;

/// No calculation chain applies to the supplied inputs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Strategy configuration error: {missing}")]
pub struct StrategyConfigurationError {
    /// Input the request needs
    pub missing: MissingInput,
}

/// Errors that stop a pipeline run before any calculator executes
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Validation found error-severity issues
    #[error("Validation failed with {} error(s)", .0.error_count())]
    Validation(ValidationReport),

    /// Inputs do not support any strategy for the request
    #[error(transparent)]
    StrategyConfiguration(#[from] StrategyConfigurationError),
}
