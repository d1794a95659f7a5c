use serde::{Deserialize, Serialize};

use super::OutputRequest;
use crate::calculator::CalculationPolicy;

/// Settings of one pipeline run
///
/// Deserializes from the `[calculation]` and `[output]` tables of a
/// configuration file; every field has a default.
///
/// ```rust
/// use quantifyer::pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.calculation.default_correction_factor, 1.0);
/// assert!(config.output.recovery_corrected);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Numeric policy of the calculators
    pub calculation: CalculationPolicy,

    /// What the caller asks for
    pub output: OutputRequest,
}
