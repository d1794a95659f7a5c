use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetBundle;

/// Which optional inputs a dataset carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetProfile {
    /// QC reference table supplied
    pub has_qc_table: bool,
    /// Internal-standard concentration table supplied
    pub has_standard_amounts: bool,
    /// At least one spike sample
    pub has_spike_samples: bool,
}

impl DatasetProfile {
    /// Profile of a bundle
    pub fn of(dataset: &DatasetBundle) -> Self {
        Self {
            has_qc_table: dataset.has_qc_table(),
            has_standard_amounts: dataset.has_standard_amounts(),
            has_spike_samples: dataset.has_spike_samples(),
        }
    }
}

/// What the caller asks the pipeline to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputRequest {
    /// Fail instead of falling back to recovery only when concentrations
    /// cannot be computed
    pub require_concentration: bool,
    /// Divide concentrations by the averaged recovery when spike samples exist
    pub recovery_corrected: bool,
}

impl Default for OutputRequest {
    fn default() -> Self {
        Self {
            require_concentration: false,
            recovery_corrected: true,
        }
    }
}

/// Input a strategy needs but the dataset lacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingInput {
    /// Neither the QC table nor the internal-standard concentration table
    QcAndStandardAmounts,
    /// Internal-standard concentration table, needed for concentrations
    StandardAmounts,
    /// Spike samples, the only thing computable without standard amounts
    SpikeSamples,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingInput::QcAndStandardAmounts => f.write_str(
                "neither a QC table nor an internal-standard concentration table was supplied",
            ),
            MissingInput::StandardAmounts => f.write_str(
                "concentrations were requested but no internal-standard concentration table was supplied",
            ),
            MissingInput::SpikeSamples => f.write_str(
                "no internal-standard concentration table and no spike samples: nothing is computable",
            ),
        }
    }
}

/// Calculation chain selected for a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "missing", rename_all = "snake_case")]
pub enum Strategy {
    /// Correction factor, recovery and recovery-corrected concentration
    Full,
    /// Correction factor and uncorrected concentration
    PartialNoRecovery,
    /// Recovery only
    Minimal,
    /// Nothing can run
    Invalid(MissingInput),
}

impl Strategy {
    /// Whether correction factors and concentrations are computed
    pub fn computes_concentration(&self) -> bool {
        matches!(self, Strategy::Full | Strategy::PartialNoRecovery)
    }

    /// Whether recovery is computed
    pub fn computes_recovery(&self) -> bool {
        matches!(self, Strategy::Full | Strategy::Minimal)
    }

    /// Whether recovery is injected into the concentration calculation
    pub fn corrects_recovery(&self) -> bool {
        matches!(self, Strategy::Full)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Full => f.write_str("full"),
            Strategy::PartialNoRecovery => f.write_str("partial_no_recovery"),
            Strategy::Minimal => f.write_str("minimal"),
            Strategy::Invalid(missing) => write!(f, "invalid ({})", missing),
        }
    }
}

/// Pick the calculation chain for a dataset profile
pub fn select_strategy(profile: &DatasetProfile, request: &OutputRequest) -> Strategy {
    if !profile.has_qc_table && !profile.has_standard_amounts {
        return Strategy::Invalid(MissingInput::QcAndStandardAmounts);
    }
    if !profile.has_standard_amounts {
        if request.require_concentration {
            return Strategy::Invalid(MissingInput::StandardAmounts);
        }
        if !profile.has_spike_samples {
            return Strategy::Invalid(MissingInput::SpikeSamples);
        }
        return Strategy::Minimal;
    }
    if profile.has_spike_samples && request.recovery_corrected {
        Strategy::Full
    } else {
        Strategy::PartialNoRecovery
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(qc: bool, amounts: bool, spikes: bool) -> DatasetProfile {
        DatasetProfile {
            has_qc_table: qc,
            has_standard_amounts: amounts,
            has_spike_samples: spikes,
        }
    }

    #[test]
    fn test_selection_table() {
        let request = OutputRequest::default();
        let cases = [
            (profile(false, false, true), Strategy::Invalid(MissingInput::QcAndStandardAmounts)),
            (profile(true, false, false), Strategy::Invalid(MissingInput::SpikeSamples)),
            (profile(true, false, true), Strategy::Minimal),
            (profile(false, true, false), Strategy::PartialNoRecovery),
            (profile(true, true, false), Strategy::PartialNoRecovery),
            (profile(true, true, true), Strategy::Full),
            (profile(false, true, true), Strategy::Full),
        ];
        for (profile, expected) in cases {
            assert_eq!(select_strategy(&profile, &request), expected, "{profile:?}");
        }
    }

    #[test]
    fn test_request_changes_selection() {
        let uncorrected = OutputRequest {
            recovery_corrected: false,
            ..OutputRequest::default()
        };
        assert_eq!(
            select_strategy(&profile(true, true, true), &uncorrected),
            Strategy::PartialNoRecovery
        );

        let strict = OutputRequest {
            require_concentration: true,
            ..OutputRequest::default()
        };
        assert_eq!(
            select_strategy(&profile(true, false, true), &strict),
            Strategy::Invalid(MissingInput::StandardAmounts)
        );
    }

    #[test]
    fn test_strategy_slots() {
        assert!(Strategy::Full.computes_recovery() && Strategy::Full.corrects_recovery());
        assert!(!Strategy::PartialNoRecovery.computes_recovery());
        assert!(Strategy::PartialNoRecovery.computes_concentration());
        assert!(!Strategy::Minimal.computes_concentration());
        assert_eq!(Strategy::PartialNoRecovery.to_string(), "partial_no_recovery");
    }
}
