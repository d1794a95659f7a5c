//! # Calculators
//!
//! The four calculations of a quantitation run. Each one reads the immutable
//! [`DatasetBundle`](crate::dataset::DatasetBundle) and returns a new
//! [`ResultTable`]:
//!
//! | Calculator | Key | Depends on |
//! |------------|-----|------------|
//! | [`calculate_correction_factor`] | compound | QC table |
//! | [`calculate_recovery`] | (spike sample, compound) | spike samples |
//! | [`calculate_response_factor`] | (IS check sample, internal standard) | IS concentration table |
//! | [`calculate_concentration`] | (sample, compound) | correction factors, optionally recovery |
//!
//! Rows that cannot be computed are never filled with zeros or infinities.
//! They are recorded as [`RowGap`]s with a [`GapReason`] and counted in the
//! table's [`Coverage`].

mod concentration;
mod correction_factor;
mod measure;
mod policy;
mod recovery;
mod response_factor;
mod types;

pub use concentration::calculate_concentration;
pub use correction_factor::calculate_correction_factor;
pub use policy::{CalculationPolicy, ReplicateAverage};
pub use recovery::{calculate_recovery, SPIKE_AMOUNT_PROPERTY};
pub use response_factor::calculate_response_factor;
pub use types::{
    Concentration, ConcentrationResult, CorrectionFactor, CorrectionFactorResult, Coverage,
    FactorProvenance, GapReason, MeasurementBasis, Recovery, RecoveryAdjustment, RecoveryResult,
    ResponseFactor, ResponseFactorResult, ResultTable, RowGap,
};
