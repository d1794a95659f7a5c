//! # Dataset Validation
//!
//! Cross-table integrity checks run before any calculation. Every rule is
//! evaluated and every violation is recorded, so one run of the validator
//! tells the user everything that needs fixing.
//!
//! ## Validation Checklist
//!
//! 1. **Uniqueness**: measurement, sample, mapping, standard amount and QC keys
//! 2. **References**: analyte → internal standard → amount, measured sample → sample properties
//! 3. **Numeric sanity**: no negative or infinite values; NaN flagged per row
//! 4. **Policies**: spike amounts present, QC limits ordered
//! 5. **Samples**: recognized sample types, measured QC samples, native counterparts
//!
//! Findings carry a [`Severity`]. Any [`Severity::Error`] aborts the pipeline;
//! warnings are reported alongside the results.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quantifyer::validator::validate;
//! # fn bundle() -> quantifyer::dataset::DatasetBundle { unimplemented!() }
//!
//! let report = validate(&bundle());
//! if report.has_errors() {
//!     eprintln!("{}", report);
//! }
//! ```

use log::debug;

use crate::dataset::DatasetBundle;

pub use report::{RuleId, Severity, ValidationIssue, ValidationReport};

mod keys;
mod report;
mod samples;
mod values;


/// Run every rule against the dataset
pub fn validate(dataset: &DatasetBundle) -> ValidationReport {
    validate_labeled(dataset, "dataset")
}

/// Run every rule against the dataset, labeling the report
pub fn validate_labeled(dataset: &DatasetBundle, label: impl Into<String>) -> ValidationReport {
    let mut report = ValidationReport::new(label);

    keys::check_uniqueness(dataset, &mut report);
    keys::check_references(dataset, &mut report);
    values::check_numeric_values(dataset, &mut report);
    values::check_policies(dataset, &mut report);
    samples::check_samples(dataset, &mut report);

    debug!(
        "Validated {}: {} rules, {} errors, {} warnings",
        report.dataset,
        report.rules_checked.len(),
        report.error_count(),
        report.warning_count()
    );

    report
}
