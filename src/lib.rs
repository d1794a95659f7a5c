//! # Quantifyer - Internal-Standard Quantitation for Mass Spectrometry
//!
//! `quantifyer` turns the tabular exports of a targeted mass-spectrometry run
//! into the numbers a lab reports: recoveries of spiked analytes, QC
//! correction factors, internal-standard response factors and final
//! concentrations per sample.
//!
//! ## Key Features
//!
//! - **Cross-table validation**: every inconsistency between the five input
//!   tables is reported at once, with a stable rule id per finding.
//!
//! - **Strategy selection**: which calculations run is decided once, from
//!   the inputs actually supplied, by a pure function.
//!
//! - **No fabricated values**: rows that cannot be computed are kept out of
//!   the results and listed with a reason code instead of becoming zero,
//!   NaN or infinity.
//!
//! - **Internal-standard normalization**: peak areas are converted to amounts
//!   through the mapped internal standard before any arithmetic.
//!
//! ## Quick Start
//!
//! ```rust
//! use quantifyer::dataset::{
//!     CompoundRecord, DatasetBundle, Measurement, QcReference, SampleRecord, SampleType,
//!     StandardAmount,
//! };
//! use quantifyer::pipeline::{Pipeline, PipelineConfig, Strategy};
//!
//! let bundle = DatasetBundle::builder()
//!     .measurements(vec![
//!         Measurement::new("qc_1", "pfoa").with_peak_area(500.0),
//!         Measurement::new("qc_1", "is_pfoa").with_peak_area(100.0),
//!         Measurement::new("s1", "pfoa").with_peak_area(200.0),
//!         Measurement::new("s1", "is_pfoa").with_peak_area(100.0),
//!     ])
//!     .compounds(vec![CompoundRecord::new("pfoa", "is_pfoa")])
//!     .samples(vec![
//!         SampleRecord::new("qc_1", SampleType::Qc).with_property("volume", 1.0),
//!         SampleRecord::new("s1", SampleType::Unknown).with_property("volume", 1.0),
//!     ])
//!     .qc_references(vec![QcReference::new("pfoa", 75.0)])
//!     .standard_amounts(vec![StandardAmount::nominal("is_pfoa", 10.0)])
//!     .build()?;
//!
//! let results = Pipeline::new(PipelineConfig::default()).execute(&bundle)?;
//! assert_eq!(results.strategy, Strategy::PartialNoRecovery);
//!
//! // 200 / 100 × 10 × (75 / 50) / 1.0
//! let concentration = results.concentrations.as_ref().unwrap().value_for("s1", "pfoa").unwrap();
//! assert!((concentration.value - 30.0).abs() < 1e-9);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`dataset`]: typed records and the immutable [`DatasetBundle`](dataset::DatasetBundle)
//! - [`schema`]: column layout of the CSV tables and identifier normalization
//! - [`ingest`]: CSV readers for the five tables
//! - [`validator`]: cross-table integrity rules and the validation report
//! - [`calculator`]: correction factor, recovery, response factor and concentration
//! - [`pipeline`]: strategy selection and ordered execution
//! - [`plot`]: plot-ready aggregation of results
//!
//! ## Strategies
//!
//! | Inputs | Strategy | Computes |
//! |--------|----------|----------|
//! | IS concentrations + spike samples | Full | correction factor, recovery, recovery-corrected concentration |
//! | IS concentrations, no spike samples | PartialNoRecovery | correction factor, concentration |
//! | QC table + spike samples, no IS concentrations | Minimal | recovery |
//! | neither QC table nor IS concentrations | Invalid | nothing, a configuration error |

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod calculator;
pub mod dataset;
pub mod ingest;
pub mod pipeline;
pub mod plot;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod testing;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::calculator::{
        CalculationPolicy, ConcentrationResult, CorrectionFactor, CorrectionFactorResult,
        GapReason, RecoveryResult, ReplicateAverage, ResponseFactorResult,
    };
    pub use crate::dataset::{
        CompoundRecord, DatasetBundle, DatasetError, Measurement, MeasurementKey, QcReference,
        SampleRecord, SampleType, StandardAmount,
    };
    pub use crate::ingest::{DatasetFiles, IngestError};
    pub use crate::pipeline::{
        OutputRequest, Pipeline, PipelineConfig, PipelineError, PipelineResults, Strategy,
    };
    pub use crate::plot::{aggregate, AggregationView, Grouping, Metric, PlotError};
    pub use crate::validator::{validate, RuleId, Severity, ValidationReport};
}
