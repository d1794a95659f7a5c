//! # Dataset Bundle
//!
//! Typed in-memory representation of the five tables of one quantitation run:
//!
//! | Table | Record | Required |
//! |-------|--------|----------|
//! | Quantitation export | [`Measurement`] | yes |
//! | Internal-standard correspondence | [`CompoundRecord`] | yes |
//! | Sample properties | [`SampleRecord`] | yes |
//! | QC reference | [`QcReference`] | no |
//! | Internal-standard concentration | [`StandardAmount`] | no |
//!
//! The bundle is assembled once with [`DatasetBundle::builder`] and never
//! mutated afterwards. Lookup indices are built at construction time so the
//! calculators can join tables by `(sample_id, compound_name)` or by compound
//! without scanning.
//!
//! Duplicate keys are kept as-is; the index points at the first occurrence and
//! the validator reports the duplicates.
//!
//! ```rust
//! use quantifyer::dataset::{CompoundRecord, DatasetBundle, Measurement, SampleRecord, SampleType};
//!
//! let bundle = DatasetBundle::builder()
//!     .measurements(vec![
//!         Measurement::new("s1", "pfoa").with_peak_area(200.0),
//!         Measurement::new("s1", "is_pfoa").with_peak_area(100.0),
//!     ])
//!     .compounds(vec![CompoundRecord::new("pfoa", "is_pfoa")])
//!     .samples(vec![SampleRecord::new("s1", SampleType::Unknown).with_property("volume", 1.0)])
//!     .build()?;
//!
//! assert!(bundle.is_standard("is_pfoa"));
//! assert_eq!(bundle.analyte_names(), vec!["pfoa"]);
//! # Ok::<(), quantifyer::dataset::DatasetError>(())
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};

mod error;
mod types;

#[cfg(test)]
mod tests;

pub use error::DatasetError;
pub use types::{
    CompoundRecord, Measurement, MeasurementKey, QcReference, SampleRecord, SampleType,
    StandardAmount,
};

/// Table names used in schema errors and validation messages
pub mod tables {
    /// Quantitation export
    pub const MEASUREMENTS: &str = "quant_file";
    /// Internal-standard correspondence
    pub const CORRESPONDENCE: &str = "is_correspondence_file";
    /// Sample properties
    pub const SAMPLE_PROPERTIES: &str = "sample_properties_file";
    /// QC reference
    pub const QC: &str = "qc_file";
    /// Internal-standard concentration
    pub const IS_CONCENTRATION: &str = "is_concentration_file";
}

/// Immutable bundle of the tables of one run
#[derive(Debug, Clone)]
pub struct DatasetBundle {
    measurements: Vec<Measurement>,
    compounds: Vec<CompoundRecord>,
    samples: Vec<SampleRecord>,
    qc_references: Option<Vec<QcReference>>,
    standard_amounts: Option<Vec<StandardAmount>>,

    measurement_index: HashMap<String, HashMap<String, usize>>,
    compound_index: HashMap<String, usize>,
    sample_index: HashMap<String, usize>,
    qc_index: HashMap<String, usize>,
    nominal_amounts: HashMap<String, f64>,
    sample_amounts: HashMap<(String, String), f64>,
    standards: BTreeSet<String>,
}

impl DatasetBundle {
    /// Start building a bundle
    pub fn builder() -> DatasetBundleBuilder {
        DatasetBundleBuilder::default()
    }

    /// All rows of the quantitation export, in input order
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// All rows of the correspondence table, in input order
    pub fn compounds(&self) -> &[CompoundRecord] {
        &self.compounds
    }

    /// All rows of the sample properties table, in input order
    pub fn samples(&self) -> &[SampleRecord] {
        &self.samples
    }

    /// QC reference rows, when the table was supplied
    pub fn qc_references(&self) -> Option<&[QcReference]> {
        self.qc_references.as_deref()
    }

    /// Standard amount rows, when the table was supplied
    pub fn standard_amounts(&self) -> Option<&[StandardAmount]> {
        self.standard_amounts.as_deref()
    }

    /// Whether a QC reference table was supplied
    pub fn has_qc_table(&self) -> bool {
        self.qc_references.is_some()
    }

    /// Whether an internal-standard concentration table was supplied
    pub fn has_standard_amounts(&self) -> bool {
        self.standard_amounts.is_some()
    }

    /// Whether any sample is tagged as a spike sample
    pub fn has_spike_samples(&self) -> bool {
        self.samples
            .iter()
            .any(|s| s.sample_type == SampleType::Spike)
    }

    /// Measurement of a compound in a sample
    pub fn measurement(&self, sample_id: &str, compound_name: &str) -> Option<&Measurement> {
        self.measurement_index
            .get(sample_id)
            .and_then(|by_compound| by_compound.get(compound_name))
            .map(|&idx| &self.measurements[idx])
    }

    /// Correspondence entry of an analyte
    pub fn compound(&self, compound_name: &str) -> Option<&CompoundRecord> {
        self.compound_index
            .get(compound_name)
            .map(|&idx| &self.compounds[idx])
    }

    /// Sample properties of a sample
    pub fn sample(&self, sample_id: &str) -> Option<&SampleRecord> {
        self.sample_index
            .get(sample_id)
            .map(|&idx| &self.samples[idx])
    }

    /// QC reference of a compound
    pub fn qc_reference(&self, compound_name: &str) -> Option<&QcReference> {
        self.qc_index
            .get(compound_name)
            .and_then(|&idx| self.qc_references.as_ref().map(|qc| &qc[idx]))
    }

    /// Amount of a standard in a sample: the per-sample override when present,
    /// otherwise the nominal amount
    pub fn standard_amount(&self, standard_id: &str, sample_id: &str) -> Option<f64> {
        self.sample_amounts
            .get(&(standard_id.to_string(), sample_id.to_string()))
            .or_else(|| self.nominal_amounts.get(standard_id))
            .copied()
    }

    /// Samples of the given type, in input order
    pub fn samples_of_type<'a>(
        &'a self,
        sample_type: &'a SampleType,
    ) -> impl Iterator<Item = &'a SampleRecord> + 'a {
        self.samples
            .iter()
            .filter(move |s| &s.sample_type == sample_type)
    }

    /// Whether a compound is an internal or external standard
    pub fn is_standard(&self, compound_name: &str) -> bool {
        self.standards.contains(compound_name)
    }

    /// Identifiers of every internal and external standard referenced by the
    /// correspondence table
    pub fn standard_ids(&self) -> &BTreeSet<String> {
        &self.standards
    }

    /// Distinct compound names of the quantitation export, in first-seen order
    pub fn compound_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.measurements
            .iter()
            .map(|m| m.compound_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Compounds of the quantitation export that are analytes (not standards)
    /// and have a correspondence entry
    pub fn analyte_names(&self) -> Vec<&str> {
        self.compound_names()
            .into_iter()
            .filter(|name| !self.is_standard(name) && self.compound_index.contains_key(*name))
            .collect()
    }

    /// Distinct sample ids of the quantitation export, in first-seen order
    pub fn measured_sample_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.measurements
            .iter()
            .map(|m| m.sample_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Builder for [`DatasetBundle`]
#[derive(Debug, Default)]
pub struct DatasetBundleBuilder {
    measurements: Option<Vec<Measurement>>,
    compounds: Option<Vec<CompoundRecord>>,
    samples: Option<Vec<SampleRecord>>,
    qc_references: Option<Vec<QcReference>>,
    standard_amounts: Option<Vec<StandardAmount>>,
}

impl DatasetBundleBuilder {
    /// Quantitation export rows
    pub fn measurements(mut self, measurements: Vec<Measurement>) -> Self {
        self.measurements = Some(measurements);
        self
    }

    /// Correspondence rows
    pub fn compounds(mut self, compounds: Vec<CompoundRecord>) -> Self {
        self.compounds = Some(compounds);
        self
    }

    /// Sample properties rows
    pub fn samples(mut self, samples: Vec<SampleRecord>) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Optional QC reference table
    pub fn qc_references(mut self, references: Vec<QcReference>) -> Self {
        self.qc_references = Some(references);
        self
    }

    /// Optional internal-standard concentration table
    pub fn standard_amounts(mut self, amounts: Vec<StandardAmount>) -> Self {
        self.standard_amounts = Some(amounts);
        self
    }

    /// Check the schema and build the lookup indices
    pub fn build(self) -> Result<DatasetBundle, DatasetError> {
        let measurements = required(self.measurements, tables::MEASUREMENTS)?;
        let compounds = required(self.compounds, tables::CORRESPONDENCE)?;
        let samples = required(self.samples, tables::SAMPLE_PROPERTIES)?;

        for (row, m) in measurements.iter().enumerate() {
            non_empty(&m.sample_id, tables::MEASUREMENTS, row, "sample_id")?;
            non_empty(&m.compound_name, tables::MEASUREMENTS, row, "compound_name")?;
        }
        for (row, c) in compounds.iter().enumerate() {
            non_empty(&c.compound_name, tables::CORRESPONDENCE, row, "native")?;
            non_empty(&c.internal_standard_id, tables::CORRESPONDENCE, row, "internal_standard")?;
        }
        for (row, s) in samples.iter().enumerate() {
            non_empty(&s.sample_id, tables::SAMPLE_PROPERTIES, row, "sample_name")?;
        }

        let mut measurement_index: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for (idx, m) in measurements.iter().enumerate() {
            measurement_index
                .entry(m.sample_id.clone())
                .or_default()
                .entry(m.compound_name.clone())
                .or_insert(idx);
        }

        let mut compound_index = HashMap::new();
        let mut standards = BTreeSet::new();
        for (idx, c) in compounds.iter().enumerate() {
            compound_index.entry(c.compound_name.clone()).or_insert(idx);
            standards.insert(c.internal_standard_id.clone());
            if let Some(external) = &c.external_standard_id {
                standards.insert(external.clone());
            }
        }

        let mut sample_index = HashMap::new();
        for (idx, s) in samples.iter().enumerate() {
            sample_index.entry(s.sample_id.clone()).or_insert(idx);
        }

        let mut qc_index = HashMap::new();
        if let Some(references) = &self.qc_references {
            for (idx, qc) in references.iter().enumerate() {
                qc_index.entry(qc.compound_name.clone()).or_insert(idx);
            }
        }

        let mut nominal_amounts = HashMap::new();
        let mut sample_amounts = HashMap::new();
        if let Some(amounts) = &self.standard_amounts {
            for row in amounts {
                match &row.sample_id {
                    Some(sample_id) => {
                        sample_amounts
                            .entry((row.standard_id.clone(), sample_id.clone()))
                            .or_insert(row.amount);
                    }
                    None => {
                        nominal_amounts
                            .entry(row.standard_id.clone())
                            .or_insert(row.amount);
                    }
                }
            }
        }

        Ok(DatasetBundle {
            measurements,
            compounds,
            samples,
            qc_references: self.qc_references,
            standard_amounts: self.standard_amounts,
            measurement_index,
            compound_index,
            sample_index,
            qc_index,
            nominal_amounts,
            sample_amounts,
            standards,
        })
    }
}

fn required<T>(table: Option<Vec<T>>, name: &'static str) -> Result<Vec<T>, DatasetError> {
    let rows = table.ok_or(DatasetError::MissingTable(name))?;
    if rows.is_empty() {
        return Err(DatasetError::EmptyTable(name));
    }
    Ok(rows)
}

fn non_empty(
    value: &str,
    table: &'static str,
    row: usize,
    column: &'static str,
) -> Result<(), DatasetError> {
    if value.trim().is_empty() {
        return Err(DatasetError::EmptyKey { table, row, column });
    }
    Ok(())
}
