use std::collections::{BTreeMap, HashSet};

use crate::dataset::{tables, DatasetBundle, MeasurementKey};

use super::{RuleId, ValidationReport};

/// Step 1: uniqueness of every table key
pub(crate) fn check_uniqueness(dataset: &DatasetBundle, report: &mut ValidationReport) {
    let duplicates = repeated(
        dataset
            .measurements()
            .iter()
            .map(|m| MeasurementKey::new(&m.sample_id, &m.compound_name).to_string()),
    );
    report.checked(RuleId::DuplicateMeasurement);
    if !duplicates.is_empty() {
        report.flag(
            RuleId::DuplicateMeasurement,
            duplicates.clone(),
            format!(
                "{} (sample, compound) pair(s) appear more than once in {}: {}",
                duplicates.len(),
                tables::MEASUREMENTS,
                duplicates.join(", ")
            ),
        );
    }

    let duplicates = repeated(dataset.samples().iter().map(|s| s.sample_id.clone()));
    report.checked(RuleId::DuplicateSample);
    if !duplicates.is_empty() {
        report.flag(
            RuleId::DuplicateSample,
            duplicates.clone(),
            format!(
                "Sample(s) listed more than once in {}: {}",
                tables::SAMPLE_PROPERTIES,
                duplicates.join(", ")
            ),
        );
    }

    let duplicates = repeated(dataset.compounds().iter().map(|c| c.compound_name.clone()));
    report.checked(RuleId::DuplicateMapping);
    if !duplicates.is_empty() {
        report.flag(
            RuleId::DuplicateMapping,
            duplicates.clone(),
            format!(
                "Compound(s) listed more than once in {}: {}",
                tables::CORRESPONDENCE,
                duplicates.join(", ")
            ),
        );
    }

    if let Some(amounts) = dataset.standard_amounts() {
        let duplicates = repeated(amounts.iter().map(|a| match &a.sample_id {
            Some(sample) => format!("{}@{}", a.standard_id, sample),
            None => a.standard_id.clone(),
        }));
        report.checked(RuleId::DuplicateIsConcentration);
        if !duplicates.is_empty() {
            report.flag(
                RuleId::DuplicateIsConcentration,
                duplicates.clone(),
                format!(
                    "Standard amount(s) given more than once in {}: {}",
                    tables::IS_CONCENTRATION,
                    duplicates.join(", ")
                ),
            );
        }
    }

    if let Some(references) = dataset.qc_references() {
        let duplicates = repeated(references.iter().map(|r| r.compound_name.clone()));
        report.checked(RuleId::DuplicateQcReference);
        if !duplicates.is_empty() {
            report.flag(
                RuleId::DuplicateQcReference,
                duplicates.clone(),
                format!(
                    "Compound(s) listed more than once in {}: {}",
                    tables::QC,
                    duplicates.join(", ")
                ),
            );
        }
    }
}

/// Step 2: every foreign key resolves
pub(crate) fn check_references(dataset: &DatasetBundle, report: &mut ValidationReport) {
    let unmapped: Vec<String> = dataset
        .compound_names()
        .into_iter()
        .filter(|name| !dataset.is_standard(name) && dataset.compound(name).is_none())
        .map(str::to_string)
        .collect();
    report.checked(RuleId::MissingMapping);
    if !unmapped.is_empty() {
        report.flag(
            RuleId::MissingMapping,
            unmapped.clone(),
            format!(
                "Compound(s) in {} without an internal-standard mapping: {}",
                tables::MEASUREMENTS,
                unmapped.join(", ")
            ),
        );
    }

    if let Some(amounts) = dataset.standard_amounts() {
        let supplied: HashSet<&str> = amounts.iter().map(|a| a.standard_id.as_str()).collect();
        let missing: Vec<String> = dataset
            .standard_ids()
            .iter()
            .filter(|id| !supplied.contains(id.as_str()))
            .cloned()
            .collect();
        report.checked(RuleId::MissingIsConcentration);
        if !missing.is_empty() {
            report.flag(
                RuleId::MissingIsConcentration,
                missing.clone(),
                format!(
                    "Standard(s) referenced in {} without an amount in {}: {}",
                    tables::CORRESPONDENCE,
                    tables::IS_CONCENTRATION,
                    missing.join(", ")
                ),
            );
        }
    }

    let unknown: Vec<String> = dataset
        .measured_sample_ids()
        .into_iter()
        .filter(|id| dataset.sample(id).is_none())
        .map(str::to_string)
        .collect();
    report.checked(RuleId::UnknownSample);
    if !unknown.is_empty() {
        report.flag(
            RuleId::UnknownSample,
            unknown.clone(),
            format!(
                "Sample(s) in {} missing from {}: {}",
                tables::MEASUREMENTS,
                tables::SAMPLE_PROPERTIES,
                unknown.join(", ")
            ),
        );
    }

    if let Some(references) = dataset.qc_references() {
        let measured: HashSet<&str> = dataset.compound_names().into_iter().collect();
        let unknown: Vec<String> = references
            .iter()
            .filter(|r| !measured.contains(r.compound_name.as_str()))
            .map(|r| r.compound_name.clone())
            .collect();
        report.checked(RuleId::UnknownQcCompound);
        if !unknown.is_empty() {
            report.flag(
                RuleId::UnknownQcCompound,
                unknown.clone(),
                format!(
                    "QC reference(s) for compounds never measured: {}",
                    unknown.join(", ")
                ),
            );
        }
    }
}

/// Values seen more than once, in first-seen order of their second occurrence
fn repeated(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut order = Vec::new();
    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(value);
        }
    }
    order
}
