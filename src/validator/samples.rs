use std::collections::HashSet;

use crate::dataset::{tables, DatasetBundle, SampleType};

use super::{RuleId, ValidationReport};

/// Step 5: sample roles are recognized and consistent with the measurements
pub(crate) fn check_samples(dataset: &DatasetBundle, report: &mut ValidationReport) {
    let unrecognized: Vec<String> = dataset
        .samples()
        .iter()
        .filter(|s| !s.sample_type.is_recognized())
        .map(|s| format!("{} ({})", s.sample_id, s.sample_type))
        .collect();
    report.checked(RuleId::UnknownSampleType);
    if !unrecognized.is_empty() {
        report.flag(
            RuleId::UnknownSampleType,
            unrecognized.clone(),
            format!(
                "Unrecognized sample type(s) in {}: {}",
                tables::SAMPLE_PROPERTIES,
                unrecognized.join(", ")
            ),
        );
    }

    let measured: HashSet<&str> = dataset.measured_sample_ids().into_iter().collect();
    let unmeasured: Vec<String> = dataset
        .samples_of_type(&SampleType::Qc)
        .filter(|s| !measured.contains(s.sample_id.as_str()))
        .map(|s| s.sample_id.clone())
        .collect();
    report.checked(RuleId::QcSampleWithoutMeasurements);
    if !unmeasured.is_empty() {
        report.flag(
            RuleId::QcSampleWithoutMeasurements,
            unmeasured.clone(),
            format!(
                "QC sample(s) absent from {}: {}",
                tables::MEASUREMENTS,
                unmeasured.join(", ")
            ),
        );
    }

    report.checked(RuleId::MissingNativeSample);
    for spike in dataset.samples_of_type(&SampleType::Spike) {
        match &spike.native_sample_id {
            None => report.flag(
                RuleId::MissingNativeSample,
                vec![spike.sample_id.clone()],
                format!("Spike sample {} names no native sample", spike.sample_id),
            ),
            Some(native) if dataset.sample(native).is_none() => report.flag(
                RuleId::MissingNativeSample,
                vec![spike.sample_id.clone(), native.clone()],
                format!(
                    "Native sample {} of spike sample {} is not in {}",
                    native,
                    spike.sample_id,
                    tables::SAMPLE_PROPERTIES
                ),
            ),
            Some(_) => {}
        }
    }
}
