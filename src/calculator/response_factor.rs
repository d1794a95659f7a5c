use std::collections::BTreeSet;

use log::debug;

use crate::dataset::{DatasetBundle, MeasurementKey, SampleType};

use super::{GapReason, ResponseFactor, ResponseFactorResult};

/// Response factor of each internal standard relative to its reconstitution
/// standard, in every internal-standard check sample:
///
/// `RF = (IS area × RS amount) / RS area / IS amount`
pub fn calculate_response_factor(dataset: &DatasetBundle) -> ResponseFactorResult {
    let mut result = ResponseFactorResult::default();

    let pairs: BTreeSet<(&str, &str)> = dataset
        .compounds()
        .iter()
        .filter_map(|c| {
            c.external_standard_id
                .as_deref()
                .map(|rs| (c.internal_standard_id.as_str(), rs))
        })
        .collect();

    for sample in dataset.samples_of_type(&SampleType::InternalStandardCheck) {
        for &(internal, external) in &pairs {
            let Some(is_row) = dataset.measurement(&sample.sample_id, internal) else {
                continue;
            };
            let key = MeasurementKey::new(&sample.sample_id, internal);

            let factor = (|| {
                let is_area = is_row
                    .peak_area
                    .filter(|a| a.is_finite())
                    .ok_or(GapReason::MissingMeasurement)?;
                let rs_area = dataset
                    .measurement(&sample.sample_id, external)
                    .and_then(|m| m.peak_area)
                    .filter(|a| a.is_finite())
                    .ok_or(GapReason::MissingReferenceStandard)?;
                let rs_amount = dataset
                    .standard_amount(external, &sample.sample_id)
                    .filter(|a| a.is_finite())
                    .ok_or(GapReason::MissingReferenceStandard)?;
                let is_amount = dataset
                    .standard_amount(internal, &sample.sample_id)
                    .filter(|a| a.is_finite())
                    .ok_or(GapReason::MissingInternalStandard)?;
                if rs_area == 0.0 || is_amount == 0.0 {
                    return Err(GapReason::UndefinedResponseFactor);
                }
                Ok((is_area * rs_amount) / rs_area / is_amount)
            })();

            match factor {
                Ok(value) => result.insert(
                    key,
                    ResponseFactor {
                        value,
                        external_standard_id: external.to_string(),
                    },
                ),
                Err(reason) => {
                    debug!("Response factor for {} excluded: {}", key, reason);
                    result.exclude(key, reason);
                }
            }
        }
    }

    result
}
