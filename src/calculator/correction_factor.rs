use log::{debug, warn};

use crate::dataset::{DatasetBundle, SampleType};

use super::measure::{blank_level, measured_amount, normalization};
use super::{CalculationPolicy, CorrectionFactor, CorrectionFactorResult};

/// Per-compound correction factor from the QC samples.
///
/// `factor = expected / measured`, where `measured` is the averaged QC
/// replicate concentration (blank-subtracted, divided by the sample's
/// normalization property). Compounds without a QC reference get the policy
/// default; a zero, negative or missing QC measurement, or a non-finite
/// expected concentration, is [`CorrectionFactor::Undefined`].
pub fn calculate_correction_factor(
    dataset: &DatasetBundle,
    policy: &CalculationPolicy,
) -> CorrectionFactorResult {
    let mut result = CorrectionFactorResult::default();

    for compound in dataset.analyte_names() {
        let Some(reference) = dataset.qc_reference(compound) else {
            result.insert(
                compound.to_string(),
                CorrectionFactor::Default {
                    value: policy.default_correction_factor,
                },
            );
            continue;
        };

        let blank = blank_level(dataset, compound, policy);
        let replicates: Vec<f64> = dataset
            .samples_of_type(&SampleType::Qc)
            .filter_map(|qc| {
                let amount = measured_amount(dataset, &qc.sample_id, compound)
                    .map_err(|reason| debug!("QC {}/{} skipped: {}", qc.sample_id, compound, reason))
                    .ok()?;
                let divisor = normalization(dataset, &qc.sample_id, policy)
                    .map_err(|reason| debug!("QC {}/{} skipped: {}", qc.sample_id, compound, reason))
                    .ok()?;
                Some((amount.value - blank) / divisor)
            })
            .collect();

        let expected = reference.expected_concentration;
        let factor = match policy.replicate_average.apply(&replicates) {
            Some(measured) if measured > 0.0 && expected.is_finite() => CorrectionFactor::Measured {
                value: expected / measured,
                measured_concentration: measured,
                replicates: replicates.len(),
                within_limits: reference.accepts(measured),
            },
            measured => {
                warn!(
                    "Correction factor for {} is undefined (expected {}, measured QC concentration: {:?})",
                    compound, expected, measured
                );
                CorrectionFactor::Undefined {
                    replicates: replicates.len(),
                }
            }
        };
        result.insert(compound.to_string(), factor);
    }

    result
}
