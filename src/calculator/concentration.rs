use std::collections::HashMap;

use log::debug;

use crate::dataset::{DatasetBundle, MeasurementKey, SampleType};

use super::measure::{blank_level, measured_amount, normalization};
use super::{
    CalculationPolicy, Concentration, ConcentrationResult, CorrectionFactorResult, GapReason,
    RecoveryAdjustment, RecoveryResult,
};

/// Final concentration of every analyte in every unknown sample.
///
/// `concentration = (measured − blank) × correction_factor / normalization`,
/// further divided by `recovery / 100` when a recovery table is supplied. The
/// recovery of a compound is the policy average over all spike samples.
pub fn calculate_concentration(
    dataset: &DatasetBundle,
    correction_factors: &CorrectionFactorResult,
    recovery: Option<&RecoveryResult>,
    policy: &CalculationPolicy,
) -> ConcentrationResult {
    let mut result = ConcentrationResult::default();
    let recoveries = recovery.map(|table| averaged_recoveries(table, policy));
    let analytes = dataset.analyte_names();
    let blanks: HashMap<&str, f64> = analytes
        .iter()
        .map(|compound| (*compound, blank_level(dataset, compound, policy)))
        .collect();

    for sample in dataset.samples_of_type(&SampleType::Unknown) {
        for compound in &analytes {
            if dataset.measurement(&sample.sample_id, compound).is_none() {
                continue;
            }
            let key = MeasurementKey::new(&sample.sample_id, *compound);

            let concentration = (|| {
                let factor = correction_factors
                    .get(*compound)
                    .ok_or(GapReason::UndefinedCorrectionFactor)?;
                let (cf, provenance) = factor
                    .value()
                    .filter(|v| v.is_finite())
                    .zip(factor.provenance())
                    .ok_or(GapReason::UndefinedCorrectionFactor)?;

                let amount = measured_amount(dataset, &sample.sample_id, compound)?;
                let divisor = normalization(dataset, &sample.sample_id, policy)?;

                let adjustment = match &recoveries {
                    None => RecoveryAdjustment::NotRequested,
                    Some(averages) => recovery_adjustment(dataset, averages, compound)?,
                };

                let corrected = amount.value - blanks.get(*compound).copied().unwrap_or(0.0);
                if corrected <= 0.0 {
                    return Err(GapReason::BelowBlank);
                }

                let mut value = corrected * cf / divisor;
                if let RecoveryAdjustment::Applied { percent } = adjustment {
                    value /= percent / 100.0;
                }

                Ok(Concentration {
                    value,
                    correction_factor: cf,
                    factor_provenance: provenance,
                    recovery: adjustment,
                })
            })();

            match concentration {
                Ok(row) => result.insert(key, row),
                Err(reason) => {
                    debug!("Concentration for {} excluded: {}", key, reason);
                    result.exclude(key, reason);
                }
            }
        }
    }

    result
}

fn averaged_recoveries<'a>(
    table: &'a RecoveryResult,
    policy: &CalculationPolicy,
) -> HashMap<&'a str, f64> {
    let mut by_compound: HashMap<&str, Vec<f64>> = HashMap::new();
    for (key, recovery) in table.iter() {
        by_compound
            .entry(key.compound_name.as_str())
            .or_default()
            .push(recovery.percent);
    }
    by_compound
        .into_iter()
        .filter_map(|(compound, values)| {
            policy
                .replicate_average
                .apply(&values)
                .map(|average| (compound, average))
        })
        .collect()
}

fn recovery_adjustment(
    dataset: &DatasetBundle,
    averages: &HashMap<&str, f64>,
    compound: &str,
) -> Result<RecoveryAdjustment, GapReason> {
    let spiked = dataset.compound(compound).is_some_and(|c| c.is_spiked);
    if !spiked {
        return Ok(RecoveryAdjustment::NotApplicable);
    }
    match averages.get(compound) {
        None => Err(GapReason::MissingRecovery),
        Some(percent) if *percent <= 0.0 => Err(GapReason::UndefinedRecovery),
        Some(percent) => Ok(RecoveryAdjustment::Applied { percent: *percent }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{calculate_correction_factor, calculate_recovery, FactorProvenance};
    use crate::dataset::Measurement;
    use crate::testing::{assert_close, reference_builder, reference_bundle};

    fn factors(dataset: &DatasetBundle) -> CorrectionFactorResult {
        calculate_correction_factor(dataset, &CalculationPolicy::default())
    }

    #[test]
    fn test_uncorrected_concentration() {
        let bundle = reference_bundle();
        let policy = CalculationPolicy::default();
        let result = calculate_concentration(&bundle, &factors(&bundle), None, &policy);

        // area ratio 2.0 × IS 10 × factor 1.5 / volume 1.0
        let pfoa = result.value_for("sample_1", "pfoa").unwrap();
        assert_close(pfoa.value, 30.0);
        assert_close(pfoa.correction_factor, 1.5);
        assert_eq!(pfoa.factor_provenance, FactorProvenance::Measured);
        assert_eq!(pfoa.recovery, RecoveryAdjustment::NotRequested);

        let pfos = result.value_for("sample_1", "pfos").unwrap();
        assert_close(pfos.value, 30.0);
        assert_eq!(pfos.factor_provenance, FactorProvenance::Default);

        // only unknown samples are quantified
        assert!(result.value_for("qc_1", "pfoa").is_none());
        assert!(result.value_for("spike_1", "pfoa").is_none());
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_recovery_corrected_concentration() {
        let bundle = reference_bundle();
        let policy = CalculationPolicy::default();
        let recovery = calculate_recovery(&bundle);
        let result = calculate_concentration(&bundle, &factors(&bundle), Some(&recovery), &policy);

        let pfoa = result.value_for("sample_1", "pfoa").unwrap();
        assert_close(pfoa.value, 25.0);
        assert_eq!(pfoa.recovery, RecoveryAdjustment::Applied { percent: 120.0 });

        let pfos = result.value_for("sample_1", "pfos").unwrap();
        assert_close(pfos.value, 30.0);
        assert_eq!(pfos.recovery, RecoveryAdjustment::NotApplicable);
    }

    #[test]
    fn test_missing_and_undefined_recovery() {
        let bundle = reference_bundle();
        let policy = CalculationPolicy::default();
        let empty = RecoveryResult::default();
        let result = calculate_concentration(&bundle, &factors(&bundle), Some(&empty), &policy);
        assert_eq!(
            result.gap_for("sample_1", "pfoa"),
            Some(GapReason::MissingRecovery)
        );
        assert!(result.value_for("sample_1", "pfos").is_some());

        let mut measurements = bundle.measurements().to_vec();
        // spike_1 pfoa equal to native_1 pfoa: 0 % recovery
        measurements[6].peak_area = Some(200.0);
        let flat = reference_builder()
            .measurements(measurements)
            .build()
            .unwrap();
        let recovery = calculate_recovery(&flat);
        let result = calculate_concentration(&flat, &factors(&flat), Some(&recovery), &policy);
        assert_eq!(
            result.gap_for("sample_1", "pfoa"),
            Some(GapReason::UndefinedRecovery)
        );
    }

    #[test]
    fn test_undefined_factor_propagates() {
        let mut measurements = reference_bundle().measurements().to_vec();
        measurements[0].peak_area = Some(0.0);
        measurements[3].peak_area = Some(0.0);
        let bundle = reference_builder()
            .measurements(measurements)
            .build()
            .unwrap();

        let result = calculate_concentration(
            &bundle,
            &factors(&bundle),
            None,
            &CalculationPolicy::default(),
        );
        assert_eq!(
            result.gap_for("sample_1", "pfoa"),
            Some(GapReason::UndefinedCorrectionFactor)
        );
        assert!(result.value_for("sample_1", "pfos").is_some());
    }

    #[test]
    fn test_blank_subtraction_and_below_blank() {
        let mut measurements = reference_bundle().measurements().to_vec();
        let mut samples = reference_bundle().samples().to_vec();
        samples.push(
            crate::dataset::SampleRecord::new("blank_1", SampleType::Blank)
                .with_property("volume", 1.0),
        );
        measurements.push(Measurement::new("blank_1", "pfoa").with_peak_area(100.0));
        measurements.push(Measurement::new("blank_1", "pfos").with_peak_area(500.0));
        measurements.push(Measurement::new("blank_1", "is_a").with_peak_area(100.0));
        let bundle = reference_builder()
            .measurements(measurements)
            .samples(samples)
            .build()
            .unwrap();

        let policy = CalculationPolicy::default();
        let result = calculate_concentration(&bundle, &factors(&bundle), None, &policy);

        // qc: (40 - 10, 60 - 10) → 40, factor 75 / 40; sample: (20 - 10) × 75 / 40
        assert_close(
            result.value_for("sample_1", "pfoa").unwrap().value,
            10.0 * 75.0 / 40.0,
        );
        assert_eq!(
            result.gap_for("sample_1", "pfos"),
            Some(GapReason::BelowBlank)
        );
    }

    #[test]
    fn test_missing_normalization() {
        let mut samples = reference_bundle().samples().to_vec();
        samples[4].properties.clear();
        let bundle = reference_builder().samples(samples).build().unwrap();

        let result = calculate_concentration(
            &bundle,
            &factors(&bundle),
            None,
            &CalculationPolicy::default(),
        );
        assert_eq!(
            result.gap_for("sample_1", "pfoa"),
            Some(GapReason::MissingNormalization)
        );
        assert!(result.value_for("native_1", "pfoa").is_some());
    }
}
