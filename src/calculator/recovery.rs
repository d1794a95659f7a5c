use log::debug;

use crate::dataset::{DatasetBundle, MeasurementKey, SampleRecord, SampleType};

use super::measure::measured_amount;
use super::{GapReason, Recovery, RecoveryResult};

/// Sample property that overrides a compound's spike amount for one sample
pub const SPIKE_AMOUNT_PROPERTY: &str = "spike_amount";

/// Recovery of every spiked compound in every spike sample.
///
/// `recovery = (spiked − native) / spike_amount × 100`, with both amounts
/// internal-standard normalized before the subtraction. Only (sample, compound)
/// pairs present in the quantitation export are considered.
pub fn calculate_recovery(dataset: &DatasetBundle) -> RecoveryResult {
    let mut result = RecoveryResult::default();

    for spike in dataset.samples_of_type(&SampleType::Spike) {
        for compound in dataset.compounds().iter().filter(|c| c.is_spiked) {
            if dataset
                .measurement(&spike.sample_id, &compound.compound_name)
                .is_none()
            {
                continue;
            }
            let key = MeasurementKey::new(&spike.sample_id, &compound.compound_name);
            match recovery_of(dataset, spike, &compound.compound_name, compound.spike_amount) {
                Ok(recovery) => result.insert(key, recovery),
                Err(reason) => {
                    debug!("Recovery for {} excluded: {}", key, reason);
                    result.exclude(key, reason);
                }
            }
        }
    }

    result
}

fn recovery_of(
    dataset: &DatasetBundle,
    spike: &SampleRecord,
    compound_name: &str,
    compound_spike_amount: Option<f64>,
) -> Result<Recovery, GapReason> {
    let spiked = measured_amount(dataset, &spike.sample_id, compound_name)?;

    let native_id = spike
        .native_sample_id
        .as_deref()
        .ok_or(GapReason::MissingNative)?;
    let native = measured_amount(dataset, native_id, compound_name).map_err(|reason| match reason {
        GapReason::MissingMeasurement => GapReason::MissingNative,
        other => other,
    })?;

    let spike_amount = spike
        .property(SPIKE_AMOUNT_PROPERTY)
        .or(compound_spike_amount)
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or(GapReason::UndefinedSpikeAmount)?;

    Ok(Recovery {
        percent: (spiked.value - native.value) / spike_amount * 100.0,
        spiked_measured: spiked.value,
        native_measured: native.value,
        spike_amount,
        basis: spiked.basis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::MeasurementBasis;
    use crate::dataset::{CompoundRecord, Measurement, SampleRecord};
    use crate::testing::{assert_close, reference_builder, reference_bundle};

    #[test]
    fn test_recovery_from_spiked_and_native() {
        let result = calculate_recovery(&reference_bundle());

        assert_eq!(result.len(), 1);
        let recovery = result.value_for("spike_1", "pfoa").unwrap();
        assert_close(recovery.spiked_measured, 80.0);
        assert_close(recovery.native_measured, 20.0);
        assert_close(recovery.percent, 120.0);
        assert_eq!(recovery.basis, MeasurementBasis::InternalStandard);

        // pfos is not spiked
        assert!(result.value_for("spike_1", "pfos").is_none());
        assert!(result.gaps().is_empty());
    }

    #[test]
    fn test_missing_native_row() {
        let measurements: Vec<Measurement> = reference_bundle()
            .measurements()
            .iter()
            .filter(|m| !(m.sample_id == "native_1" && m.compound_name == "pfoa"))
            .cloned()
            .collect();
        let bundle = reference_builder()
            .measurements(measurements)
            .build()
            .unwrap();

        let result = calculate_recovery(&bundle);
        assert!(result.value_for("spike_1", "pfoa").is_none());
        assert_eq!(result.gap_for("spike_1", "pfoa"), Some(GapReason::MissingNative));
        assert_eq!(result.coverage().excluded, 1);
    }

    #[test]
    fn test_spike_without_native_link() {
        let mut samples = reference_bundle().samples().to_vec();
        samples[2].native_sample_id = None;
        let bundle = reference_builder().samples(samples).build().unwrap();

        let result = calculate_recovery(&bundle);
        assert_eq!(result.gap_for("spike_1", "pfoa"), Some(GapReason::MissingNative));
    }

    #[test]
    fn test_sample_spike_amount_override() {
        let mut samples = reference_bundle().samples().to_vec();
        samples[2] = samples[2].clone().with_property(SPIKE_AMOUNT_PROPERTY, 60.0);
        let bundle = reference_builder().samples(samples).build().unwrap();

        let result = calculate_recovery(&bundle);
        assert_close(result.value_for("spike_1", "pfoa").unwrap().percent, 100.0);
    }

    #[test]
    fn test_zero_spike_amount() {
        let bundle = reference_builder()
            .compounds(vec![
                CompoundRecord::new("pfoa", "is_a").with_spike_amount(0.0),
                CompoundRecord::new("pfos", "is_a"),
            ])
            .build()
            .unwrap();

        let result = calculate_recovery(&bundle);
        assert_eq!(
            result.gap_for("spike_1", "pfoa"),
            Some(GapReason::UndefinedSpikeAmount)
        );
    }

    #[test]
    fn test_reported_basis() {
        let bundle = crate::dataset::DatasetBundle::builder()
            .measurements(vec![
                Measurement::new("spk", "pfoa").with_reported_concentration(80.0),
                Measurement::new("nat", "pfoa").with_reported_concentration(20.0),
            ])
            .compounds(vec![CompoundRecord::new("pfoa", "is_a").with_spike_amount(50.0)])
            .samples(vec![
                SampleRecord::new("spk", SampleType::Spike).with_native_sample("nat"),
                SampleRecord::new("nat", SampleType::Unknown),
            ])
            .build()
            .unwrap();

        let recovery = calculate_recovery(&bundle);
        let row = recovery.value_for("spk", "pfoa").unwrap();
        assert_close(row.percent, 120.0);
        assert_eq!(row.basis, MeasurementBasis::Reported);
    }
}
