//! Joins shared by every calculator: measured amounts, blank levels and
//! sample normalization.

use crate::dataset::{DatasetBundle, SampleType};

use super::{CalculationPolicy, GapReason, MeasurementBasis};

/// Amount of a compound measured in one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MeasuredAmount {
    pub value: f64,
    pub basis: MeasurementBasis,
}

/// Measured amount of `compound_name` in `sample_id`.
///
/// With an internal-standard concentration table this is
/// `area / IS area × IS amount`; without one it is the concentration reported
/// by the instrument software.
pub(crate) fn measured_amount(
    dataset: &DatasetBundle,
    sample_id: &str,
    compound_name: &str,
) -> Result<MeasuredAmount, GapReason> {
    let measurement = dataset
        .measurement(sample_id, compound_name)
        .ok_or(GapReason::MissingMeasurement)?;

    if !dataset.has_standard_amounts() {
        let value = finite(measurement.reported_concentration).ok_or(GapReason::MissingMeasurement)?;
        return Ok(MeasuredAmount {
            value,
            basis: MeasurementBasis::Reported,
        });
    }

    let compound = dataset
        .compound(compound_name)
        .ok_or(GapReason::MissingMapping)?;
    let area = finite(measurement.peak_area).ok_or(GapReason::MissingMeasurement)?;
    let is_area = dataset
        .measurement(sample_id, &compound.internal_standard_id)
        .and_then(|m| finite(m.peak_area))
        .ok_or(GapReason::MissingInternalStandard)?;
    if is_area == 0.0 {
        return Err(GapReason::ZeroInternalStandardArea);
    }
    let is_amount = dataset
        .standard_amount(&compound.internal_standard_id, sample_id)
        .filter(|a| a.is_finite())
        .ok_or(GapReason::MissingInternalStandard)?;

    Ok(MeasuredAmount {
        value: area / is_area * is_amount,
        basis: MeasurementBasis::InternalStandard,
    })
}

/// Averaged measured amount of a compound across blank samples.
///
/// Zero when blank subtraction is disabled or no blank yields a value.
pub(crate) fn blank_level(
    dataset: &DatasetBundle,
    compound_name: &str,
    policy: &CalculationPolicy,
) -> f64 {
    if !policy.blank_subtraction {
        return 0.0;
    }
    let blanks: Vec<f64> = dataset
        .samples_of_type(&SampleType::Blank)
        .filter_map(|blank| measured_amount(dataset, &blank.sample_id, compound_name).ok())
        .map(|amount| amount.value)
        .collect();
    policy.replicate_average.apply(&blanks).unwrap_or(0.0)
}

/// Normalization property of a sample; absent, zero or non-finite values are gaps
pub(crate) fn normalization(
    dataset: &DatasetBundle,
    sample_id: &str,
    policy: &CalculationPolicy,
) -> Result<f64, GapReason> {
    dataset
        .sample(sample_id)
        .and_then(|s| s.property(&policy.normalization_property))
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or(GapReason::MissingNormalization)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetBundle, Measurement, SampleRecord};
    use crate::testing::{assert_close, reference_builder, reference_bundle};

    #[test]
    fn test_internal_standard_basis() {
        let bundle = reference_bundle();
        let amount = measured_amount(&bundle, "spike_1", "pfoa").unwrap();

        assert_eq!(amount.basis, MeasurementBasis::InternalStandard);
        assert_close(amount.value, 80.0);
    }

    #[test]
    fn test_reported_basis_without_standard_amounts() {
        let reference = reference_bundle();
        let bundle = DatasetBundle::builder()
            .measurements(vec![
                Measurement::new("s1", "pfoa").with_reported_concentration(12.0),
                Measurement::new("s1", "pfos").with_peak_area(3.0),
            ])
            .compounds(reference.compounds().to_vec())
            .samples(vec![SampleRecord::new("s1", SampleType::Unknown)])
            .build()
            .unwrap();

        let amount = measured_amount(&bundle, "s1", "pfoa").unwrap();
        assert_eq!(amount.basis, MeasurementBasis::Reported);
        assert_close(amount.value, 12.0);
        assert_eq!(
            measured_amount(&bundle, "s1", "pfos"),
            Err(GapReason::MissingMeasurement)
        );
    }

    #[test]
    fn test_internal_standard_failures() {
        let mut measurements = reference_bundle().measurements().to_vec();
        // is_a in qc_1 and spike_1
        measurements[2].peak_area = Some(0.0);
        measurements[8].peak_area = None;
        let bundle = reference_builder()
            .measurements(measurements)
            .build()
            .unwrap();

        assert_eq!(
            measured_amount(&bundle, "qc_1", "pfoa"),
            Err(GapReason::ZeroInternalStandardArea)
        );
        assert_eq!(
            measured_amount(&bundle, "spike_1", "pfoa"),
            Err(GapReason::MissingInternalStandard)
        );
        assert_eq!(
            measured_amount(&bundle, "nowhere", "pfoa"),
            Err(GapReason::MissingMeasurement)
        );
    }

    #[test]
    fn test_blank_level() {
        let mut measurements = reference_bundle().measurements().to_vec();
        let mut samples = reference_bundle().samples().to_vec();
        for (blank, area) in [("blank_1", 10.0), ("blank_2", 30.0)] {
            samples.push(SampleRecord::new(blank, SampleType::Blank).with_property("volume", 1.0));
            measurements.push(Measurement::new(blank, "pfoa").with_peak_area(area));
            measurements.push(Measurement::new(blank, "is_a").with_peak_area(100.0));
        }
        let bundle = reference_builder()
            .measurements(measurements)
            .samples(samples)
            .build()
            .unwrap();

        let policy = CalculationPolicy::default();
        assert_close(blank_level(&bundle, "pfoa", &policy), 2.0);
        assert_close(blank_level(&bundle, "pfos", &policy), 0.0);

        let disabled = CalculationPolicy {
            blank_subtraction: false,
            ..CalculationPolicy::default()
        };
        assert_close(blank_level(&bundle, "pfoa", &disabled), 0.0);
    }

    #[test]
    fn test_normalization() {
        let bundle = reference_bundle();
        let policy = CalculationPolicy::default();

        assert_close(normalization(&bundle, "sample_1", &policy).unwrap(), 1.0);
        assert_eq!(
            normalization(&bundle, "isrs_1", &policy),
            Err(GapReason::MissingNormalization)
        );

        let by_mass = CalculationPolicy {
            normalization_property: "mass".to_string(),
            ..CalculationPolicy::default()
        };
        assert_eq!(
            normalization(&bundle, "sample_1", &by_mass),
            Err(GapReason::MissingNormalization)
        );
    }
}
