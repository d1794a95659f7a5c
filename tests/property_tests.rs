//! Property-based tests for the calculators and the pipeline

use proptest::prelude::*;
use quantifyer::calculator::{
    calculate_correction_factor, calculate_recovery, CalculationPolicy, CorrectionFactor,
};
use quantifyer::dataset::{
    CompoundRecord, DatasetBundle, Measurement, MeasurementKey, QcReference, SampleRecord,
    SampleType, StandardAmount,
};
use quantifyer::pipeline::Pipeline;

const IS_AMOUNT: f64 = 10.0;
const IS_AREA: f64 = 100.0;

fn area(sample: &str, compound: &str, value: f64) -> Measurement {
    Measurement::new(sample, compound).with_peak_area(value)
}

/// QC replicates, one spike/native pair and unknown samples of one analyte.
/// Every sample has an IS area of 100 and volume 1.
fn bundle(
    qc_areas: &[f64],
    spike_area: f64,
    native_area: f64,
    unknown_areas: &[f64],
    expected: f64,
    spike_amount: f64,
) -> DatasetBundle {
    let mut measurements = Vec::new();
    let mut samples = Vec::new();
    let mut add = |id: String, sample_type: SampleType, value: f64| {
        measurements.push(area(&id, "pfoa", value));
        measurements.push(area(&id, "is_a", IS_AREA));
        samples.push(SampleRecord::new(id, sample_type).with_property("volume", 1.0));
    };

    for (i, value) in qc_areas.iter().enumerate() {
        add(format!("qc_{}", i + 1), SampleType::Qc, *value);
    }
    add("native_1".to_string(), SampleType::Unknown, native_area);
    for (i, value) in unknown_areas.iter().enumerate() {
        add(format!("sample_{}", i + 1), SampleType::Unknown, *value);
    }
    add("spike_1".to_string(), SampleType::Spike, spike_area);
    if let Some(spike) = samples.last_mut() {
        spike.native_sample_id = Some("native_1".to_string());
    }

    DatasetBundle::builder()
        .measurements(measurements)
        .compounds(vec![
            CompoundRecord::new("pfoa", "is_a").with_spike_amount(spike_amount)
        ])
        .samples(samples)
        .qc_references(vec![QcReference::new("pfoa", expected)])
        .standard_amounts(vec![StandardAmount::nominal("is_a", IS_AMOUNT)])
        .build()
        .unwrap()
}

fn measured_keys(dataset: &DatasetBundle) -> Vec<MeasurementKey> {
    dataset.measurements().iter().map(|m| m.key()).collect()
}

proptest! {
    #[test]
    fn test_correction_factor_is_expected_over_mean(
        qc_areas in prop::collection::vec(1.0f64..10_000.0, 1..6),
        expected in 0.1f64..1_000.0,
    ) {
        let dataset = bundle(&qc_areas, 500.0, 100.0, &[200.0], expected, 50.0);
        let result = calculate_correction_factor(&dataset, &CalculationPolicy::default());

        let mean = qc_areas.iter().map(|a| a / IS_AREA * IS_AMOUNT).sum::<f64>()
            / qc_areas.len() as f64;
        match result.get("pfoa") {
            Some(CorrectionFactor::Measured { value, replicates, .. }) => {
                prop_assert_eq!(*replicates, qc_areas.len());
                prop_assert!((value - expected / mean).abs() <= 1e-9 * (expected / mean).abs().max(1.0));
            }
            other => prop_assert!(false, "unexpected factor: {:?}", other),
        }
    }

    #[test]
    fn test_recovery_formula(
        spike_area in 0.0f64..10_000.0,
        native_area in 0.0f64..10_000.0,
        spike_amount in 0.1f64..1_000.0,
    ) {
        let dataset = bundle(&[400.0], spike_area, native_area, &[], 75.0, spike_amount);
        let result = calculate_recovery(&dataset);

        let recovery = result.value_for("spike_1", "pfoa");
        prop_assert!(recovery.is_some());
        let expected = (spike_area - native_area) / IS_AREA * IS_AMOUNT / spike_amount * 100.0;
        let percent = recovery.map(|r| r.percent).unwrap_or(f64::NAN);
        prop_assert!((percent - expected).abs() <= 1e-9 * expected.abs().max(1.0));
    }

    #[test]
    fn test_results_only_cover_measured_keys(
        qc_areas in prop::collection::vec(0.0f64..1_000.0, 1..4),
        unknown_areas in prop::collection::vec(0.0f64..1_000.0, 0..8),
        native_area in 0.0f64..1_000.0,
    ) {
        let dataset = bundle(&qc_areas, 600.0, native_area, &unknown_areas, 75.0, 50.0);
        let results = Pipeline::default().execute(&dataset).unwrap();
        let measured = measured_keys(&dataset);

        let recovery = results.recovery.as_ref().unwrap();
        let concentrations = results.concentrations.as_ref().unwrap();
        for key in recovery.keys().chain(concentrations.keys()) {
            prop_assert!(measured.contains(key), "fabricated row {}", key);
        }
        for value in concentrations.iter().map(|(_, c)| c.value) {
            prop_assert!(value.is_finite());
        }
        for value in recovery.iter().map(|(_, r)| r.percent) {
            prop_assert!(value.is_finite());
        }
    }

    #[test]
    fn test_execute_is_idempotent(
        qc_areas in prop::collection::vec(1.0f64..1_000.0, 1..4),
        unknown_areas in prop::collection::vec(0.0f64..1_000.0, 0..6),
    ) {
        let dataset = bundle(&qc_areas, 700.0, 100.0, &unknown_areas, 75.0, 50.0);
        let pipeline = Pipeline::default();

        let first = serde_json::to_string(&pipeline.execute(&dataset).unwrap()).unwrap();
        let second = serde_json::to_string(&pipeline.execute(&dataset).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }
}
