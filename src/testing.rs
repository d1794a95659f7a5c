//! Shared in-memory fixture for unit tests.
//!
//! One internal standard `is_a` (10 units in every sample, area 100) and one
//! reconstitution standard `rs` (100 units). Two analytes: `pfoa`, spiked with
//! 50 units and QC-referenced at 75, and `pfos`, neither spiked nor referenced.
//!
//! | sample | type | pfoa area | pfos area |
//! |--------|------|-----------|-----------|
//! | qc_1, qc_2 | qc | 400, 600 | 100 |
//! | spike_1 | spike (native_1) | 800 | 100 |
//! | native_1 | unknown | 200 | 100 |
//! | sample_1 | unknown | 200 | 300 |
//! | isrs_1 | IS check | - | - |

use crate::dataset::{
    CompoundRecord, DatasetBundle, DatasetBundleBuilder, Measurement, QcReference, SampleRecord,
    SampleType, StandardAmount,
};

fn area(sample: &str, compound: &str, value: f64) -> Measurement {
    Measurement::new(sample, compound).with_peak_area(value)
}

pub(crate) fn reference_builder() -> DatasetBundleBuilder {
    let mut measurements = Vec::new();
    for (sample, pfoa, pfos) in [
        ("qc_1", 400.0, 100.0),
        ("qc_2", 600.0, 100.0),
        ("spike_1", 800.0, 100.0),
        ("native_1", 200.0, 100.0),
        ("sample_1", 200.0, 300.0),
    ] {
        measurements.push(area(sample, "pfoa", pfoa));
        measurements.push(area(sample, "pfos", pfos));
        measurements.push(area(sample, "is_a", 100.0));
    }
    measurements.push(area("isrs_1", "is_a", 100.0));
    measurements.push(area("isrs_1", "rs", 50.0));

    DatasetBundle::builder()
        .measurements(measurements)
        .compounds(vec![
            CompoundRecord::new("pfoa", "is_a")
                .with_external_standard("rs")
                .with_spike_amount(50.0),
            CompoundRecord::new("pfos", "is_a").with_external_standard("rs"),
        ])
        .samples(vec![
            SampleRecord::new("qc_1", SampleType::Qc).with_property("volume", 1.0),
            SampleRecord::new("qc_2", SampleType::Qc).with_property("volume", 1.0),
            SampleRecord::new("spike_1", SampleType::Spike)
                .with_property("volume", 1.0)
                .with_native_sample("native_1"),
            SampleRecord::new("native_1", SampleType::Unknown).with_property("volume", 1.0),
            SampleRecord::new("sample_1", SampleType::Unknown).with_property("volume", 1.0),
            SampleRecord::new("isrs_1", SampleType::InternalStandardCheck),
        ])
        .qc_references(vec![QcReference::new("pfoa", 75.0)])
        .standard_amounts(vec![
            StandardAmount::nominal("is_a", 10.0),
            StandardAmount::nominal("rs", 100.0),
        ])
}

pub(crate) fn reference_bundle() -> DatasetBundle {
    reference_builder()
        .build()
        .expect("reference fixture is well formed")
}

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
