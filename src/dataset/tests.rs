use super::*;

fn minimal_builder() -> DatasetBundleBuilder {
    DatasetBundle::builder()
        .measurements(vec![
            Measurement::new("s1", "pfoa").with_peak_area(200.0),
            Measurement::new("s1", "is_pfoa").with_peak_area(100.0),
            Measurement::new("s1", "rs").with_peak_area(50.0),
        ])
        .compounds(vec![CompoundRecord::new("pfoa", "is_pfoa").with_external_standard("rs")])
        .samples(vec![
            SampleRecord::new("s1", SampleType::Unknown).with_property("volume", 0.5),
        ])
}

#[test]
fn test_build_minimal_bundle() {
    let bundle = minimal_builder().build().unwrap();

    assert!(!bundle.has_qc_table());
    assert!(!bundle.has_standard_amounts());
    assert!(!bundle.has_spike_samples());
    assert_eq!(bundle.measurements().len(), 3);
    assert_eq!(
        bundle.measurement("s1", "pfoa").and_then(|m| m.peak_area),
        Some(200.0)
    );
    assert!(bundle.measurement("s2", "pfoa").is_none());
}

#[test]
fn test_missing_required_table() {
    let err = DatasetBundle::builder()
        .measurements(vec![Measurement::new("s1", "pfoa")])
        .compounds(vec![CompoundRecord::new("pfoa", "is_pfoa")])
        .build()
        .unwrap_err();

    assert!(matches!(err, DatasetError::MissingTable(tables::SAMPLE_PROPERTIES)));
}

#[test]
fn test_empty_required_table() {
    let err = minimal_builder().compounds(Vec::new()).build().unwrap_err();
    assert!(matches!(err, DatasetError::EmptyTable(tables::CORRESPONDENCE)));
}

#[test]
fn test_empty_join_key_is_schema_error() {
    let err = minimal_builder()
        .measurements(vec![Measurement::new("", "pfoa")])
        .build()
        .unwrap_err();

    match err {
        DatasetError::EmptyKey { table, row, column } => {
            assert_eq!(table, tables::MEASUREMENTS);
            assert_eq!(row, 0);
            assert_eq!(column, "sample_id");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_standards_and_analytes() {
    let bundle = minimal_builder().build().unwrap();

    assert!(bundle.is_standard("is_pfoa"));
    assert!(bundle.is_standard("rs"));
    assert!(!bundle.is_standard("pfoa"));
    assert_eq!(bundle.compound_names(), vec!["pfoa", "is_pfoa", "rs"]);
    assert_eq!(bundle.analyte_names(), vec!["pfoa"]);
    assert_eq!(bundle.measured_sample_ids(), vec!["s1"]);
}

#[test]
fn test_standard_amount_override() {
    let bundle = minimal_builder()
        .samples(vec![
            SampleRecord::new("s1", SampleType::Unknown),
            SampleRecord::new("s2", SampleType::Unknown),
        ])
        .standard_amounts(vec![
            StandardAmount::nominal("is_pfoa", 10.0),
            StandardAmount::for_sample("is_pfoa", "s2", 12.5),
        ])
        .build()
        .unwrap();

    assert_eq!(bundle.standard_amount("is_pfoa", "s1"), Some(10.0));
    assert_eq!(bundle.standard_amount("is_pfoa", "s2"), Some(12.5));
    assert_eq!(bundle.standard_amount("rs", "s1"), None);
}

#[test]
fn test_duplicate_keys_index_first_occurrence() {
    let bundle = minimal_builder()
        .measurements(vec![
            Measurement::new("s1", "pfoa").with_peak_area(1.0),
            Measurement::new("s1", "pfoa").with_peak_area(2.0),
        ])
        .build()
        .unwrap();

    assert_eq!(bundle.measurements().len(), 2);
    assert_eq!(
        bundle.measurement("s1", "pfoa").and_then(|m| m.peak_area),
        Some(1.0)
    );
}

#[test]
fn test_sample_type_tags() {
    assert_eq!(SampleType::from_tag("Sample"), SampleType::Unknown);
    assert_eq!(SampleType::from_tag("QC"), SampleType::Qc);
    assert_eq!(SampleType::from_tag("isrs"), SampleType::InternalStandardCheck);
    assert_eq!(SampleType::from_tag("spiked"), SampleType::Spike);

    let odd = SampleType::from_tag("calibrant");
    assert!(!odd.is_recognized());
    assert_eq!(odd.as_str(), "calibrant");
}

#[test]
fn test_qc_limits() {
    let open = QcReference::new("pfoa", 100.0);
    assert_eq!(open.accepts(5.0), None);

    let bounded = QcReference::new("pfoa", 100.0).with_limits(80.0, 120.0);
    assert_eq!(bounded.accepts(100.0), Some(true));
    assert_eq!(bounded.accepts(79.9), Some(false));
    assert_eq!(bounded.accepts(120.1), Some(false));
}
