#![no_main]

use libfuzzer_sys::fuzz_target;
use quantifyer::dataset::{CompoundRecord, DatasetBundle};
use quantifyer::ingest::{read_correspondence, read_measurements, read_samples};
use quantifyer::pipeline::Pipeline;

fuzz_target!(|data: &[u8]| {
    // Every reader must reject malformed tables with an error, never a panic
    let measurements = read_measurements(data);
    let _ = read_correspondence(data);
    let samples = read_samples(data);

    // A table that parses as both exports goes through validation and the calculators
    let (Ok(measurements), Ok(samples)) = (measurements, samples) else {
        return;
    };
    let compounds = measurements
        .iter()
        .map(|m| CompoundRecord::new(m.compound_name.clone(), "is"))
        .collect();
    if let Ok(dataset) = DatasetBundle::builder()
        .measurements(measurements)
        .compounds(compounds)
        .samples(samples)
        .build()
    {
        let _ = Pipeline::default().execute(&dataset);
    }
});
