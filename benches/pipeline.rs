use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use quantifyer::dataset::{
    CompoundRecord, DatasetBundle, Measurement, QcReference, SampleRecord, SampleType,
    StandardAmount,
};
use quantifyer::ingest::read_measurements;
use quantifyer::pipeline::Pipeline;
use quantifyer::validator::validate;

const SAMPLE_COUNTS: [usize; 3] = [10, 100, 500];
const COMPOUNDS: usize = 40;

/// Synthetic run: `num_samples` unknowns, 3 QC replicates, one spike pair,
/// `num_compounds` analytes sharing one internal standard
fn generate_bundle(num_samples: usize, num_compounds: usize) -> DatasetBundle {
    let mut ids: Vec<(String, SampleType)> = vec![
        ("qc_1".into(), SampleType::Qc),
        ("qc_2".into(), SampleType::Qc),
        ("qc_3".into(), SampleType::Qc),
        ("blank_1".into(), SampleType::Blank),
        ("spike_1".into(), SampleType::Spike),
    ];
    ids.extend((0..num_samples).map(|i| (format!("sample_{}", i), SampleType::Unknown)));

    let mut measurements = Vec::with_capacity(ids.len() * (num_compounds + 1));
    for (s, (id, _)) in ids.iter().enumerate() {
        measurements.push(Measurement::new(id, "is_a").with_peak_area(1000.0 + s as f64));
        for c in 0..num_compounds {
            let area = 100.0 + ((s * 31 + c * 17) % 400) as f64;
            measurements.push(Measurement::new(id, format!("analyte_{}", c)).with_peak_area(area));
        }
    }

    let samples = ids
        .into_iter()
        .map(|(id, sample_type)| {
            let sample = SampleRecord::new(id, sample_type.clone()).with_property("volume", 0.5);
            if sample_type == SampleType::Spike {
                sample.with_native_sample("sample_0")
            } else {
                sample
            }
        })
        .collect();

    DatasetBundle::builder()
        .measurements(measurements)
        .compounds(
            (0..num_compounds)
                .map(|c| CompoundRecord::new(format!("analyte_{}", c), "is_a").with_spike_amount(50.0))
                .collect(),
        )
        .samples(samples)
        .qc_references(
            (0..num_compounds)
                .map(|c| QcReference::new(format!("analyte_{}", c), 75.0))
                .collect(),
        )
        .standard_amounts(vec![StandardAmount::nominal("is_a", 10.0)])
        .build()
        .unwrap()
}

/// Wide quantitation export with `num_samples` sample columns
fn generate_quant_csv(num_samples: usize, num_compounds: usize) -> String {
    let mut csv = String::from("name,type");
    for s in 0..num_samples {
        csv.push_str(&format!(",sample_{}", s));
    }
    csv.push('\n');
    for c in 0..num_compounds {
        for kind in ["area", "concentration"] {
            csv.push_str(&format!("analyte_{},{}", c, kind));
            for s in 0..num_samples {
                csv.push_str(&format!(",{}", (s * 7 + c) % 1000));
            }
            csv.push('\n');
        }
    }
    csv
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let pipeline = Pipeline::default();

    for num_samples in SAMPLE_COUNTS {
        let dataset = generate_bundle(num_samples, COMPOUNDS);
        group.throughput(Throughput::Elements(dataset.measurements().len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_samples),
            &dataset,
            |b, dataset| {
                b.iter(|| pipeline.execute(dataset).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    for num_samples in SAMPLE_COUNTS {
        let dataset = generate_bundle(num_samples, COMPOUNDS);
        group.throughput(Throughput::Elements(dataset.measurements().len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_samples),
            &dataset,
            |b, dataset| {
                b.iter(|| validate(dataset));
            },
        );
    }

    group.finish();
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_quant");

    for num_samples in SAMPLE_COUNTS {
        let csv = generate_quant_csv(num_samples, COMPOUNDS);
        group.throughput(Throughput::Bytes(csv.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_samples), &csv, |b, csv| {
            b.iter(|| read_measurements(csv.as_bytes()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_validation, bench_ingest);
criterion_main!(benches);
