//! # CSV Ingestion
//!
//! Reads the five input tables of a run into a
//! [`DatasetBundle`](crate::dataset::DatasetBundle). The table layouts are
//! described in [`schema`](crate::schema).
//!
//! Headers and text cells go through
//! [`normalize_identifier`](crate::schema::normalize_identifier), so
//! `PFOA`, `pfoa` and ` Pfoa ` name the same compound. Empty measurement and
//! property cells become `None`; an empty QC concentration or standard amount
//! is kept as NaN so validation reports it. Cells that do not parse as
//! numbers, and blank key cells of a non-empty row, are errors.
//!
//! ```rust,no_run
//! use quantifyer::ingest::DatasetFiles;
//!
//! let files = DatasetFiles::new("quant.csv", "is_correspondence.csv", "samples.csv")
//!     .with_qc_file("qc.csv")
//!     .with_is_concentration_file("is_concentration.csv");
//! let bundle = files.load()?;
//! # Ok::<(), quantifyer::ingest::IngestError>(())
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::dataset::{
    tables, CompoundRecord, DatasetBundle, Measurement, QcReference, SampleRecord, SampleType,
    StandardAmount,
};
use crate::schema::{columns, normalize_identifier};

mod error;


pub use error::IngestError;

/// Paths of the tables of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFiles {
    /// Quantitation export
    pub quant_file: PathBuf,
    /// Internal-standard correspondence
    pub is_correspondence_file: PathBuf,
    /// Sample properties
    pub sample_properties_file: PathBuf,
    /// Optional QC reference table
    pub qc_file: Option<PathBuf>,
    /// Optional internal-standard concentration table
    pub is_concentration_file: Option<PathBuf>,
}

impl DatasetFiles {
    /// The three required tables
    pub fn new(
        quant_file: impl Into<PathBuf>,
        is_correspondence_file: impl Into<PathBuf>,
        sample_properties_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            quant_file: quant_file.into(),
            is_correspondence_file: is_correspondence_file.into(),
            sample_properties_file: sample_properties_file.into(),
            qc_file: None,
            is_concentration_file: None,
        }
    }

    /// Add the QC reference table
    pub fn with_qc_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.qc_file = Some(path.into());
        self
    }

    /// Add the internal-standard concentration table
    pub fn with_is_concentration_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.is_concentration_file = Some(path.into());
        self
    }

    /// Read every table and build the bundle
    pub fn load(&self) -> Result<DatasetBundle, IngestError> {
        let measurements = read_measurements(open(&self.quant_file)?)?;
        let compounds = read_correspondence(open(&self.is_correspondence_file)?)?;
        let samples = read_samples(open(&self.sample_properties_file)?)?;
        info!(
            "Read {} measurements, {} compounds, {} samples",
            measurements.len(),
            compounds.len(),
            samples.len()
        );

        let mut builder = DatasetBundle::builder()
            .measurements(measurements)
            .compounds(compounds)
            .samples(samples);
        if let Some(path) = &self.qc_file {
            let references = read_qc_references(open(path)?)?;
            debug!("Read {} QC references", references.len());
            builder = builder.qc_references(references);
        }
        if let Some(path) = &self.is_concentration_file {
            let amounts = read_standard_amounts(open(path)?)?;
            debug!("Read {} standard amounts", amounts.len());
            builder = builder.standard_amounts(amounts);
        }

        Ok(builder.build()?)
    }
}

fn open(path: &Path) -> Result<BufReader<File>, IngestError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Header of a table, normalized
struct Header {
    table: &'static str,
    names: Vec<String>,
}

impl Header {
    fn read<R: Read>(
        table: &'static str,
        reader: &mut csv::Reader<R>,
    ) -> Result<Self, IngestError> {
        let names = reader.headers()?.iter().map(normalize_identifier).collect();
        Ok(Self { table, names })
    }

    fn find(&self, column: &str) -> Option<usize> {
        self.names.iter().position(|name| name == column)
    }

    fn require(&self, column: &'static str) -> Result<usize, IngestError> {
        self.find(column).ok_or(IngestError::MissingColumn {
            table: self.table,
            column,
        })
    }
}

/// One data row with access by column index
struct Row<'a> {
    header: &'a Header,
    record: &'a csv::StringRecord,
    line: usize,
}

impl Row<'_> {
    fn text(&self, index: usize) -> Option<&str> {
        self.record.get(index).filter(|cell| !cell.is_empty())
    }

    fn identifier(&self, index: usize) -> Option<String> {
        self.text(index).map(normalize_identifier)
    }

    fn required_identifier(
        &self,
        index: usize,
        column: &'static str,
    ) -> Result<String, IngestError> {
        self.identifier(index).ok_or(IngestError::MissingCell {
            table: self.header.table,
            line: self.line,
            column,
        })
    }

    /// Blank numeric cells become NaN so the validator reports them per row
    fn number_or_nan(&self, index: usize) -> Result<f64, IngestError> {
        Ok(self.number(index)?.unwrap_or(f64::NAN))
    }

    fn number(&self, index: usize) -> Result<Option<f64>, IngestError> {
        self.text(index)
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| IngestError::InvalidNumber {
                    table: self.header.table,
                    line: self.line,
                    column: self.header.names[index].clone(),
                    value: cell.to_string(),
                })
            })
            .transpose()
    }

    fn optional_number(&self, index: Option<usize>) -> Result<Option<f64>, IngestError> {
        index.map_or(Ok(None), |i| self.number(i))
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Quantity {
    Area,
    Concentration,
    RetentionTime,
}

impl Quantity {
    fn slot(self, measurement: &mut Measurement) -> &mut Option<f64> {
        match self {
            Quantity::Area => &mut measurement.peak_area,
            Quantity::Concentration => &mut measurement.reported_concentration,
            Quantity::RetentionTime => &mut measurement.retention_time,
        }
    }
}

/// Read the wide quantitation export.
///
/// Every sample column of every compound yields one measurement. A compound
/// that repeats a row type, or two sample columns whose headers normalize to
/// the same id, give a second measurement for the same key, which the
/// validator reports as a duplicate.
pub fn read_measurements<R: Read>(reader: R) -> Result<Vec<Measurement>, IngestError> {
    let mut reader = csv_reader(reader);
    let header = Header::read(tables::MEASUREMENTS, &mut reader)?;
    let name = header.require(columns::NAME)?;
    let kind = header.require(columns::TYPE)?;
    let sample_columns: Vec<usize> = (0..header.names.len())
        .filter(|i| *i != name && *i != kind && !header.names[*i].is_empty())
        .collect();

    let mut measurements: Vec<Measurement> = Vec::new();
    // keyed by column, so headers that normalize alike stay separate measurements
    let mut slots: HashMap<(usize, String), Vec<usize>> = HashMap::new();
    let mut occurrences: HashMap<(String, Quantity), usize> = HashMap::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = Row {
            header: &header,
            record: &record,
            line: idx + 2,
        };
        let compound = row.required_identifier(name, columns::NAME)?;
        let quantity = match row.identifier(kind).as_deref() {
            Some(columns::AREA) => Quantity::Area,
            Some(columns::CONCENTRATION) => Quantity::Concentration,
            Some(columns::RETENTION_TIME) => Quantity::RetentionTime,
            other => {
                return Err(IngestError::InvalidRowType {
                    line: row.line,
                    value: other.unwrap_or_default().to_string(),
                })
            }
        };

        // n-th row of this type for the compound fills the n-th measurement of each key
        let occurrence = occurrences.entry((compound.clone(), quantity)).or_insert(0);
        let nth = *occurrence;
        *occurrence += 1;

        for &column in &sample_columns {
            let value = row.number(column)?;
            let key = (column, compound.clone());
            let indices = slots.entry(key).or_default();
            let target = match indices.get(nth) {
                Some(&i) => i,
                None => {
                    measurements.push(Measurement::new(&header.names[column], &compound));
                    indices.push(measurements.len() - 1);
                    measurements.len() - 1
                }
            };
            *quantity.slot(&mut measurements[target]) = value;
        }
    }

    Ok(measurements)
}

/// Read the internal-standard correspondence table
pub fn read_correspondence<R: Read>(reader: R) -> Result<Vec<CompoundRecord>, IngestError> {
    let mut reader = csv_reader(reader);
    let header = Header::read(tables::CORRESPONDENCE, &mut reader)?;
    let native = header.require(columns::NATIVE)?;
    let internal = header.require(columns::INTERNAL_STANDARD)?;
    let external = header.find(columns::EXTERNAL_STANDARD);
    let spike = header.find(columns::SPIKE_AMOUNT);

    let mut compounds = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = Row {
            header: &header,
            record: &record,
            line: idx + 2,
        };
        let name = row.required_identifier(native, columns::NATIVE)?;
        let standard = row.required_identifier(internal, columns::INTERNAL_STANDARD)?;
        let mut compound = CompoundRecord::new(name, standard);
        if let Some(external) = external.and_then(|i| row.identifier(i)) {
            compound = compound.with_external_standard(external);
        }
        if let Some(amount) = row.optional_number(spike)? {
            compound = compound.with_spike_amount(amount);
        }
        compounds.push(compound);
    }
    Ok(compounds)
}

/// Read the sample properties table; every column besides the name, type and
/// native sample is a numeric property
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<SampleRecord>, IngestError> {
    let mut reader = csv_reader(reader);
    let header = Header::read(tables::SAMPLE_PROPERTIES, &mut reader)?;
    let name = header.require(columns::SAMPLE_NAME)?;
    let kind = header.require(columns::SAMPLE_TYPE)?;
    let native = header.find(columns::NATIVE_SAMPLE);
    let properties: Vec<usize> = (0..header.names.len())
        .filter(|i| *i != name && *i != kind && Some(*i) != native && !header.names[*i].is_empty())
        .collect();

    let mut samples = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = Row {
            header: &header,
            record: &record,
            line: idx + 2,
        };
        let sample_id = row.required_identifier(name, columns::SAMPLE_NAME)?;
        let tag = row.identifier(kind).unwrap_or_default();
        let mut sample = SampleRecord::new(sample_id, SampleType::from_tag(&tag));
        if let Some(native_id) = native.and_then(|i| row.identifier(i)) {
            sample = sample.with_native_sample(native_id);
        }
        for &column in &properties {
            if let Some(value) = row.number(column)? {
                sample = sample.with_property(header.names[column].clone(), value);
            }
        }
        samples.push(sample);
    }
    Ok(samples)
}

/// Read the QC reference table
pub fn read_qc_references<R: Read>(reader: R) -> Result<Vec<QcReference>, IngestError> {
    let mut reader = csv_reader(reader);
    let header = Header::read(tables::QC, &mut reader)?;
    let native = header.require(columns::NATIVE)?;
    let concentration = header.require(columns::CONCENTRATION)?;
    let lower = header.find(columns::LOWER_LIMIT);
    let upper = header.find(columns::UPPER_LIMIT);

    let mut references = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = Row {
            header: &header,
            record: &record,
            line: idx + 2,
        };
        let compound = row.required_identifier(native, columns::NATIVE)?;
        let mut reference = QcReference::new(compound, row.number_or_nan(concentration)?);
        reference.lower_limit = row.optional_number(lower)?;
        reference.upper_limit = row.optional_number(upper)?;
        references.push(reference);
    }
    Ok(references)
}

/// Read the internal-standard concentration table; rows with a
/// `sample_name` override the nominal amount for that sample
pub fn read_standard_amounts<R: Read>(reader: R) -> Result<Vec<StandardAmount>, IngestError> {
    let mut reader = csv_reader(reader);
    let header = Header::read(tables::IS_CONCENTRATION, &mut reader)?;
    let name = header.require(columns::NAME)?;
    let amount = header.require(columns::AMOUNT)?;
    let sample = header.find(columns::SAMPLE_NAME);

    let mut amounts = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = Row {
            header: &header,
            record: &record,
            line: idx + 2,
        };
        let standard = row.required_identifier(name, columns::NAME)?;
        let value = row.number_or_nan(amount)?;
        amounts.push(match sample.and_then(|i| row.identifier(i)) {
            Some(sample_id) => StandardAmount::for_sample(standard, sample_id, value),
            None => StandardAmount::nominal(standard, value),
        });
    }
    Ok(amounts)
}
