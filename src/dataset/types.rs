use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Composite key of a measurement: one compound in one sample
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeasurementKey {
    /// Sample identifier
    pub sample_id: String,
    /// Compound name
    pub compound_name: String,
}

impl MeasurementKey {
    /// Create a key from a sample id and compound name
    pub fn new(sample_id: impl Into<String>, compound_name: impl Into<String>) -> Self {
        Self {
            sample_id: sample_id.into(),
            compound_name: compound_name.into(),
        }
    }
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sample_id, self.compound_name)
    }
}

/// Role of a sample within the analytical run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    /// Study sample whose concentration is reported
    Unknown,
    /// Procedural blank
    Blank,
    /// Quality-control reference sample
    Qc,
    /// Sample spiked with a known amount of analyte
    Spike,
    /// Internal/reconstitution standard check sample
    InternalStandardCheck,
    /// Tag that is not part of the recognized vocabulary
    Unrecognized(String),
}

impl SampleType {
    /// Map a sample-type tag from an export to its variant.
    ///
    /// Tags are compared case-insensitively; anything unknown is kept as
    /// [`SampleType::Unrecognized`] so validation can report it.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "sample" | "unknown" | "study" => SampleType::Unknown,
            "blank" => SampleType::Blank,
            "qc" => SampleType::Qc,
            "spike" | "spiked" => SampleType::Spike,
            "isrs" | "is_check" | "internal_standard_check" => SampleType::InternalStandardCheck,
            other => SampleType::Unrecognized(other.to_string()),
        }
    }

    /// Canonical tag
    pub fn as_str(&self) -> &str {
        match self {
            SampleType::Unknown => "unknown",
            SampleType::Blank => "blank",
            SampleType::Qc => "qc",
            SampleType::Spike => "spike",
            SampleType::InternalStandardCheck => "internal_standard_check",
            SampleType::Unrecognized(tag) => tag,
        }
    }

    /// Whether the tag belongs to the recognized vocabulary
    pub fn is_recognized(&self) -> bool {
        !matches!(self, SampleType::Unrecognized(_))
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analyte entry of the internal-standard correspondence table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    /// Analyte name (unique within a run)
    pub compound_name: String,
    /// Internal standard used to normalize this analyte
    pub internal_standard_id: String,
    /// Reconstitution (external) standard paired with the internal standard
    pub external_standard_id: Option<String>,
    /// Whether spike samples contain a known amount of this analyte
    pub is_spiked: bool,
    /// Amount of analyte added to spike samples
    pub spike_amount: Option<f64>,
}

impl CompoundRecord {
    /// Create an unspiked analyte mapped to an internal standard
    pub fn new(compound_name: impl Into<String>, internal_standard_id: impl Into<String>) -> Self {
        Self {
            compound_name: compound_name.into(),
            internal_standard_id: internal_standard_id.into(),
            external_standard_id: None,
            is_spiked: false,
            spike_amount: None,
        }
    }

    /// Pair the internal standard with a reconstitution standard
    pub fn with_external_standard(mut self, external_standard_id: impl Into<String>) -> Self {
        self.external_standard_id = Some(external_standard_id.into());
        self
    }

    /// Mark the analyte as spiked with the given amount
    pub fn with_spike_amount(mut self, amount: f64) -> Self {
        self.is_spiked = true;
        self.spike_amount = Some(amount);
        self
    }
}

/// Physical sample and its matrix properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Sample identifier (unique)
    pub sample_id: String,
    /// Role of the sample in the run
    pub sample_type: SampleType,
    /// Unspiked counterpart of a spike sample
    pub native_sample_id: Option<String>,
    /// Numeric properties such as `volume` or `mass`
    pub properties: BTreeMap<String, f64>,
}

impl SampleRecord {
    /// Create a sample without properties
    pub fn new(sample_id: impl Into<String>, sample_type: SampleType) -> Self {
        Self {
            sample_id: sample_id.into(),
            sample_type,
            native_sample_id: None,
            properties: BTreeMap::new(),
        }
    }

    /// Attach a numeric property
    pub fn with_property(mut self, name: impl Into<String>, value: f64) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Link a spike sample to its native counterpart
    pub fn with_native_sample(mut self, sample_id: impl Into<String>) -> Self {
        self.native_sample_id = Some(sample_id.into());
        self
    }

    /// Look up a numeric property
    pub fn property(&self, name: &str) -> Option<f64> {
        self.properties.get(name).copied()
    }
}

/// One row of the quantitation export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Sample identifier
    pub sample_id: String,
    /// Compound name (analyte or standard)
    pub compound_name: String,
    /// Integrated peak area
    pub peak_area: Option<f64>,
    /// Concentration reported by the instrument software
    pub reported_concentration: Option<f64>,
    /// Retention time
    pub retention_time: Option<f64>,
}

impl Measurement {
    /// Create an empty measurement row
    pub fn new(sample_id: impl Into<String>, compound_name: impl Into<String>) -> Self {
        Self {
            sample_id: sample_id.into(),
            compound_name: compound_name.into(),
            peak_area: None,
            reported_concentration: None,
            retention_time: None,
        }
    }

    /// Set the peak area
    pub fn with_peak_area(mut self, area: f64) -> Self {
        self.peak_area = Some(area);
        self
    }

    /// Set the instrument-reported concentration
    pub fn with_reported_concentration(mut self, concentration: f64) -> Self {
        self.reported_concentration = Some(concentration);
        self
    }

    /// Set the retention time
    pub fn with_retention_time(mut self, retention_time: f64) -> Self {
        self.retention_time = Some(retention_time);
        self
    }

    /// Composite key of this row
    pub fn key(&self) -> MeasurementKey {
        MeasurementKey::new(&self.sample_id, &self.compound_name)
    }
}

/// Amount of an internal or external standard
///
/// A row without `sample_id` is the nominal amount; a row with one overrides
/// the nominal amount for that sample only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardAmount {
    /// Standard identifier
    pub standard_id: String,
    /// Amount added
    pub amount: f64,
    /// Sample the override applies to
    pub sample_id: Option<String>,
}

impl StandardAmount {
    /// Nominal amount for every sample
    pub fn nominal(standard_id: impl Into<String>, amount: f64) -> Self {
        Self {
            standard_id: standard_id.into(),
            amount,
            sample_id: None,
        }
    }

    /// Amount for a single sample
    pub fn for_sample(
        standard_id: impl Into<String>,
        sample_id: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            standard_id: standard_id.into(),
            amount,
            sample_id: Some(sample_id.into()),
        }
    }
}

/// Expected QC concentration of one compound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcReference {
    /// Compound name
    pub compound_name: String,
    /// True concentration of the compound in the QC material
    pub expected_concentration: f64,
    /// Lower acceptance limit for the measured QC concentration
    pub lower_limit: Option<f64>,
    /// Upper acceptance limit for the measured QC concentration
    pub upper_limit: Option<f64>,
}

impl QcReference {
    /// Reference without acceptance limits
    pub fn new(compound_name: impl Into<String>, expected_concentration: f64) -> Self {
        Self {
            compound_name: compound_name.into(),
            expected_concentration,
            lower_limit: None,
            upper_limit: None,
        }
    }

    /// Attach acceptance limits
    pub fn with_limits(mut self, lower: f64, upper: f64) -> Self {
        self.lower_limit = Some(lower);
        self.upper_limit = Some(upper);
        self
    }

    /// Whether `value` lies inside the acceptance limits, if any are defined
    pub fn accepts(&self, value: f64) -> Option<bool> {
        if self.lower_limit.is_none() && self.upper_limit.is_none() {
            return None;
        }
        let above = self.lower_limit.map_or(true, |lower| value >= lower);
        let below = self.upper_limit.map_or(true, |upper| value <= upper);
        Some(above && below)
    }
}
