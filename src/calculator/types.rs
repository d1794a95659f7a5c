use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::dataset::MeasurementKey;

/// Why a key was left out of a result table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapReason {
    /// No usable measurement for the key
    MissingMeasurement,
    /// Native counterpart of a spike sample is absent or unmeasured
    MissingNative,
    /// Internal standard area or amount unavailable in the sample
    MissingInternalStandard,
    /// Internal standard area is zero
    ZeroInternalStandardArea,
    /// Compound has no internal-standard mapping
    MissingMapping,
    /// Spike amount is absent or zero
    UndefinedSpikeAmount,
    /// Correction factor could not be derived from the QC data
    UndefinedCorrectionFactor,
    /// Spiked compound has no recovery to correct with
    MissingRecovery,
    /// Recovery is zero or negative
    UndefinedRecovery,
    /// Normalization property is absent or zero
    MissingNormalization,
    /// Result is not above the blank level
    BelowBlank,
    /// Reconstitution standard area or amount unavailable
    MissingReferenceStandard,
    /// Response factor denominator is zero
    UndefinedResponseFactor,
}

impl GapReason {
    /// Reason code as written in reports
    pub fn code(&self) -> &'static str {
        match self {
            GapReason::MissingMeasurement => "missing_measurement",
            GapReason::MissingNative => "missing_native",
            GapReason::MissingInternalStandard => "missing_internal_standard",
            GapReason::ZeroInternalStandardArea => "zero_internal_standard_area",
            GapReason::MissingMapping => "missing_mapping",
            GapReason::UndefinedSpikeAmount => "undefined_spike_amount",
            GapReason::UndefinedCorrectionFactor => "undefined_correction_factor",
            GapReason::MissingRecovery => "missing_recovery",
            GapReason::UndefinedRecovery => "undefined_recovery",
            GapReason::MissingNormalization => "missing_normalization",
            GapReason::BelowBlank => "below_blank",
            GapReason::MissingReferenceStandard => "missing_reference_standard",
            GapReason::UndefinedResponseFactor => "undefined_response_factor",
        }
    }
}

impl fmt::Display for GapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A key excluded from a result table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowGap<K> {
    /// Excluded key
    pub key: K,
    /// Reason code
    pub reason: GapReason,
}

/// Computed and excluded row counts of a result table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coverage {
    /// Rows with a value
    pub computed: usize,
    /// Rows excluded with a reason code
    pub excluded: usize,
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} computed, {} excluded", self.computed, self.excluded)
    }
}

/// Result rows ordered by key, plus the keys that could not be computed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "K: Serialize, V: Serialize"))]
pub struct ResultTable<K, V> {
    #[serde(serialize_with = "rows_as_seq")]
    rows: BTreeMap<K, V>,
    gaps: Vec<RowGap<K>>,
}

impl<K: Ord, V> Default for ResultTable<K, V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            gaps: Vec::new(),
        }
    }
}

impl<K: Ord, V> ResultTable<K, V> {
    pub(crate) fn insert(&mut self, key: K, value: V) {
        self.rows.insert(key, value);
    }

    pub(crate) fn exclude(&mut self, key: K, reason: GapReason) {
        self.gaps.push(RowGap { key, reason });
    }

    /// Value of a key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rows.get(key)
    }

    /// Rows in key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.rows.iter()
    }

    /// Keys in order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.keys()
    }

    /// Number of computed rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row was computed
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Excluded keys, in the order they were encountered
    pub fn gaps(&self) -> &[RowGap<K>] {
        &self.gaps
    }

    /// Computed and excluded row counts
    pub fn coverage(&self) -> Coverage {
        Coverage {
            computed: self.rows.len(),
            excluded: self.gaps.len(),
        }
    }

    /// Reason a key was excluded, if it was
    pub fn gap<Q>(&self, key: &Q) -> Option<GapReason>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.gaps
            .iter()
            .find(|g| <K as Borrow<Q>>::borrow(&g.key) == key)
            .map(|g| g.reason)
    }
}

impl<V> ResultTable<MeasurementKey, V> {
    /// Value of a (sample, compound) pair
    pub fn value_for(&self, sample_id: &str, compound_name: &str) -> Option<&V> {
        self.rows.get(&MeasurementKey::new(sample_id, compound_name))
    }

    /// Reason a (sample, compound) pair was excluded, if it was
    pub fn gap_for(&self, sample_id: &str, compound_name: &str) -> Option<GapReason> {
        self.gaps
            .iter()
            .find(|g| g.key.sample_id == sample_id && g.key.compound_name == compound_name)
            .map(|g| g.reason)
    }
}

#[derive(Serialize)]
struct Row<'a, K, V> {
    key: &'a K,
    value: &'a V,
}

fn rows_as_seq<K, V, S>(rows: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    K: Serialize,
    V: Serialize,
    S: Serializer,
{
    serializer.collect_seq(rows.iter().map(|(key, value)| Row { key, value }))
}

/// Where a correction factor came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorProvenance {
    /// Derived from QC replicates
    Measured,
    /// Fallback for compounds without a QC reference
    Default,
}

/// Per-compound correction factor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "provenance", rename_all = "snake_case")]
pub enum CorrectionFactor {
    /// Expected QC concentration divided by the averaged measured one
    Measured {
        /// Factor value
        value: f64,
        /// Averaged measured QC concentration
        measured_concentration: f64,
        /// Number of QC replicates averaged
        replicates: usize,
        /// Whether the measured QC concentration is inside the QC limits
        within_limits: Option<bool>,
    },
    /// Policy default for compounds without a QC reference
    Default {
        /// Factor value
        value: f64,
    },
    /// The QC measurement was zero, negative or not computable
    Undefined {
        /// Number of usable QC replicates
        replicates: usize,
    },
}

impl CorrectionFactor {
    /// Numeric factor, `None` when undefined
    pub fn value(&self) -> Option<f64> {
        match self {
            CorrectionFactor::Measured { value, .. } | CorrectionFactor::Default { value } => {
                Some(*value)
            }
            CorrectionFactor::Undefined { .. } => None,
        }
    }

    /// Provenance of a defined factor
    pub fn provenance(&self) -> Option<FactorProvenance> {
        match self {
            CorrectionFactor::Measured { .. } => Some(FactorProvenance::Measured),
            CorrectionFactor::Default { .. } => Some(FactorProvenance::Default),
            CorrectionFactor::Undefined { .. } => None,
        }
    }
}

/// How a measured amount was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementBasis {
    /// Peak area ratio to the internal standard times its amount
    InternalStandard,
    /// Concentration reported by the instrument software
    Reported,
}

/// Recovery of a spiked compound in one spike sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recovery {
    /// Recovery in percent
    pub percent: f64,
    /// Measured amount in the spike sample
    pub spiked_measured: f64,
    /// Measured amount in the native counterpart
    pub native_measured: f64,
    /// Amount spiked
    pub spike_amount: f64,
    /// How both amounts were measured
    pub basis: MeasurementBasis,
}

/// Response factor of an internal standard against its reconstitution standard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFactor {
    /// Factor value
    pub value: f64,
    /// Reconstitution standard used
    pub external_standard_id: String,
}

/// Recovery correction applied to a concentration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecoveryAdjustment {
    /// The strategy did not request recovery correction
    NotRequested,
    /// The compound is not spiked, so no recovery exists for it
    NotApplicable,
    /// Divided by `percent / 100`
    Applied {
        /// Averaged recovery used
        percent: f64,
    },
}

/// Final concentration of a compound in a sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concentration {
    /// Concentration in the units of the inputs
    pub value: f64,
    /// Correction factor applied
    pub correction_factor: f64,
    /// Provenance of the correction factor
    pub factor_provenance: FactorProvenance,
    /// Recovery correction applied
    pub recovery: RecoveryAdjustment,
}

/// Correction factors keyed by compound
pub type CorrectionFactorResult = ResultTable<String, CorrectionFactor>;

/// Recoveries keyed by (spike sample, compound)
pub type RecoveryResult = ResultTable<MeasurementKey, Recovery>;

/// Response factors keyed by (IS check sample, internal standard)
pub type ResponseFactorResult = ResultTable<MeasurementKey, ResponseFactor>;

/// Concentrations keyed by (sample, compound)
pub type ConcentrationResult = ResultTable<MeasurementKey, Concentration>;
