//! Column names as constants, after identifier normalization

// Quantitation export (wide format: one column per sample after these)
/// Compound name
pub const NAME: &str = "name";
/// Row kind, one of [`AREA`] or [`CONCENTRATION`]
pub const TYPE: &str = "type";
/// Row kind of peak-area rows
pub const AREA: &str = "area";
/// Row kind of reported-concentration rows
pub const CONCENTRATION: &str = "concentration";
/// Row kind of retention-time rows
pub const RETENTION_TIME: &str = "retention_time";

// Internal-standard correspondence
/// Analyte name
pub const NATIVE: &str = "native";
/// Internal standard of the analyte
pub const INTERNAL_STANDARD: &str = "internal_standard";
/// Reconstitution standard paired with the internal standard
pub const EXTERNAL_STANDARD: &str = "external_standard";
/// Amount spiked into spike samples
pub const SPIKE_AMOUNT: &str = "spike_amount";

// Sample properties (any further numeric column is a property)
/// Sample identifier
pub const SAMPLE_NAME: &str = "sample_name";
/// Sample role tag
pub const SAMPLE_TYPE: &str = "sample_type";
/// Unspiked counterpart of a spike sample
pub const NATIVE_SAMPLE: &str = "native_sample";
/// Default normalization property
pub const VOLUME: &str = "volume";

// QC reference (keyed by NATIVE)
/// Lower acceptance limit
pub const LOWER_LIMIT: &str = "lower_limit";
/// Upper acceptance limit
pub const UPPER_LIMIT: &str = "upper_limit";

// Internal-standard concentration (keyed by NAME, optional SAMPLE_NAME override)
/// Amount of standard added
pub const AMOUNT: &str = "amount";
