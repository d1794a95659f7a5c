//! # Input Table Layout
//!
//! Column layout of the five CSV tables read by [`ingest`](crate::ingest).
//! Header names are matched after [`normalize_identifier`]: lowercase, every
//! non-word character replaced by `_`.
//!
//! | Table | Required columns | Optional columns |
//! |-------|------------------|------------------|
//! | quant_file | name, type, one column per sample | |
//! | is_correspondence_file | native, internal_standard | external_standard, spike_amount |
//! | sample_properties_file | sample_name, sample_type | native_sample, numeric properties (volume, mass, spike_amount, …) |
//! | qc_file | native, concentration | lower_limit, upper_limit |
//! | is_concentration_file | name, amount | sample_name |
//!
//! The quantitation export is "wide": each row holds one quantity (`type`) of
//! one compound for every sample column. Rows of type `area`,
//! `concentration` and `retention_time` of the same compound are merged into
//! one [`Measurement`](crate::dataset::Measurement) per sample.

pub mod columns;

/// Normalize a header or identifier cell: trim, lowercase and replace every
/// non-word character with `_`
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
