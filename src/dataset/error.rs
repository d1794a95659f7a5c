/// Errors raised while assembling a dataset bundle
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A required table was not supplied
    #[error("Schema error: required table '{0}' was not supplied")]
    MissingTable(&'static str),

    /// A required table was supplied without any rows
    #[error("Schema error: table '{0}' is empty")]
    EmptyTable(&'static str),

    /// A record is missing a required join key
    #[error("Schema error: {table} row {row} has an empty '{column}'")]
    EmptyKey {
        /// Table name
        table: &'static str,
        /// Zero-based row index within the table
        row: usize,
        /// Column holding the key
        column: &'static str,
    },
}
