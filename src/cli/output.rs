use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON document written by the CLI: the payload plus provenance.
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    /// Producing tool
    pub tool: &'static str,
    /// Tool version
    pub version: &'static str,
    /// RFC 3339 timestamp
    pub generated_at: String,
    /// Input quantitation export
    pub source: String,
    /// Results
    pub data: &'a T,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    pub fn new(source: &Path, data: &'a T) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at: chrono::Utc::now().to_rfc3339(),
            source: source.display().to_string(),
            data,
        }
    }
}

/// Write pretty JSON to a file, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value).context("Failed to write JSON")?;
            writer.flush().context("Failed to flush output file")?;
            info!("Wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value).context("Failed to write JSON")?;
            writeln!(handle)?;
        }
    }
    Ok(())
}
