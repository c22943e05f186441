use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Delimited table layouts accepted as experiment input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
}

impl TableFormat {
    /// Format implied by the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(TableFormat::Csv),
            "tsv" => Some(TableFormat::Tsv),
            _ => None,
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            TableFormat::Csv => b',',
            TableFormat::Tsv => b'\t',
        }
    }
}

/// Check that `path` is an existing `.csv` or `.tsv` file and report which.
pub fn validate_table_file(path: &str) -> Result<TableFormat> {
    let path = Path::new(path);
    let Some(format) = TableFormat::from_path(path) else {
        anyhow::bail!("File must have a .tsv or .csv extension: {}", path.display());
    };
    if !path.is_file() {
        anyhow::bail!("File does not exist: {}", path.display());
    }
    Ok(format)
}

/// Write `bytes` to `path`, creating missing parent directories.
pub fn write_output_file(path: &str, bytes: &[u8]) -> Result<()> {
    let path = Path::new(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write: {}", path.display()))
}
