//! CSV reader producing a typed `Dataset`.
use std::collections::HashSet;
use std::io::Read;

use csv::StringRecord;

use crate::data_handling::{Column, Dataset};
use crate::error::{Result, RunnerError};

/// Read a comma separated table with a header row.
pub fn read_csv_table<R: Read>(reader: R) -> Result<Dataset> {
    read_delimited_table(reader, b',')
}

/// Read a delimited table with a header row.
///
/// Rows must all have as many fields as the header. Column kinds are
/// inferred per column once every row has been read.
pub fn read_delimited_table<R: Read>(reader: R, delimiter: u8) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(RunnerError::Parse("missing header row".to_string()));
    }
    let names = column_names(&headers);

    let mut fields: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for (row_idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| {
            RunnerError::Parse(format!("failed to read row {}: {}", row_idx + 1, e))
        })?;
        for (col, value) in record.iter().enumerate() {
            fields[col].push(value.to_string());
        }
    }

    let columns = names
        .into_iter()
        .zip(fields)
        .map(|(name, raw)| Column::from_raw(name, raw))
        .collect();

    let dataset = Dataset::new(columns)?;
    log::debug!(
        "Parsed CSV table with {} rows and {} columns",
        dataset.nrows(),
        dataset.ncols()
    );
    Ok(dataset)
}

/// Header names with blanks filled in and duplicates suffixed `.1`, `.2`, ...
fn column_names(headers: &StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(headers.len());

    for (idx, header) in headers.iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}
