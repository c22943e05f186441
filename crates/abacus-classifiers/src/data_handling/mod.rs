//! Data structures for uploaded tabular datasets.
//!
//! A `Dataset` is an ordered list of named columns. Each cell keeps the type
//! it was parsed as, and each column carries an inferred `ColumnKind`, so
//! the runner can decide which columns are usable numeric features without
//! re-reading the raw text. Column order is significant: the last column is
//! the prediction target.
use std::io::Read;
use std::path::Path;

use ndarray::Array2;

use crate::error::{Result, RunnerError};

pub mod split;

pub use split::{train_test_split, validation_split, Partition};

/// Tokens read as a missing value, matching common dataframe defaults.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    /// Missing cells and NaN numbers both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Number(v) => v.is_nan(),
            Cell::Bool(_) | Cell::Text(_) => false,
        }
    }

    /// Numeric view of the cell. Booleans count as 1/0.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Cell::Missing | Cell::Text(_) => None,
        }
    }
}

/// Per-column type, inferred once when the column is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnKind::Text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<Cell>,
}

/// How a single raw field parses, before the column kind is known.
enum RawField {
    Missing,
    Integer(f64),
    Float(f64),
    Bool(bool),
    Text,
}

fn classify(raw: &str) -> RawField {
    let trimmed = raw.trim();
    if MISSING_TOKENS.contains(&trimmed) {
        return RawField::Missing;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return RawField::Integer(v as f64);
    }
    // `parse` also accepts NaN spellings outside MISSING_TOKENS ("NAN", "+nan").
    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_nan() {
            return RawField::Missing;
        }
        return RawField::Float(v);
    }
    match trimmed {
        "true" | "True" | "TRUE" => RawField::Bool(true),
        "false" | "False" | "FALSE" => RawField::Bool(false),
        _ => RawField::Text,
    }
}

impl Column {
    /// Build a column from raw CSV fields, inferring its kind.
    ///
    /// A column is `Integer` when every field is an integer literal and none
    /// is missing, `Float` when every present field is numeric (including an
    /// all-missing column), `Boolean` when every field is a boolean literal
    /// and none is missing, and `Text` otherwise. Text columns keep the raw
    /// field verbatim so label values round-trip exactly.
    pub fn from_raw(name: impl Into<String>, raw: Vec<String>) -> Self {
        let parsed: Vec<RawField> = raw.iter().map(|r| classify(r)).collect();

        let mut missing = 0usize;
        let mut integers = 0usize;
        let mut floats = 0usize;
        let mut bools = 0usize;
        let mut texts = 0usize;
        for field in &parsed {
            match field {
                RawField::Missing => missing += 1,
                RawField::Integer(_) => integers += 1,
                RawField::Float(_) => floats += 1,
                RawField::Bool(_) => bools += 1,
                RawField::Text => texts += 1,
            }
        }

        let kind = if raw.is_empty() || texts > 0 {
            ColumnKind::Text
        } else if bools > 0 {
            if bools == raw.len() {
                ColumnKind::Boolean
            } else {
                ColumnKind::Text
            }
        } else if integers == raw.len() {
            ColumnKind::Integer
        } else {
            debug_assert_eq!(integers + floats + missing, raw.len());
            ColumnKind::Float
        };

        let cells = match kind {
            ColumnKind::Text => parsed
                .iter()
                .zip(raw)
                .map(|(field, text)| match field {
                    RawField::Missing => Cell::Missing,
                    _ => Cell::Text(text),
                })
                .collect(),
            _ => parsed
                .into_iter()
                .map(|field| match field {
                    RawField::Missing => Cell::Missing,
                    RawField::Integer(v) | RawField::Float(v) => Cell::Number(v),
                    RawField::Bool(b) => Cell::Bool(b),
                    RawField::Text => unreachable!("text fields force a Text column"),
                })
                .collect(),
        };

        Column {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Build a column from already typed cells, inferring its kind.
    pub fn from_cells(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let all = |pred: fn(&Cell) -> bool| !cells.is_empty() && cells.iter().all(pred);

        let kind = if all(|c| matches!(c, Cell::Number(v) if v.fract() == 0.0)) {
            ColumnKind::Integer
        } else if all(|c| matches!(c, Cell::Number(_) | Cell::Missing)) {
            ColumnKind::Float
        } else if all(|c| matches!(c, Cell::Bool(_))) {
            ColumnKind::Boolean
        } else {
            ColumnKind::Text
        };

        Column {
            name: name.into(),
            kind,
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Values of a numeric column, with missing cells as NaN.
    /// Returns `None` for text columns.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        if !self.is_numeric() {
            return None;
        }
        Some(
            self.cells
                .iter()
                .map(|c| c.as_f64().unwrap_or(f64::NAN))
                .collect(),
        )
    }

    /// Display form of a cell when used as a label value.
    ///
    /// Integer columns render without a fractional part, float columns
    /// always show one (`1.0`), booleans render as `True`/`False` and text
    /// is kept verbatim. Missing cells have no label value.
    pub fn label_key(&self, row: usize) -> Option<String> {
        match self.cells.get(row)? {
            Cell::Missing => None,
            Cell::Bool(true) => Some("True".to_string()),
            Cell::Bool(false) => Some("False".to_string()),
            Cell::Text(t) => Some(t.clone()),
            Cell::Number(v) if v.is_nan() => None,
            Cell::Number(v) => Some(match self.kind {
                ColumnKind::Integer => format!("{}", *v as i64),
                _ => format_float(*v),
            }),
        }
    }
}

fn format_float(v: f64) -> String {
    // -0.0 and 0.0 are the same label.
    let v = if v == 0.0 { 0.0 } else { v };
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// An in-memory table of named columns, all of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let Some(first) = columns.first() else {
            return Err(RunnerError::Parse("dataset has no columns".to_string()));
        };
        let nrows = first.len();
        if let Some(bad) = columns.iter().find(|c| c.len() != nrows) {
            return Err(RunnerError::Parse(format!(
                "column '{}' has {} rows, expected {}",
                bad.name,
                bad.len(),
                nrows
            )));
        }
        Ok(Dataset { columns })
    }

    /// Parse a CSV table with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        crate::io::read_csv_table(reader)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(bytes)
    }

    /// Read a table from disk. Files with a `.tsv` extension are tab
    /// delimited, anything else is read as CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            RunnerError::Parse(format!("failed to open {}: {}", path.display(), e))
        })?;
        let is_tsv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("tsv"));
        let delimiter = if is_tsv { b'\t' } else { b',' };
        crate::io::read_delimited_table(std::io::BufReader::new(file), delimiter)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn last_column(&self) -> &Column {
        // `new` rejects empty column lists.
        &self.columns[self.columns.len() - 1]
    }

    pub fn nrows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Reduce the dataset to `names`, in that order.
    pub fn select_columns(&self, names: &[String]) -> Result<Dataset> {
        let columns = names
            .iter()
            .map(|name| {
                self.column(name)
                    .cloned()
                    .ok_or_else(|| RunnerError::Parse(format!("unknown column '{}'", name)))
            })
            .collect::<Result<Vec<_>>>()?;
        Dataset::new(columns)
    }

    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    pub fn has_missing(&self) -> bool {
        self.columns.iter().any(|c| c.cells.iter().any(Cell::is_missing))
    }

    /// Stack the named numeric columns into a rows x features matrix.
    pub fn feature_matrix(&self, names: &[String]) -> Result<Array2<f64>> {
        let columns = names
            .iter()
            .map(|name| {
                self.column(name)
                    .and_then(Column::numeric_values)
                    .ok_or_else(|| {
                        RunnerError::Training(format!("'{}' is not a numeric column", name))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Array2::from_shape_fn(
            (self.nrows(), columns.len()),
            |(r, c)| columns[c][r],
        ))
    }

    pub fn log_summary(&self) {
        log::info!("----- Input Data Summary -----");
        log::info!("{} rows, {} columns", self.nrows(), self.ncols());
        for column in &self.columns {
            log::debug!(
                "column '{}': {:?}, {} missing",
                column.name,
                column.kind,
                column.missing_count()
            );
        }
        log::info!("------------------------------");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn integer_literals_make_integer_column() {
        let col = Column::from_raw("a", raw(&["1", "2", "-3"]));
        assert_eq!(col.kind, ColumnKind::Integer);
        assert_eq!(col.label_key(2).as_deref(), Some("-3"));
    }

    #[test]
    fn missing_cell_promotes_integers_to_float() {
        let col = Column::from_raw("a", raw(&["1", "", "3"]));
        assert_eq!(col.kind, ColumnKind::Float);
        assert_eq!(col.missing_count(), 1);
        assert_eq!(col.label_key(0).as_deref(), Some("1.0"));
        assert!(col.numeric_values().unwrap()[1].is_nan());
    }

    #[test]
    fn mixed_text_keeps_raw_values() {
        let col = Column::from_raw("a", raw(&["1", "x", "NA"]));
        assert_eq!(col.kind, ColumnKind::Text);
        assert_eq!(col.cells[0], Cell::Text("1".to_string()));
        assert_eq!(col.cells[2], Cell::Missing);
        assert!(col.numeric_values().is_none());
    }

    #[test]
    fn booleans_are_numeric_only_when_complete() {
        let col = Column::from_raw("flag", raw(&["True", "false", "TRUE"]));
        assert_eq!(col.kind, ColumnKind::Boolean);
        assert_eq!(col.numeric_values().unwrap(), vec![1.0, 0.0, 1.0]);
        assert_eq!(col.label_key(1).as_deref(), Some("False"));

        let col = Column::from_raw("flag", raw(&["True", ""]));
        assert_eq!(col.kind, ColumnKind::Text);
    }

    #[test]
    fn all_missing_column_is_float() {
        let col = Column::from_raw("a", raw(&["", "NaN"]));
        assert_eq!(col.kind, ColumnKind::Float);
        assert_eq!(col.missing_count(), 2);
    }

    #[test]
    fn nan_spellings_are_missing() {
        let col = Column::from_raw("a", raw(&["1.5", "NAN", "+nan", "Nan", "2"]));
        assert_eq!(col.kind, ColumnKind::Float);
        assert_eq!(col.missing_count(), 3);
        assert_eq!(col.label_key(1), None);

        let col = Column::from_cells("b", vec![Cell::Number(1.0), Cell::Number(f64::NAN)]);
        assert_eq!(col.missing_count(), 1);
    }

    #[test]
    fn negative_zero_label_matches_zero() {
        let col = Column::from_raw("label", raw(&["0.0", "1.5", "-0.0"]));
        assert_eq!(col.label_key(0).as_deref(), Some("0.0"));
        assert_eq!(col.label_key(2).as_deref(), Some("0.0"));

        let col = Column::from_raw("label", raw(&["0", "-0", "1"]));
        assert_eq!(col.kind, ColumnKind::Integer);
        assert_eq!(col.label_key(1).as_deref(), Some("0"));
    }

    #[test]
    fn dataset_rejects_ragged_columns() {
        let a = Column::from_cells("a", vec![Cell::Number(1.0)]);
        let b = Column::from_cells("b", vec![Cell::Number(1.0), Cell::Number(2.0)]);
        assert!(Dataset::new(vec![a, b]).is_err());
        assert!(Dataset::new(vec![]).is_err());
    }

    #[test]
    fn feature_matrix_is_row_major() {
        let a = Column::from_cells("a", vec![Cell::Number(1.0), Cell::Number(2.0)]);
        let b = Column::from_cells("b", vec![Cell::Number(3.0), Cell::Number(4.0)]);
        let ds = Dataset::new(vec![a, b]).unwrap();
        let x = ds
            .feature_matrix(&["b".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(x.shape(), &[2, 2]);
        assert_eq!(x[(0, 0)], 3.0);
        assert_eq!(x[(1, 1)], 2.0);
    }
}
