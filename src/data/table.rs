//! Abundance table with named, row-aligned columns.

use crate::error::{Log2fcError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Cell values read as missing rather than rejected as non-numeric.
const MISSING_MARKERS: &[&str] = &["", "NA", "NaN", "nan", "N/A"];

/// A tab-separated abundance table held in memory.
///
/// The first column is the identifier (gene family, KO or pathway); the
/// remaining columns are per-sample abundances plus any derived columns.
/// Cells are kept as the text that was read so untouched columns are
/// written back verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct AbundanceTable {
    /// Column names in table order.
    columns: Vec<String>,
    /// Column-major cell storage, `cells[col][row]`.
    cells: Vec<Vec<String>>,
    /// Number of data rows.
    n_rows: usize,
}

impl AbundanceTable {
    /// Create a table from column names and column-major cells.
    pub fn new(columns: Vec<String>, cells: Vec<Vec<String>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Log2fcError::EmptyData(
                "Table must have at least one column".to_string(),
            ));
        }
        if columns.len() != cells.len() {
            return Err(Log2fcError::InvalidParameter(format!(
                "{} column names given for {} columns",
                columns.len(),
                cells.len()
            )));
        }
        let n_rows = cells[0].len();
        for (name, values) in columns.iter().zip(&cells) {
            if values.len() != n_rows {
                return Err(Log2fcError::InvalidParameter(format!(
                    "Column '{}' has {} rows, expected {}",
                    name,
                    values.len(),
                    n_rows
                )));
            }
        }
        Ok(Self {
            columns,
            cells,
            n_rows,
        })
    }

    /// Load a table from a TSV file.
    ///
    /// Expected format:
    /// - First row: header (first column is the identifier header, which may
    ///   start with `#`, e.g. `# Gene Family`)
    /// - Subsequent rows: identifier followed by abundance values
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a table from any reader producing TSV text.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);

        let mut columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if columns.is_empty() || (columns.len() == 1 && columns[0].is_empty()) {
            return Err(Log2fcError::EmptyData("TSV has no header".to_string()));
        }
        columns[0] = normalize_id_header(&columns[0]);

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); columns.len()];
        for record in reader.records() {
            let record = record?;
            for (col, value) in record.iter().enumerate() {
                cells[col].push(value.to_string());
            }
        }

        Self::new(columns, cells)
    }

    /// Write the table to a TSV file with a header row and no index column.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.to_writer(BufWriter::new(file))
    }

    /// Write the table as TSV to any writer.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        writer.write_record(&self.columns)?;
        for row in 0..self.n_rows {
            writer.write_record(self.cells.iter().map(|col| col[row].as_str()))?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Number of data rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns, identifier included.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order.
    #[inline]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Name of the identifier (first) column.
    #[inline]
    pub fn id_column(&self) -> &str {
        &self.columns[0]
    }

    /// Position of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of the named column.
    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.column_index(name).map(|idx| self.cells[idx].as_slice())
    }

    /// Cells of one row, in column order.
    pub fn row(&self, row: usize) -> Vec<&str> {
        self.cells.iter().map(|col| col[row].as_str()).collect()
    }

    /// Parse the named column as floating point values.
    ///
    /// Empty cells and `NA`/`NaN` markers become `f64::NAN`; anything else
    /// that does not parse is an error.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let values = self
            .column(name)
            .ok_or_else(|| Log2fcError::MissingColumn(name.to_string()))?;

        values
            .iter()
            .enumerate()
            .map(|(row, cell)| parse_abundance(cell, row, name))
            .collect()
    }

    /// Append a column, or overwrite an existing column of the same name in place.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.n_rows {
            return Err(Log2fcError::InvalidParameter(format!(
                "Column '{}' has {} rows, expected {}",
                name,
                values.len(),
                self.n_rows
            )));
        }
        match self.column_index(name) {
            Some(idx) => self.cells[idx] = values,
            None => {
                self.columns.push(name.to_string());
                self.cells.push(values);
            }
        }
        Ok(())
    }

    /// Move the named column to the front, keeping the others in order.
    pub fn move_to_front(&mut self, name: &str) -> Result<()> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| Log2fcError::MissingColumn(name.to_string()))?;
        let column = self.columns.remove(idx);
        let values = self.cells.remove(idx);
        self.columns.insert(0, column);
        self.cells.insert(0, values);
        Ok(())
    }
}

/// Strip a leading `#` marker from the identifier header.
///
/// `"# Gene Family"` and `"#Pathway"` become `"Gene Family"` and `"Pathway"`.
pub fn normalize_id_header(header: &str) -> String {
    if header.starts_with('#') {
        header
            .trim_start_matches(&['#', ' '][..])
            .trim()
            .to_string()
    } else {
        header.to_string()
    }
}

fn parse_abundance(cell: &str, row: usize, column: &str) -> Result<f64> {
    let trimmed = cell.trim();
    if MISSING_MARKERS.contains(&trimmed) {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| Log2fcError::InvalidValue {
        value: cell.to_string(),
        row,
        column: column.to_string(),
    })
}
