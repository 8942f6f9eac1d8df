//! CSV reader for nominal datasets.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use cedar_tree::{Dataset, Example, MISSING};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads a nominal dataset from a CSV file.
///
/// Expected CSV format:
/// - Header row required, one column per attribute plus the class column
/// - The class column is the last one unless chosen by name with
///   [`CsvReader::with_class_column`]
/// - Every cell is a nominal value; empty cells and `?` are missing
///
/// Value domains are collected from the observed non-missing values of each
/// column, sorted.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MalformedHeader`] | Header row is empty |
/// | [`IoError::UnknownClassColumn`] | Requested class column is not in the header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::Dataset`] | Header repeats a column name |
pub struct CsvReader {
    path: PathBuf,
    class_column: Option<String>,
}

impl CsvReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            class_column: None,
        }
    }

    /// Use the column named `name` as the class attribute.
    #[must_use]
    pub fn with_class_column(mut self, name: impl Into<String>) -> Self {
        self.class_column = Some(name.into());
        self
    }

    /// Read and validate the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets the row-length check below report the offending row.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header: Vec<String> = rdr
            .headers()
            .map_err(|e| self.csv_error(e))?
            .iter()
            .map(String::from)
            .collect();
        if header.is_empty() || header.iter().all(String::is_empty) {
            return Err(IoError::MalformedHeader {
                path: self.path.clone(),
                line: 1,
                reason: "empty header row".to_string(),
            });
        }

        let class_index = match &self.class_column {
            Some(name) => header
                .iter()
                .position(|column| column == name)
                .ok_or_else(|| IoError::UnknownClassColumn {
                    path: self.path.clone(),
                    column: name.clone(),
                })?,
            None => header.len() - 1,
        };
        debug!(n_columns = header.len(), class_column = %header[class_index], "read CSV header");

        let mut observed: Vec<BTreeSet<String>> = vec![BTreeSet::new(); header.len()];
        let mut examples = Vec::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            if record.len() != header.len() {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: header.len(),
                    got: record.len(),
                });
            }

            let mut example = Example::new();
            for (col, (column, raw)) in header.iter().zip(record.iter()).enumerate() {
                let value = if raw.is_empty() || raw == MISSING {
                    MISSING
                } else {
                    observed[col].insert(raw.to_string());
                    raw
                };
                example.set(column.as_str(), value);
            }
            examples.push(example);
        }

        if examples.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let domains: BTreeMap<String, Vec<String>> = header
            .iter()
            .cloned()
            .zip(observed.into_iter().map(|values| values.into_iter().collect()))
            .collect();

        let mut attributes = header;
        let class_attribute = attributes.remove(class_index);
        let dataset = Dataset::new(attributes, class_attribute, examples, domains)?;

        info!(
            n_examples = dataset.len(),
            n_attributes = dataset.attributes().len(),
            class_attribute = dataset.class_attribute(),
            "CSV dataset loaded"
        );
        Ok(dataset)
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
