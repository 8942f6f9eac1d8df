//! ARFF reader for nominal datasets.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cedar_tree::{Dataset, Example, MISSING};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads a nominal dataset from an ARFF file.
///
/// Expected layout:
/// - optional `@relation` line (ignored)
/// - one `@attribute <name> <type>` line per column; a `{a,b,c}` type
///   declares the attribute's value domain
/// - `@data`, followed by one comma-separated row per example
///
/// Blank lines and lines starting with `%` are skipped everywhere. The last
/// declared attribute is the class attribute. `?` and empty cells are read
/// as the missing marker. Directives are matched case-insensitively.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::MalformedHeader`] | Bad `@attribute` line, no attributes, no `@data`, or stray text before `@data` |
/// | [`IoError::InconsistentRowLength`] | Row value count differs from the attribute count |
/// | [`IoError::EmptyDataset`] | Zero data rows after `@data` |
/// | [`IoError::Dataset`] | Attribute names repeat |
pub struct ArffReader {
    path: PathBuf,
}

impl ArffReader {
    /// Create a new reader for the given ARFF file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the ARFF file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        self.parse(&text)
    }

    fn parse(&self, text: &str) -> Result<Dataset, IoError> {
        let mut columns: Vec<String> = Vec::new();
        let mut domains: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut in_data = false;
        let mut examples = Vec::new();

        for (line_index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }

            if in_data {
                examples.push(self.parse_row(line, &columns, examples.len())?);
                continue;
            }

            let directive = line
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase();
            match directive.as_str() {
                "@relation" => {}
                "@attribute" => {
                    let (name, domain) = self.parse_attribute(line, line_index + 1)?;
                    if let Some(values) = domain {
                        domains.insert(name.clone(), values);
                    }
                    columns.push(name);
                }
                "@data" => in_data = true,
                _ => {
                    return Err(self.malformed(line_index + 1, format!("unexpected line before @data: {line}")));
                }
            }
        }

        if columns.is_empty() {
            return Err(self.malformed(0, "no @attribute declarations".to_string()));
        }
        if !in_data {
            return Err(self.malformed(0, "missing @data section".to_string()));
        }
        if examples.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        debug!(n_columns = columns.len(), n_domains = domains.len(), "read ARFF header");

        let class_attribute = columns.pop().unwrap_or_default();
        let dataset = Dataset::new(columns, class_attribute, examples, domains)?;

        info!(
            n_examples = dataset.len(),
            n_attributes = dataset.attributes().len(),
            class_attribute = dataset.class_attribute(),
            "ARFF dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse `@attribute <name> <type>`, returning the name and a declared domain if nominal.
    fn parse_attribute(&self, line: &str, line_no: usize) -> Result<(String, Option<Vec<String>>), IoError> {
        let bad = || self.malformed(line_no, format!("bad @attribute line: {line}"));

        // Directive keyword is ASCII, so byte slicing after it is safe.
        let rest = line["@attribute".len()..].trim_start();
        let (name, kind) = match rest.chars().next() {
            Some(quote @ ('\'' | '"')) => {
                let inner = &rest[1..];
                let close = inner.find(quote).ok_or_else(bad)?;
                (&inner[..close], inner[close + 1..].trim())
            }
            _ => match rest.split_once(char::is_whitespace) {
                Some((name, kind)) => (name, kind.trim()),
                None => (rest, ""),
            },
        };
        if name.is_empty() || kind.is_empty() {
            return Err(bad());
        }

        let domain = match (kind.find('{'), kind.rfind('}')) {
            (Some(open), Some(close)) if open < close => Some(
                kind[open + 1..close]
                    .split(',')
                    .map(|v| unquote(v.trim()).to_string())
                    .filter(|v| !v.is_empty())
                    .collect(),
            ),
            _ => None,
        };
        Ok((name.to_string(), domain))
    }

    fn parse_row(&self, line: &str, columns: &[String], row_index: usize) -> Result<Example, IoError> {
        let values: Vec<&str> = line.split(',').map(|v| unquote(v.trim())).collect();
        if values.len() != columns.len() {
            return Err(IoError::InconsistentRowLength {
                path: self.path.clone(),
                row_index,
                expected: columns.len(),
                got: values.len(),
            });
        }
        Ok(columns
            .iter()
            .zip(values)
            .map(|(column, value)| {
                let value = if value.is_empty() { MISSING } else { value };
                (column.as_str(), value)
            })
            .collect())
    }

    fn malformed(&self, line: usize, reason: String) -> IoError {
        IoError::MalformedHeader {
            path: self.path.clone(),
            line,
            reason,
        }
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}
