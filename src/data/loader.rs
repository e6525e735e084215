//! Tab-delimited table loading for the fruit colour files.
//!
//! Each file has a header row; the feature columns are looked up by name
//! after normalization (see [`normalize_column_name`]), so `"Red"`, `" red "`
//! and `"RED"` all select the same column.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::error::{NnError, Result};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which averaged colour channels make up a feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    /// Two features: red then blue.
    #[default]
    RedBlue,
    /// Three features: red, green, blue.
    RedGreenBlue,
}

impl FeatureSet {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            FeatureSet::RedBlue => &["red", "blue"],
            FeatureSet::RedGreenBlue => &["red", "green", "blue"],
        }
    }

    pub fn len(&self) -> usize {
        self.columns().len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// All feature vectors read for one fruit, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub features: Vec<Vec<f64>>,
}

/// One fruit and the files (one per sub-variety) that hold its samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySource {
    pub name: String,
    pub files: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Lower-cases a header cell and collapses every run of non-alphanumeric
/// characters into a single `_`, with no leading or trailing `_`.
pub fn normalize_column_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Reads one tab-delimited file and returns, for every data row, the values
/// of `columns` in the requested order.
///
/// Blank lines, including ones holding only spaces or tabs, are skipped. Any
/// other row must have as many fields as the header. A file with a header but
/// no rows is an error.
pub fn load_table<P: AsRef<Path>>(path: P, columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| NnError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = rdr.headers()
        .map_err(|e| parse_error(path, e.to_string()))?
        .iter()
        .map(normalize_column_name)
        .collect();

    let indices = columns.iter()
        .map(|&wanted| {
            let wanted_norm = normalize_column_name(wanted);
            headers.iter()
                .position(|h| *h == wanted_norm)
                .ok_or_else(|| NnError::MissingColumn {
                    path: path.to_path_buf(),
                    column: wanted.to_string(),
                })
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut rows = Vec::new();
    for (row_idx, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| parse_error(path, e.to_string()))?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        if record.len() != headers.len() {
            return Err(parse_error(
                path,
                format!("row {}: expected {} fields, found {}", row_idx + 1, headers.len(), record.len()),
            ));
        }
        let row = indices.iter()
            .map(|&i| {
                let cell = record.get(i).ok_or_else(|| {
                    parse_error(path, format!("row {}: missing field {}", row_idx + 1, headers[i]))
                })?;
                cell.parse::<f64>().map_err(|_| {
                    parse_error(
                        path,
                        format!("row {}: '{}' in column '{}' is not a number", row_idx + 1, cell, headers[i]),
                    )
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(parse_error(path, "no data rows".into()));
    }

    debug!(path = %path.display(), rows = rows.len(), "loaded table");
    Ok(rows)
}

/// Concatenates the selected columns of several files, in the given order.
pub fn load_category<P: AsRef<Path>>(name: &str, paths: &[P], columns: &[&str]) -> Result<Category> {
    let mut features = Vec::new();
    for path in paths {
        features.extend(load_table(path, columns)?);
    }
    info!(category = name, files = paths.len(), samples = features.len(), "loaded category");
    Ok(Category {
        name: name.to_string(),
        features,
    })
}

/// Loads every source in order.
pub fn load_categories(sources: &[CategorySource], features: FeatureSet) -> Result<Vec<Category>> {
    sources.iter()
        .map(|src| load_category(&src.name, src.files.as_slice(), features.columns()))
        .collect()
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn parse_error(path: &Path, message: String) -> NnError {
    NnError::Parse {
        path: path.to_path_buf(),
        message,
    }
}
