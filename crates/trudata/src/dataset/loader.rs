//! CSV/TSV loader with delimiter detection and column type inference.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{Result, TrudataError};

use super::column::{Column, ColumnData, ColumnType};
use super::table::Dataset;
use super::temporal;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Tokens read as absent values (compared trimmed, case-insensitively).
const DEFAULT_NULL_VALUES: &[&str] = &["", "na", "n/a", "#n/a", "null", "none", "nan"];

/// Metadata about a loaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Values treated as absent.
    pub null_values: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Loads delimited text into a typed [`Dataset`].
#[derive(Debug, Clone)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a new loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a file and return the dataset and its metadata.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |source| TrudataError::Io {
            path: path.to_path_buf(),
            source,
        };

        let contents = fs::read(path).map_err(io_err)?;
        let size_bytes = contents.len() as u64;
        let hash = format!("sha256:{:x}", Sha256::digest(&contents));

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => sniff_delimiter(&contents, self.config.quote)?,
        };

        let dataset = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        info!(
            path = %path.display(),
            format = %format,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "loaded dataset"
        );

        let metadata = SourceMetadata {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            hash,
            size_bytes,
            format,
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            loaded_at: Utc::now(),
        };

        Ok((dataset, metadata))
    }

    /// Load in-memory delimited text.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => sniff_delimiter(bytes, self.config.quote)?,
        };
        self.parse_bytes(bytes, delimiter)
    }

    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.trim().to_string()).collect()
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }
            let record = result?;
            if headers.is_empty() {
                headers = (0..record.len()).map(|i| format!("column_{}", i + 1)).collect();
            }
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        if headers.is_empty() {
            return Err(TrudataError::EmptyData("No columns found".to_string()));
        }
        if rows.is_empty() {
            return Err(TrudataError::EmptyData("No data rows found".to_string()));
        }

        let columns = headers
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let raw: Vec<Option<&str>> = rows
                    .iter()
                    .map(|row| {
                        let value = row[index].as_str();
                        (!self.is_null_value(value)).then_some(value)
                    })
                    .collect();
                let column = infer_column(name, &raw);
                debug!(column = %name, column_type = %column.column_type(), "inferred column type");
                column
            })
            .collect();

        Dataset::new(columns)
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(&self, value: &str) -> bool {
        let trimmed = value.trim();
        self.config
            .null_values
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token.trim()))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the narrowest type every present value satisfies.
fn infer_column(name: &str, raw: &[Option<&str>]) -> Column {
    let present: Vec<&str> = raw.iter().flatten().copied().collect();

    let column_type = if present.is_empty() {
        ColumnType::Text
    } else if present.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
        ColumnType::Numeric
    } else if present.iter().all(|v| temporal::parse_datetime(v).is_some()) {
        ColumnType::Temporal
    } else {
        ColumnType::Text
    };

    let data = match column_type {
        ColumnType::Numeric => ColumnData::Numeric(
            raw.iter()
                .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()))
                .collect(),
        ),
        ColumnType::Temporal => ColumnData::Temporal(
            raw.iter()
                .map(|v| v.and_then(temporal::parse_datetime))
                .collect(),
        ),
        ColumnType::Text => {
            ColumnData::Text(raw.iter().map(|v| v.map(str::to_string)).collect())
        }
    };

    Column::new(name, data)
}

/// Lines sampled when sniffing the delimiter.
const SNIFF_LINES: usize = 10;

/// Pick the candidate that splits every sampled line into the same number of
/// fields, preferring more fields, then earlier candidates. Falls back to comma.
fn sniff_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let sample: Vec<&[u8]> = bytes
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .take(SNIFF_LINES)
        .collect();

    let Some(header) = sample.first() else {
        return Err(TrudataError::EmptyData("No lines to analyze".to_string()));
    };

    let best = DELIMITERS
        .iter()
        .enumerate()
        .filter_map(|(rank, &candidate)| {
            let expected = unquoted_occurrences(header, candidate, quote);
            if expected == 0 {
                return None;
            }
            let stable = sample
                .iter()
                .all(|line| unquoted_occurrences(line, candidate, quote) == expected);
            Some(((stable, expected, std::cmp::Reverse(rank)), candidate))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, candidate)| candidate)
        .unwrap_or(b',');

    Ok(best)
}

/// Occurrences of `delimiter` outside quoted sections.
fn unquoted_occurrences(line: &[u8], delimiter: u8, quote: u8) -> usize {
    line.iter()
        .scan(false, |quoted, &b| {
            if b == quote {
                *quoted = !*quoted;
            }
            Some(!*quoted && b == delimiter)
        })
        .filter(|&hit| hit)
        .count()
}
