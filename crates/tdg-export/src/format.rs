//! ---
//! tdg_section: "03-persistence-export"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Output format and destination resolution."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{ExportError, Result};

/// Encodings the exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma separated values with a header row and no index column.
    Csv,
    /// A JSON array of row objects.
    Json,
    /// Apache Parquet, one typed column per field, Snappy compressed.
    Parquet,
}

impl OutputFormat {
    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Parquet => "parquet",
        }
    }

    /// MIME type sent with uploads.
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json => "application/json",
            OutputFormat::Parquet => "application/vnd.apache.parquet",
        }
    }

    /// Format implied by a file name. `None` means the extension is unknown or
    /// missing.
    pub fn from_extension(path: &str) -> Option<Self> {
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some("csv") => Some(OutputFormat::Csv),
            Some("json") => Some(OutputFormat::Json),
            Some("parquet") => Some(OutputFormat::Parquet),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "parquet" => Ok(OutputFormat::Parquet),
            other => Err(ExportError::UnsupportedFormat(other.to_owned())),
        }
    }
}

/// A resolved local destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalTarget {
    /// Write to standard output.
    Stdout(OutputFormat),
    /// Write to a file at the given path.
    File {
        /// Final path, including any appended extension.
        path: PathBuf,
        /// Encoding for the file.
        format: OutputFormat,
    },
}

impl LocalTarget {
    /// Resolve a user supplied path.
    ///
    /// `-` means stdout (CSV unless overridden). An explicit format is used as
    /// given. Otherwise the extension decides, and a path with no recognised
    /// extension is written as CSV with `.csv` appended.
    pub fn resolve(path: &Path, explicit: Option<OutputFormat>) -> Result<Self> {
        if path.as_os_str() == "-" {
            return Ok(LocalTarget::Stdout(explicit.unwrap_or(OutputFormat::Csv)));
        }
        if let Some(format) = explicit {
            return Ok(LocalTarget::File {
                path: path.to_path_buf(),
                format,
            });
        }
        match OutputFormat::from_extension(&path.to_string_lossy()) {
            Some(format) => Ok(LocalTarget::File {
                path: path.to_path_buf(),
                format,
            }),
            None => {
                let mut appended = path.as_os_str().to_owned();
                appended.push(".csv");
                Ok(LocalTarget::File {
                    path: PathBuf::from(appended),
                    format: OutputFormat::Csv,
                })
            }
        }
    }

    /// Encoding used for this target.
    pub fn format(&self) -> OutputFormat {
        match self {
            LocalTarget::Stdout(format) => *format,
            LocalTarget::File { format, .. } => *format,
        }
    }
}

impl fmt::Display for LocalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalTarget::Stdout(_) => f.write_str("<stdout>"),
            LocalTarget::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}
