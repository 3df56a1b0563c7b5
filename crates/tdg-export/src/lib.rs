//! ---
//! tdg_section: "03-persistence-export"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Dataset encoders, local sinks and object-storage upload."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
#![warn(missing_docs)]
//! Export side of the generator. Nothing in here mutates or regenerates a
//! table: every sink receives the records by reference, so a failed upload
//! can fall back to a local write of the very same rows.

/// Result alias used throughout the export crate.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error type for encoding and delivering datasets.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Wrapper for IO errors encountered while writing output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Wrapper for CSV encoding issues.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Wrapper for JSON encoding issues.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Failure assembling the Arrow record batch.
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    /// Failure writing the Parquet file.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// Transport-level failure while uploading.
    #[error("upload failed: {0}")]
    Upload(#[from] reqwest::Error),
    /// The object store answered with a non-success status.
    #[error("upload to {url} rejected with status {status}")]
    UploadStatus {
        /// Destination URL with the query string removed.
        url: String,
        /// HTTP status code returned by the store.
        status: u16,
    },
    /// The upload destination could not be parsed.
    #[error("invalid upload target: {0}")]
    InvalidTarget(String),
    /// The requested encoding is not available.
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
    /// Neither a local path nor an upload target was configured.
    #[error("no output destination specified (local file or upload url)")]
    NoDestination,
    /// Generation failed while rows were being streamed to a sink.
    #[error(transparent)]
    Generation(#[from] tdg_sim::GenerationError),
}

pub mod encode;
pub mod format;
pub mod save;
pub mod upload;

pub use encode::{arrow_schema, encode, record_batch, write_records, write_stream};
pub use format::{LocalTarget, OutputFormat};
pub use save::{save_dataset, write_file, write_local, SaveOptions, SaveOutcome};
pub use upload::{HttpUploader, UploadTarget, Uploader};
