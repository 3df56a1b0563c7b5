//! ---
//! tdg_section: "03-persistence-export"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Save orchestration across upload and local sinks."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tdg_sim::{MetricRecord, COLUMNS};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::encode::{encode, write_records};
use crate::format::{LocalTarget, OutputFormat};
use crate::upload::{UploadTarget, Uploader};
use crate::{ExportError, Result};

/// Where a finished table should go.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Local file or stdout.
    pub local: Option<LocalTarget>,
    /// Object-storage destination, tried first when present.
    pub upload: Option<UploadTarget>,
    /// Write to `local` when the upload fails.
    pub fallback_to_local: bool,
}

/// What [`save_dataset`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to a local target.
    Written {
        /// Destination written.
        target: LocalTarget,
        /// Number of data rows.
        rows: usize,
    },
    /// Uploaded to object storage.
    Uploaded {
        /// Redacted destination URL.
        url: String,
        /// Encoding used for the body.
        format: OutputFormat,
        /// Number of data rows.
        rows: usize,
    },
    /// The upload failed and the same rows were written locally instead.
    FellBack {
        /// Destination written.
        target: LocalTarget,
        /// Number of data rows.
        rows: usize,
        /// Rendered upload failure.
        upload_error: String,
    },
}

/// Produce `path` through a temporary file in the same directory.
///
/// `fill` writes the whole body; the temporary file replaces `path` only when
/// it returns `Ok`. On error the temporary file is removed and any previous
/// file at `path` is left untouched.
pub fn write_file<T, F>(path: &Path, fill: F) -> Result<T>
where
    F: FnOnce(&mut dyn Write) -> Result<T>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut writer = BufWriter::new(NamedTempFile::new_in(dir)?);
    let value = fill(&mut writer)?;
    let temp = writer.into_inner().map_err(|err| err.into_error())?;
    debug!(temp = %temp.path().display(), path = %path.display(), "persisting output");
    temp.persist(path).map_err(|err| err.error)?;
    Ok(value)
}

/// Write `records` to a local target.
pub fn write_local(target: &LocalTarget, records: &[MetricRecord]) -> Result<()> {
    match target {
        LocalTarget::Stdout(format) => write_records(io::stdout().lock(), *format, records),
        LocalTarget::File { path, format } => {
            write_file(path, |out| write_records(out, *format, records))
        }
    }
}

fn upload<U: Uploader + ?Sized>(
    uploader: &U,
    target: &UploadTarget,
    records: &[MetricRecord],
) -> Result<OutputFormat> {
    let format = target.format();
    let body = encode(format, records)?;
    uploader.upload(target, format, body)?;
    Ok(format)
}

/// Deliver `records` according to `options`.
///
/// The upload, when configured, is attempted once. On failure the rows are
/// written locally if `fallback_to_local` is set and a local target exists;
/// otherwise the upload error is returned.
pub fn save_dataset<U: Uploader + ?Sized>(
    records: &[MetricRecord],
    options: &SaveOptions,
    uploader: &U,
) -> Result<SaveOutcome> {
    let rows = records.len();
    let outcome = match (&options.upload, &options.local) {
        (Some(target), local) => match upload(uploader, target, records) {
            Ok(format) => SaveOutcome::Uploaded {
                url: target.redacted(),
                format,
                rows,
            },
            Err(err) => match local {
                Some(local) if options.fallback_to_local => {
                    warn!(
                        url = %target.redacted(),
                        error = %err,
                        fallback = %local,
                        "upload failed, falling back to local file"
                    );
                    write_local(local, records)?;
                    SaveOutcome::FellBack {
                        target: local.clone(),
                        rows,
                        upload_error: err.to_string(),
                    }
                }
                _ => return Err(err),
            },
        },
        (None, Some(local)) => {
            write_local(local, records)?;
            SaveOutcome::Written {
                target: local.clone(),
                rows,
            }
        }
        (None, None) => return Err(ExportError::NoDestination),
    };

    let destination = match &outcome {
        SaveOutcome::Uploaded { url, .. } => url.clone(),
        SaveOutcome::Written { target, .. } | SaveOutcome::FellBack { target, .. } => {
            target.to_string()
        }
    };
    info!(%destination, rows, columns = COLUMNS.len(), "dataset saved");
    Ok(outcome)
}
