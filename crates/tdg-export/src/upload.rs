//! ---
//! tdg_section: "03-persistence-export"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Object-storage upload through pre-signed URLs."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};
use url::Url;

use crate::format::OutputFormat;
use crate::{ExportError, Result};

/// Where an encoded dataset is PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Pre-signed object URL. Its query string usually carries credentials.
    pub url: Url,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl UploadTarget {
    /// Parse a URL string into a target.
    pub fn parse(url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| ExportError::InvalidTarget(format!("{url}: {err}")))?;
        Ok(Self { url, timeout })
    }

    /// Encoding implied by the object key; Parquet when the key has no known
    /// extension. The key itself is never rewritten, since that would void a
    /// pre-signed signature.
    pub fn format(&self) -> OutputFormat {
        OutputFormat::from_extension(self.url.path()).unwrap_or(OutputFormat::Parquet)
    }

    /// The URL without its query string, safe to log.
    pub fn redacted(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.to_string()
    }
}

/// Delivers an encoded body to object storage.
pub trait Uploader {
    /// Send `body` to `target`. Implementations must not retry.
    fn upload(&self, target: &UploadTarget, format: OutputFormat, body: Vec<u8>) -> Result<()>;
}

/// [`Uploader`] issuing a single HTTP PUT with a blocking client.
#[derive(Debug, Default, Clone)]
pub struct HttpUploader;

impl Uploader for HttpUploader {
    fn upload(&self, target: &UploadTarget, format: OutputFormat, body: Vec<u8>) -> Result<()> {
        let client = Client::builder().timeout(target.timeout).build()?;
        let bytes = body.len();
        debug!(url = %target.redacted(), bytes, %format, "uploading dataset");
        let response = client
            .put(target.url.clone())
            .header(CONTENT_TYPE, format.content_type())
            .body(body)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::UploadStatus {
                url: target.redacted(),
                status: status.as_u16(),
            });
        }
        info!(url = %target.redacted(), bytes, status = status.as_u16(), "dataset uploaded");
        Ok(())
    }
}
