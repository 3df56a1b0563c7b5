//! ---
//! tdg_section: "01-core-functionality"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Configuration model and discovery for the dataset generator."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;

use crate::logging::LogFormat;

fn default_sites() -> i64 {
    100
}

fn default_chunks() -> i64 {
    50
}

fn default_output_path() -> Option<PathBuf> {
    Some(PathBuf::from("telecom_data.csv"))
}

fn default_upload_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_fallback_to_local() -> bool {
    true
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Accepted vendor modifier values. The upper bound keeps the drop-rate factor
/// `1.1 - modifier` positive.
pub const VENDOR_MODIFIER_RANGE: RangeInclusive<f64> = 0.98..=1.05;

/// Default locations inspected when no explicit configuration path is supplied.
pub const DEFAULT_CONFIG_CANDIDATES: [&str; 2] = ["tdg.toml", "configs/tdg.toml"];

/// Primary configuration object for the generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "TDG_CONFIG";

    /// Load configuration from disk, respecting the `TDG_CONFIG` override.
    ///
    /// Unlike a daemon, the generator is usable without any configuration file, so
    /// when no candidate exists the defaults are returned with `source: None`.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        debug!(
            inspected = %candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            "no configuration file found, using defaults"
        );
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    /// Load and validate a configuration file at an explicit path.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.upload.validate()?;
        self.profile.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Dataset dimensions and seeding.
///
/// Counts stay signed so that negative values reach the generator and are reported
/// as invalid arguments rather than as opaque parse failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_sites")]
    pub sites: i64,
    #[serde(default = "default_chunks")]
    pub chunks: i64,
    #[serde(default)]
    pub seed: Option<i64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            sites: default_sites(),
            chunks: default_chunks(),
            seed: None,
        }
    }
}

/// Local output destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: Option<PathBuf>,
    /// Explicit encoding name (`csv` or `json`) when the extension is ambiguous.
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: None,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Pre-signed object-storage URL receiving the encoded dataset via HTTP PUT.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_upload_timeout")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timeout: Duration,
    #[serde(default = "default_fallback_to_local")]
    pub fallback_to_local: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: default_upload_timeout(),
            fallback_to_local: default_fallback_to_local(),
        }
    }
}

impl UploadConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            if url.trim().is_empty() {
                return Err(anyhow!("upload url cannot be empty"));
            }
            url::Url::parse(url).with_context(|| format!("invalid upload url {url}"))?;
        }
        if self.timeout.is_zero() {
            return Err(anyhow!("upload timeout must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the rolling log file. File logging is disabled when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

/// Per-technology baseline override. Omitted fields keep the built-in value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BaselineOverride {
    #[serde(default)]
    pub rssi: Option<f64>,
    #[serde(default)]
    pub latency: Option<f64>,
    #[serde(default)]
    pub data_volume: Option<f64>,
}

/// Overrides applied on top of the built-in generation profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub baselines: IndexMap<String, BaselineOverride>,
    #[serde(default)]
    pub vendor_modifiers: IndexMap<String, f64>,
}

impl ProfileConfig {
    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty() && self.vendor_modifiers.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        for (vendor, modifier) in &self.vendor_modifiers {
            if !VENDOR_MODIFIER_RANGE.contains(modifier) {
                return Err(anyhow!(
                    "vendor modifier for '{}' must lie in [{}, {}], got {}",
                    vendor,
                    VENDOR_MODIFIER_RANGE.start(),
                    VENDOR_MODIFIER_RANGE.end(),
                    modifier
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_document_uses_defaults() {
        let config: AppConfig = "".parse().unwrap();
        assert_eq!(config.generation.sites, 100);
        assert_eq!(config.generation.chunks, 50);
        assert!(config.generation.seed.is_none());
        assert_eq!(config.output.path, Some(PathBuf::from("telecom_data.csv")));
        assert!(config.upload.url.is_none());
        assert!(config.upload.fallback_to_local);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.profile.is_empty());
    }

    #[test]
    fn parses_full_document() {
        let config: AppConfig = r#"
            [generation]
            sites = 5
            chunks = 24
            seed = 42

            [output]
            path = "out/data.json"

            [upload]
            url = "https://storage.example.com/bucket/data.csv?sig=abc"
            timeout = 15
            fallback_to_local = false

            [logging]
            format = "structured-json"

            [profile.baselines.5G]
            latency = 20.0

            [profile.vendor_modifiers]
            Nokia = 1.03
        "#
        .parse()
        .unwrap();
        assert_eq!(config.generation.sites, 5);
        assert_eq!(config.generation.seed, Some(42));
        assert_eq!(config.upload.timeout, Duration::from_secs(15));
        assert!(!config.upload.fallback_to_local);
        assert_eq!(config.logging.format, LogFormat::StructuredJson);
        let five_g = config.profile.baselines.get("5G").unwrap();
        assert_eq!(five_g.latency, Some(20.0));
        assert!(five_g.rssi.is_none());
        assert_eq!(config.profile.vendor_modifiers.get("Nokia"), Some(&1.03));
    }

    #[test]
    fn negative_counts_survive_parsing() {
        let config: AppConfig = "[generation]\nsites = -1\n".parse().unwrap();
        assert_eq!(config.generation.sites, -1);
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = "[upload]\ntimeout = 0\n".parse::<AppConfig>().unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn rejects_malformed_upload_url() {
        assert!("[upload]\nurl = \"not a url\"\n".parse::<AppConfig>().is_err());
        assert!("[upload]\nurl = \"  \"\n".parse::<AppConfig>().is_err());
    }

    #[test]
    fn rejects_vendor_modifier_outside_range() {
        let err = "[profile.vendor_modifiers]\nHuawei = 0.0\n"
            .parse::<AppConfig>()
            .unwrap_err();
        assert!(err.to_string().contains("Huawei"));
        assert!("[profile.vendor_modifiers]\nNokia = 3.0\n"
            .parse::<AppConfig>()
            .is_err());
        assert!("[profile.vendor_modifiers]\nNokia = 1.06\n"
            .parse::<AppConfig>()
            .is_err());
        assert!("[profile.vendor_modifiers]\nNokia = nan\n"
            .parse::<AppConfig>()
            .is_err());
        assert!("[profile.vendor_modifiers]\nNokia = 0.98\nSamsung = 1.05\n"
            .parse::<AppConfig>()
            .is_ok());
    }

    #[test]
    fn load_falls_back_to_defaults_without_candidates() {
        let loaded = AppConfig::load_with_source(&["/definitely/missing/tdg.toml"]).unwrap();
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.generation.sites, 100);
    }

    #[test]
    fn load_reads_first_existing_candidate() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[generation]\nsites = 7").unwrap();
        file.flush().unwrap();
        let loaded =
            AppConfig::load_with_source(&[Path::new("/missing/tdg.toml"), file.path()]).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(file.path()));
        assert_eq!(loaded.config.generation.sites, 7);
    }
}
