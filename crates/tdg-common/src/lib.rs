//! ---
//! tdg_section: "01-core-functionality"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Shared primitives and utilities for the dataset generator."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
//! Shared primitives for the telecom dataset generator workspace.
//! This crate exposes configuration loading, tracing setup and version
//! metadata consumed by the generator library and its CLI.

pub mod config;
pub mod logging;
pub mod version;

pub use config::{
    AppConfig, BaselineOverride, GenerationConfig, LoadedAppConfig, LoggingConfig, OutputConfig,
    ProfileConfig, UploadConfig, DEFAULT_CONFIG_CANDIDATES, VENDOR_MODIFIER_RANGE,
};
pub use logging::{init_tracing, LogFormat};
pub use version::VersionInfo;
