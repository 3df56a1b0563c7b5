//! ---
//! tdg_section: "11-simulation"
//! tdg_subsection: "01-bootstrap"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Dataset generation module exports and shared types."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
//! Synthetic telecom network performance data.
//!
//! Generation runs in two strictly sequential stages that share one seeded
//! [`RandomSource`]: the [`SiteRegistryBuilder`] draws static per-site metadata,
//! then the [`TimeSeriesSynthesizer`] derives one [`MetricRecord`] per site and
//! hour from the [`GenerationProfile`] tables plus noise. [`DatasetGenerator`]
//! wires both together.

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod profile;
pub mod random;
pub mod record;
pub mod registry;
pub mod summary;
pub mod synth;

pub use catalog::{Region, Technology, Vendor};
pub use dataset::{DatasetGenerator, GenerationRequest, TelecomDataset};
pub use error::{GenerationError, Result};
pub use profile::{GenerationProfile, TechnologyBaseline};
pub use random::{RandomSource, MAX_SEED};
pub use record::{MetricRecord, COLUMNS};
pub use registry::{Site, SiteRegistryBuilder};
pub use summary::{describe, ColumnSummary};
pub use synth::{traffic_multiplier, MetricStream, TimeSeriesSynthesizer};
