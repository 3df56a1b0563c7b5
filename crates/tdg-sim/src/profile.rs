//! ---
//! tdg_section: "11-simulation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Static technology baselines and vendor modifiers."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use indexmap::IndexMap;
use serde::Serialize;
use tdg_common::config::{ProfileConfig, VENDOR_MODIFIER_RANGE};
use tracing::debug;

use crate::catalog::{Technology, Vendor};
use crate::error::{GenerationError, Result};

/// Nominal performance for a technology tier before vendor skew and noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TechnologyBaseline {
    pub rssi: f64,
    pub latency: f64,
    pub data_volume: f64,
}

impl TechnologyBaseline {
    pub const fn new(rssi: f64, latency: f64, data_volume: f64) -> Self {
        Self {
            rssi,
            latency,
            data_volume,
        }
    }
}

const DEFAULT_BASELINES: [(Technology, TechnologyBaseline); 5] = [
    (Technology::G4, TechnologyBaseline::new(-85.0, 45.0, 500.0)),
    (Technology::G5, TechnologyBaseline::new(-80.0, 25.0, 1200.0)),
    (Technology::G6, TechnologyBaseline::new(-75.0, 15.0, 2500.0)),
    (Technology::G7, TechnologyBaseline::new(-70.0, 8.0, 5000.0)),
    (Technology::G8, TechnologyBaseline::new(-65.0, 5.0, 8000.0)),
];

const DEFAULT_VENDOR_MODIFIERS: [(Vendor, f64); 4] = [
    (Vendor::Ericsson, 1.05),
    (Vendor::Nokia, 1.02),
    (Vendor::Huawei, 0.98),
    (Vendor::Samsung, 1.01),
];

/// Read-only lookup tables shared by the registry builder and the synthesizer.
///
/// Built once at start-up and handed out by reference; nothing mutates a profile
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationProfile {
    baselines: IndexMap<Technology, TechnologyBaseline>,
    vendor_modifiers: IndexMap<Vendor, f64>,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self {
            baselines: DEFAULT_BASELINES.into_iter().collect(),
            vendor_modifiers: DEFAULT_VENDOR_MODIFIERS.into_iter().collect(),
        }
    }
}

impl GenerationProfile {
    /// Build a profile from explicit tables. Missing entries are allowed here and
    /// surface as [`GenerationError::Lookup`] when a site needs them.
    pub fn from_tables(
        baselines: IndexMap<Technology, TechnologyBaseline>,
        vendor_modifiers: IndexMap<Vendor, f64>,
    ) -> Self {
        Self {
            baselines,
            vendor_modifiers,
        }
    }

    /// Overlay configuration overrides onto the built-in tables.
    pub fn with_overrides(overrides: &ProfileConfig) -> Result<Self> {
        let mut profile = Self::default();
        for (name, patch) in &overrides.baselines {
            let tech: Technology = name
                .parse()
                .map_err(|reason| GenerationError::invalid("profile.baselines", reason))?;
            let entry = profile
                .baselines
                .entry(tech)
                .or_insert(TechnologyBaseline::new(0.0, 0.0, 0.0));
            if let Some(rssi) = patch.rssi {
                entry.rssi = rssi;
            }
            if let Some(latency) = patch.latency {
                entry.latency = latency;
            }
            if let Some(data_volume) = patch.data_volume {
                entry.data_volume = data_volume;
            }
            debug!(technology = %tech, baseline = ?entry, "baseline override applied");
        }
        for (name, modifier) in &overrides.vendor_modifiers {
            let vendor: Vendor = name
                .parse()
                .map_err(|reason| GenerationError::invalid("profile.vendor_modifiers", reason))?;
            if !VENDOR_MODIFIER_RANGE.contains(modifier) {
                return Err(GenerationError::invalid(
                    "profile.vendor_modifiers",
                    format!(
                        "modifier for {vendor} must lie in [{}, {}], got {modifier}",
                        VENDOR_MODIFIER_RANGE.start(),
                        VENDOR_MODIFIER_RANGE.end()
                    ),
                ));
            }
            profile.vendor_modifiers.insert(vendor, *modifier);
            debug!(vendor = %vendor, modifier, "vendor modifier override applied");
        }
        Ok(profile)
    }

    pub fn baseline(&self, technology: Technology) -> Result<TechnologyBaseline> {
        self.baselines
            .get(&technology)
            .copied()
            .ok_or_else(|| GenerationError::Lookup {
                table: "technology baseline",
                key: technology.to_string(),
            })
    }

    pub fn vendor_modifier(&self, vendor: Vendor) -> Result<f64> {
        self.vendor_modifiers
            .get(&vendor)
            .copied()
            .ok_or_else(|| GenerationError::Lookup {
                table: "vendor modifier",
                key: vendor.to_string(),
            })
    }
}
