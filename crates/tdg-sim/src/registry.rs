//! ---
//! tdg_section: "11-simulation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Static site metadata generation."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use std::ops::{Range, RangeInclusive};

use chrono::{Days, NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{Region, Technology, Vendor};
use crate::error::{GenerationError, Result};
use crate::record::round_to;

pub const LATITUDE_RANGE: Range<f64> = 25.0..49.0;
pub const LONGITUDE_RANGE: Range<f64> = -125.0..-66.0;
/// Installation age in days relative to the generation time.
pub const INSTALL_AGE_DAYS: RangeInclusive<u64> = 30..=1825;
const COORDINATE_DECIMALS: i32 = 6;

/// A simulated telecom installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub site_id: String,
    pub region: Region,
    pub technology: Technology,
    pub vendor: Vendor,
    pub latitude: f64,
    pub longitude: f64,
    pub installation_date: NaiveDate,
}

/// `SITE_0001` style identifier; wider numbers keep all their digits.
pub fn site_id(ordinal: usize) -> String {
    format!("SITE_{ordinal:04}")
}

fn pick<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> T {
    items[rng.gen_range(0..items.len())]
}

/// Produces the ordered site registry for a run.
#[derive(Debug, Clone, Copy)]
pub struct SiteRegistryBuilder {
    now: NaiveDateTime,
}

impl SiteRegistryBuilder {
    /// `now` anchors every installation date.
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Build `num_sites` sites numbered `SITE_0001..`.
    ///
    /// Draw order per site is region, technology, vendor, latitude, longitude,
    /// installation age. Changing it changes every seeded dataset.
    pub fn build<R: Rng + ?Sized>(&self, num_sites: i64, rng: &mut R) -> Result<Vec<Site>> {
        let count = usize::try_from(num_sites).map_err(|_| {
            GenerationError::invalid("num_sites", format!("must be non-negative, got {num_sites}"))
        })?;

        let today = self.now.date();
        let mut sites = Vec::with_capacity(count);
        for ordinal in 1..=count {
            let region = pick(Region::ALL, rng);
            let technology = pick(Technology::ALL, rng);
            let vendor = pick(Vendor::ALL, rng);
            let latitude = round_to(rng.gen_range(LATITUDE_RANGE), COORDINATE_DECIMALS);
            let longitude = round_to(rng.gen_range(LONGITUDE_RANGE), COORDINATE_DECIMALS);
            let age = rng.gen_range(INSTALL_AGE_DAYS);
            let installation_date = today.checked_sub_days(Days::new(age)).ok_or_else(|| {
                GenerationError::invalid("now", format!("{today} minus {age} days is out of range"))
            })?;
            sites.push(Site {
                site_id: site_id(ordinal),
                region,
                technology,
                vendor,
                latitude,
                longitude,
                installation_date,
            });
        }

        info!(sites = sites.len(), "site registry built");
        Ok(sites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomSource;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn site_ids_are_dense_and_padded() {
        assert_eq!(site_id(1), "SITE_0001");
        assert_eq!(site_id(42), "SITE_0042");
        assert_eq!(site_id(12345), "SITE_12345");
    }

    #[test]
    fn builds_requested_number_of_sites() {
        let mut rng = RandomSource::seeded(7).unwrap();
        let sites = SiteRegistryBuilder::new(anchor()).build(25, &mut rng).unwrap();
        assert_eq!(sites.len(), 25);
        let ids: HashSet<_> = sites.iter().map(|s| s.site_id.clone()).collect();
        assert_eq!(ids.len(), 25);
        for (idx, site) in sites.iter().enumerate() {
            assert_eq!(site.site_id, site_id(idx + 1));
        }
    }

    #[test]
    fn attributes_stay_within_bounds() {
        let now = anchor();
        let mut rng = RandomSource::seeded(99).unwrap();
        let sites = SiteRegistryBuilder::new(now).build(200, &mut rng).unwrap();
        for site in &sites {
            assert!((25.0..=49.0).contains(&site.latitude), "{}", site.latitude);
            assert!((-125.0..=-66.0).contains(&site.longitude), "{}", site.longitude);
            let age = (now.date() - site.installation_date).num_days();
            assert!((30..=1825).contains(&age), "age {age}");
            let scaled = site.latitude * 1e6;
            assert!((scaled - scaled.round()).abs() < 1e-3);
        }
    }

    #[test]
    fn zero_sites_is_empty_not_an_error() {
        let mut rng = RandomSource::seeded(1).unwrap();
        let sites = SiteRegistryBuilder::new(anchor()).build(0, &mut rng).unwrap();
        assert!(sites.is_empty());
    }

    #[test]
    fn negative_sites_is_invalid() {
        let mut rng = RandomSource::seeded(1).unwrap();
        let err = SiteRegistryBuilder::new(anchor())
            .build(-1, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidArgument {
                name: "num_sites",
                ..
            }
        ));
    }

    #[test]
    fn same_seed_same_registry() {
        let builder = SiteRegistryBuilder::new(anchor());
        let a = builder
            .build(10, &mut RandomSource::seeded(42).unwrap())
            .unwrap();
        let b = builder
            .build(10, &mut RandomSource::seeded(42).unwrap())
            .unwrap();
        assert_eq!(a, b);
    }
}
