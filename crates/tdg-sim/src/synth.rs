//! ---
//! tdg_section: "11-simulation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Hourly metric synthesis for every site in a registry."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};
use tracing::{debug, info};

use crate::error::{GenerationError, Result};
use crate::profile::{GenerationProfile, TechnologyBaseline};
use crate::record::{round_to, MetricRecord};
use crate::registry::Site;

const BUSINESS_HOURS: std::ops::RangeInclusive<u32> = 8..=18;
const BUSINESS_HOURS_FACTOR: f64 = 1.5;
const WEEKDAY_FACTOR: f64 = 1.3;
const PROGRESS_EVERY: usize = 50;

/// Traffic scaling for a timestamp. Business hours and weekdays stack.
pub fn traffic_multiplier(timestamp: NaiveDateTime) -> f64 {
    let mut multiplier = 1.0;
    if BUSINESS_HOURS.contains(&timestamp.hour()) {
        multiplier *= BUSINESS_HOURS_FACTOR;
    }
    if timestamp.weekday().num_days_from_monday() < 5 {
        multiplier *= WEEKDAY_FACTOR;
    }
    multiplier
}

/// Noise distributions, one per metric.
#[derive(Debug, Clone, Copy)]
struct NoiseModel {
    rssi: Normal<f64>,
    latency: Normal<f64>,
    data_volume: Normal<f64>,
    drop_rate: Exp<f64>,
    cpu: Normal<f64>,
}

impl NoiseModel {
    fn new() -> Result<Self> {
        let normal = |sigma: f64| {
            Normal::new(0.0, sigma).map_err(|err| GenerationError::RandomSource(err.to_string()))
        };
        Ok(Self {
            rssi: normal(5.0)?,
            latency: normal(3.0)?,
            data_volume: normal(100.0)?,
            // mean 0.5
            drop_rate: Exp::new(2.0)
                .map_err(|err| GenerationError::RandomSource(err.to_string()))?,
            cpu: normal(10.0)?,
        })
    }
}

/// Derives hourly metrics from a site registry and a [`GenerationProfile`].
#[derive(Debug, Clone)]
pub struct TimeSeriesSynthesizer<'p> {
    profile: &'p GenerationProfile,
    noise: NoiseModel,
}

impl<'p> TimeSeriesSynthesizer<'p> {
    pub fn new(profile: &'p GenerationProfile) -> Result<Self> {
        Ok(Self {
            profile,
            noise: NoiseModel::new()?,
        })
    }

    /// Lazily yield `sites.len() * num_time_chunks` records, grouped by site then
    /// hour. The first hour is `now - num_time_chunks` hours.
    pub fn stream<'a, R: Rng + ?Sized>(
        &'a self,
        sites: &'a [Site],
        num_time_chunks: i64,
        now: NaiveDateTime,
        rng: &'a mut R,
    ) -> Result<MetricStream<'a, R>> {
        let hours = usize::try_from(num_time_chunks).map_err(|_| {
            GenerationError::invalid(
                "num_time_chunks",
                format!("must be non-negative, got {num_time_chunks}"),
            )
        })?;
        let base_time = TimeDelta::try_hours(num_time_chunks)
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| {
                GenerationError::invalid(
                    "num_time_chunks",
                    format!("{num_time_chunks} hours before {now} is out of range"),
                )
            })?;
        Ok(MetricStream {
            synthesizer: self,
            sites,
            hours,
            base_time,
            rng,
            site_index: 0,
            hour: 0,
            current: None,
            halted: false,
        })
    }

    /// Materialise the full record table.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        sites: &[Site],
        num_time_chunks: i64,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<Vec<MetricRecord>> {
        let stream = self.stream(sites, num_time_chunks, now, rng)?;
        let records = stream.collect::<Result<Vec<_>>>()?;
        info!(records = records.len(), "time series synthesized");
        Ok(records)
    }

    fn site_factors(&self, site: &Site) -> Result<(TechnologyBaseline, f64)> {
        let baseline = self.profile.baseline(site.technology)?;
        let vendor_modifier = self.profile.vendor_modifier(site.vendor)?;
        Ok((baseline, vendor_modifier))
    }

    /// Draw order is rssi, latency, data volume, drop rate, cpu. Changing it
    /// changes every seeded dataset.
    fn record<R: Rng + ?Sized>(
        &self,
        site: &Site,
        baseline: &TechnologyBaseline,
        vendor_modifier: f64,
        timestamp: NaiveDateTime,
        rng: &mut R,
    ) -> MetricRecord {
        let traffic = traffic_multiplier(timestamp);

        let rssi =
            (baseline.rssi * vendor_modifier + self.noise.rssi.sample(rng)).clamp(-120.0, -50.0);
        let latency =
            (baseline.latency / vendor_modifier + self.noise.latency.sample(rng)).max(1.0);
        let data_volume = (baseline.data_volume * traffic * vendor_modifier
            + self.noise.data_volume.sample(rng))
        .max(0.0);
        // No floor at zero: modifiers above 1.1 would turn this negative, which the
        // vendor table never produces.
        let drop_rate = (self.noise.drop_rate.sample(rng) * (1.1 - vendor_modifier)).min(20.0);
        let cpu = ((50.0 + 30.0 * traffic + self.noise.cpu.sample(rng)) / vendor_modifier)
            .clamp(0.0, 100.0);

        MetricRecord {
            timestamp,
            site_id: site.site_id.clone(),
            region: site.region,
            technology: site.technology,
            vendor: site.vendor,
            rssi_dbm: round_to(rssi, 2),
            latency_ms: round_to(latency, 2),
            data_volume_mb: round_to(data_volume, 2),
            drop_rate_percent: round_to(drop_rate, 3),
            cpu_usage_percent: round_to(cpu, 1),
            latitude: site.latitude,
            longitude: site.longitude,
        }
    }
}

/// Iterator over synthesized records. Stops after the first error.
pub struct MetricStream<'a, R: Rng + ?Sized> {
    synthesizer: &'a TimeSeriesSynthesizer<'a>,
    sites: &'a [Site],
    hours: usize,
    base_time: NaiveDateTime,
    rng: &'a mut R,
    site_index: usize,
    hour: usize,
    current: Option<(TechnologyBaseline, f64)>,
    halted: bool,
}

impl<'a, R: Rng + ?Sized> MetricStream<'a, R> {
    pub fn base_time(&self) -> NaiveDateTime {
        self.base_time
    }

    fn remaining(&self) -> usize {
        if self.halted || self.site_index >= self.sites.len() {
            return 0;
        }
        (self.sites.len() - self.site_index) * self.hours - self.hour
    }
}

impl<'a, R: Rng + ?Sized> Iterator for MetricStream<'a, R> {
    type Item = Result<MetricRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted || self.hours == 0 {
            return None;
        }
        let sites = self.sites;
        let site = sites.get(self.site_index)?;

        let (baseline, vendor_modifier) = match self.current {
            Some(factors) => factors,
            None => {
                if self.site_index % PROGRESS_EVERY == 0 {
                    debug!(
                        site = self.site_index + 1,
                        total = sites.len(),
                        "synthesizing site"
                    );
                }
                match self.synthesizer.site_factors(site) {
                    Ok(factors) => {
                        self.current = Some(factors);
                        factors
                    }
                    Err(err) => {
                        self.halted = true;
                        return Some(Err(err));
                    }
                }
            }
        };

        // hour < hours, and hours already passed the TimeDelta range check
        let timestamp = self.base_time + TimeDelta::hours(self.hour as i64);
        let record =
            self.synthesizer
                .record(site, &baseline, vendor_modifier, timestamp, &mut *self.rng);

        self.hour += 1;
        if self.hour == self.hours {
            self.hour = 0;
            self.site_index += 1;
            self.current = None;
        }
        Some(Ok(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}
