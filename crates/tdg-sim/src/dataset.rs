//! ---
//! tdg_section: "11-simulation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "End-to-end dataset generation and the in-memory table."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use chrono::{Local, NaiveDateTime};
use tdg_common::config::GenerationConfig;
use tracing::info;

use crate::error::{GenerationError, Result};
use crate::profile::GenerationProfile;
use crate::random::RandomSource;
use crate::record::MetricRecord;
use crate::registry::{Site, SiteRegistryBuilder};
use crate::summary::{describe, ColumnSummary};
use crate::synth::{MetricStream, TimeSeriesSynthesizer};

/// Inputs for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub num_sites: i64,
    pub num_time_chunks: i64,
    pub seed: Option<i64>,
}

impl GenerationRequest {
    pub fn new(num_sites: i64, num_time_chunks: i64) -> Self {
        Self {
            num_sites,
            num_time_chunks,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject negative counts before any random draw happens.
    pub fn validate(&self) -> Result<()> {
        if self.num_sites < 0 {
            return Err(GenerationError::invalid(
                "num_sites",
                format!("must be non-negative, got {}", self.num_sites),
            ));
        }
        if self.num_time_chunks < 0 {
            return Err(GenerationError::invalid(
                "num_time_chunks",
                format!("must be non-negative, got {}", self.num_time_chunks),
            ));
        }
        Ok(())
    }
}

impl From<&GenerationConfig> for GenerationRequest {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            num_sites: config.sites,
            num_time_chunks: config.chunks,
            seed: config.seed,
        }
    }
}

/// The generated site registry and its metric table, held in memory until export.
#[derive(Debug, Clone, PartialEq)]
pub struct TelecomDataset {
    generated_at: NaiveDateTime,
    sites: Vec<Site>,
    records: Vec<MetricRecord>,
}

impl TelecomDataset {
    pub fn generated_at(&self) -> NaiveDateTime {
        self.generated_at
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `n` records, or fewer when the table is shorter.
    pub fn head(&self, n: usize) -> &[MetricRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Count, mean, spread and quartiles for each numeric column.
    pub fn describe(&self) -> Vec<ColumnSummary> {
        describe(&self.records)
    }

    pub fn into_records(self) -> Vec<MetricRecord> {
        self.records
    }
}

/// Runs the registry builder and the synthesizer against one profile.
#[derive(Debug, Clone, Default)]
pub struct DatasetGenerator {
    profile: GenerationProfile,
}

impl DatasetGenerator {
    pub fn new(profile: GenerationProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &GenerationProfile {
        &self.profile
    }

    /// Generate anchored at the current local time.
    pub fn generate(&self, request: &GenerationRequest) -> Result<TelecomDataset> {
        self.generate_at(request, Local::now().naive_local())
    }

    /// Generate anchored at `now`. With a seed, equal inputs give equal datasets.
    pub fn generate_at(
        &self,
        request: &GenerationRequest,
        now: NaiveDateTime,
    ) -> Result<TelecomDataset> {
        self.with_stream(request, now, |sites, stream| {
            let records = stream.collect::<Result<Vec<_>>>()?;
            Ok(TelecomDataset {
                generated_at: now,
                sites: sites.to_vec(),
                records,
            })
        })
    }

    /// Build the registry, then hand it and a lazy record stream to `consume`.
    ///
    /// Lets a sink encode rows as they are produced instead of buffering the table.
    pub fn with_stream<T, E, F>(
        &self,
        request: &GenerationRequest,
        now: NaiveDateTime,
        consume: F,
    ) -> std::result::Result<T, E>
    where
        E: From<GenerationError>,
        F: FnOnce(&[Site], MetricStream<'_, RandomSource>) -> std::result::Result<T, E>,
    {
        request.validate()?;
        let mut rng = RandomSource::new(request.seed)?;
        info!(
            sites = request.num_sites,
            chunks = request.num_time_chunks,
            seed = ?rng.seed(),
            "generating telecom dataset"
        );

        let sites = SiteRegistryBuilder::new(now).build(request.num_sites, &mut rng)?;
        let synthesizer = TimeSeriesSynthesizer::new(&self.profile)?;
        let stream = synthesizer.stream(&sites, request.num_time_chunks, now, &mut rng)?;
        let output = consume(&sites, stream)?;
        info!(
            records = sites.len() * request.num_time_chunks as usize,
            "dataset generated"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn anchor() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn validate_rejects_negative_counts() {
        assert!(GenerationRequest::new(-1, 5).validate().is_err());
        assert!(GenerationRequest::new(5, -1).validate().is_err());
        assert!(GenerationRequest::new(0, 0).validate().is_ok());
    }

    #[test]
    fn negative_chunks_fail_before_any_site_is_built() {
        let generator = DatasetGenerator::default();
        let err = generator
            .generate_at(&GenerationRequest::new(3, -2), anchor())
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidArgument {
                name: "num_time_chunks",
                ..
            }
        ));
    }

    #[test]
    fn invalid_seed_is_a_random_source_error() {
        let generator = DatasetGenerator::default();
        let err = generator
            .generate_at(&GenerationRequest::new(1, 1).with_seed(-5), anchor())
            .unwrap_err();
        assert!(matches!(err, GenerationError::RandomSource(_)));
    }

    #[test]
    fn head_is_bounded_by_table_length() {
        let generator = DatasetGenerator::default();
        let dataset = generator
            .generate_at(&GenerationRequest::new(2, 3).with_seed(1), anchor())
            .unwrap();
        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.head(4).len(), 4);
        assert_eq!(dataset.head(100).len(), 6);
        assert_eq!(dataset.sites().len(), 2);
        assert_eq!(dataset.generated_at(), anchor());
    }

    #[test]
    fn request_from_config_copies_fields() {
        let config = GenerationConfig {
            sites: 12,
            chunks: 48,
            seed: Some(9),
        };
        let request = GenerationRequest::from(&config);
        assert_eq!(request, GenerationRequest::new(12, 48).with_seed(9));
    }

    #[test]
    fn with_stream_exposes_registry_before_records() {
        let generator = DatasetGenerator::default();
        let count = generator
            .with_stream::<_, GenerationError, _>(
                &GenerationRequest::new(3, 4).with_seed(2),
                anchor(),
                |sites, stream| {
                    assert_eq!(sites.len(), 3);
                    Ok(stream.count())
                },
            )
            .unwrap();
        assert_eq!(count, 12);
    }
}
