//! ---
//! tdg_section: "11-simulation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Descriptive statistics for previewing generated tables."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use serde::Serialize;
use statrs::statistics::Statistics;

use crate::record::MetricRecord;

type Extractor = fn(&MetricRecord) -> f64;

const NUMERIC_COLUMNS: [(&str, Extractor); 7] = [
    ("rssi_dbm", |r: &MetricRecord| r.rssi_dbm),
    ("latency_ms", |r: &MetricRecord| r.latency_ms),
    ("data_volume_mb", |r: &MetricRecord| r.data_volume_mb),
    ("drop_rate_percent", |r: &MetricRecord| r.drop_rate_percent),
    ("cpu_usage_percent", |r: &MetricRecord| r.cpu_usage_percent),
    ("latitude", |r: &MetricRecord| r.latitude),
    ("longitude", |r: &MetricRecord| r.longitude),
];

/// Quantile of ascending `sorted` values, interpolating linearly between the
/// two closest ranks (position `q * (n - 1)`). `sorted` must be non-empty.
fn linear_quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Summary of one numeric column. Statistics are NaN for an empty table, and `std`
/// (sample standard deviation) is NaN for a single row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: &'static str,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn from_values(column: &'static str, values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self {
                column,
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                p25: f64::NAN,
                median: f64::NAN,
                p75: f64::NAN,
                max: f64::NAN,
            };
        }
        let count = values.len();
        let mean = Statistics::mean(values.iter());
        let std = Statistics::std_dev(values.iter());
        let min = Statistics::min(values.iter());
        let max = Statistics::max(values.iter());
        let mut sorted = values;
        sorted.sort_by(f64::total_cmp);
        Self {
            column,
            count,
            mean,
            std,
            min,
            p25: linear_quantile(&sorted, 0.25),
            median: linear_quantile(&sorted, 0.5),
            p75: linear_quantile(&sorted, 0.75),
            max,
        }
    }
}

/// Summaries for every numeric output column, in column order.
pub fn describe(records: &[MetricRecord]) -> Vec<ColumnSummary> {
    NUMERIC_COLUMNS
        .iter()
        .map(|(column, extract)| {
            ColumnSummary::from_values(*column, records.iter().map(*extract).collect())
        })
        .collect()
}
