//! ---
//! tdg_section: "03-persistence-export"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "CSV, JSON and Parquet encoders for metric tables."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tdg_sim::{GenerationError, MetricRecord, COLUMNS};

use crate::format::OutputFormat;
use crate::Result;

/// Rows per record batch when Parquet output is streamed.
const PARQUET_BATCH_ROWS: usize = 8192;

/// Arrow schema of the metric table, field names and order as in [`COLUMNS`].
///
/// Timestamps are naive (no timezone) with microsecond precision.
pub fn arrow_schema() -> SchemaRef {
    let [timestamp, site_id, region, technology, vendor, numeric @ ..] = COLUMNS;
    let mut fields = vec![
        Field::new(
            timestamp,
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
        Field::new(site_id, DataType::Utf8, false),
        Field::new(region, DataType::Utf8, false),
        Field::new(technology, DataType::Utf8, false),
        Field::new(vendor, DataType::Utf8, false),
    ];
    fields.extend(
        numeric
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false)),
    );
    Arc::new(Schema::new(fields))
}

fn text_column<'a, F>(records: &'a [MetricRecord], value: F) -> ArrayRef
where
    F: Fn(&'a MetricRecord) -> &'a str,
{
    Arc::new(StringArray::from_iter_values(records.iter().map(value)))
}

fn float_column<F>(records: &[MetricRecord], value: F) -> ArrayRef
where
    F: Fn(&MetricRecord) -> f64,
{
    Arc::new(Float64Array::from(
        records.iter().map(value).collect::<Vec<_>>(),
    ))
}

/// Columnar view of `records` matching [`arrow_schema`].
pub fn record_batch(records: &[MetricRecord]) -> Result<RecordBatch> {
    let timestamps: ArrayRef = Arc::new(TimestampMicrosecondArray::from(
        records
            .iter()
            .map(|r| r.timestamp.and_utc().timestamp_micros())
            .collect::<Vec<_>>(),
    ));

    let columns = vec![
        timestamps,
        text_column(records, |r| r.site_id.as_str()),
        text_column(records, |r| r.region.as_str()),
        text_column(records, |r| r.technology.as_str()),
        text_column(records, |r| r.vendor.as_str()),
        float_column(records, |r| r.rssi_dbm),
        float_column(records, |r| r.latency_ms),
        float_column(records, |r| r.data_volume_mb),
        float_column(records, |r| r.drop_rate_percent),
        float_column(records, |r| r.cpu_usage_percent),
        float_column(records, |r| r.latitude),
        float_column(records, |r| r.longitude),
    ];
    Ok(RecordBatch::try_new(arrow_schema(), columns)?)
}

fn parquet_writer<W: Write + Send>(writer: W) -> Result<ArrowWriter<W>> {
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    Ok(ArrowWriter::try_new(writer, arrow_schema(), Some(props))?)
}

/// The Parquet writer needs a `Send` sink, so files are assembled in memory
/// and copied out once the footer is written.
fn parquet_bytes(records: &[MetricRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut parquet = parquet_writer(&mut buffer)?;
    if !records.is_empty() {
        parquet.write(&record_batch(records)?)?;
    }
    parquet.close()?;
    Ok(buffer)
}

/// CSV writer that has already emitted the header row, so empty tables still
/// carry their column names.
fn csv_writer<W: Write>(writer: W) -> Result<csv::Writer<W>> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(COLUMNS)?;
    Ok(csv)
}

/// Encode `records` into `writer`.
pub fn write_records<W: Write>(
    writer: W,
    format: OutputFormat,
    records: &[MetricRecord],
) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut csv = csv_writer(writer)?;
            for record in records {
                csv.serialize(record)?;
            }
            csv.flush()?;
        }
        OutputFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        OutputFormat::Parquet => {
            let mut writer = writer;
            writer.write_all(&parquet_bytes(records)?)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Encode `records` into an in-memory buffer, e.g. as an upload body.
pub fn encode(format: OutputFormat, records: &[MetricRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, format, records)?;
    Ok(buffer)
}

/// Encode rows as they are produced. Returns the number of rows written.
///
/// JSON output is still a single array, written incrementally. Parquet rows are
/// grouped into record batches as they arrive; the finished file reaches
/// `writer` only after the last row, so a failing stream writes nothing.
pub fn write_stream<W, I>(writer: W, format: OutputFormat, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = std::result::Result<MetricRecord, GenerationError>>,
{
    let mut rows = 0usize;
    match format {
        OutputFormat::Csv => {
            let mut csv = csv_writer(writer)?;
            for record in records {
                csv.serialize(record?)?;
                rows += 1;
            }
            csv.flush()?;
        }
        OutputFormat::Json => {
            let mut writer = writer;
            writer.write_all(b"[")?;
            for record in records {
                let record = record?;
                if rows > 0 {
                    writer.write_all(b",")?;
                }
                writer.write_all(b"\n  ")?;
                serde_json::to_writer(&mut writer, &record)?;
                rows += 1;
            }
            if rows > 0 {
                writer.write_all(b"\n")?;
            }
            writer.write_all(b"]\n")?;
            writer.flush()?;
        }
        OutputFormat::Parquet => {
            let mut buffer = Vec::new();
            let mut parquet = parquet_writer(&mut buffer)?;
            let mut pending = Vec::with_capacity(PARQUET_BATCH_ROWS);
            for record in records {
                pending.push(record?);
                if pending.len() == PARQUET_BATCH_ROWS {
                    parquet.write(&record_batch(&pending)?)?;
                    rows += pending.len();
                    pending.clear();
                }
            }
            if !pending.is_empty() {
                parquet.write(&record_batch(&pending)?)?;
                rows += pending.len();
            }
            parquet.close()?;
            let mut writer = writer;
            writer.write_all(&buffer)?;
            writer.flush()?;
        }
    }
    Ok(rows)
}
