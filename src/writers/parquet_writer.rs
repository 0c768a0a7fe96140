use crate::error::{ProcessingError, Result};
use crate::models::{
    AnnualGlobalAverage, AnnualRegionalAverage, DecadalRegionalAverage, EnrichedRecord,
    ExtremeEventCount, SeasonalAverage,
};
use crate::store::{ResultTable, TableName};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write one result table to a Parquet file.
    ///
    /// An empty table still produces a file carrying the table's schema.
    pub fn write_table(&self, table: &ResultTable, path: &Path) -> Result<()> {
        let schema = Self::create_schema(table.name());

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        if !table.is_empty() {
            let batch = Self::table_to_batch(table, schema)?;
            writer.write(&batch)?;
        }
        writer.close()?;

        Ok(())
    }

    /// Arrow schema of a result table, in persisted column order
    pub fn create_schema(name: TableName) -> Arc<Schema> {
        let fields = match name {
            TableName::AnnualGlobalAvg => vec![
                Field::new("year", DataType::Int32, false),
                Field::new("temperature_c", DataType::Float64, false),
                Field::new("temp_anomaly", DataType::Float64, false),
            ],
            TableName::AnnualRegionalAvg => vec![
                Field::new("year", DataType::Int32, false),
                Field::new("region", DataType::Utf8, false),
                Field::new("temperature_c", DataType::Float64, false),
                // Null when the region has no baseline data
                Field::new("baseline_temp", DataType::Float64, true),
                Field::new("temp_anomaly", DataType::Float64, true),
            ],
            TableName::SeasonalAvg => vec![
                Field::new("year", DataType::Int32, false),
                Field::new("season", DataType::Utf8, false),
                Field::new("temperature_c", DataType::Float64, false),
            ],
            TableName::DecadalAvg => vec![
                Field::new("decade", DataType::Int32, false),
                Field::new("region", DataType::Utf8, false),
                Field::new("temperature_c", DataType::Float64, false),
            ],
            TableName::ExtremeCounts => vec![
                Field::new("decade", DataType::Int32, false),
                Field::new("region", DataType::Utf8, false),
                Field::new("extreme_hot", DataType::UInt64, false),
                Field::new("extreme_cold", DataType::UInt64, false),
            ],
            TableName::ProcessedData => vec![
                Field::new("station_id", DataType::Utf8, false),
                Field::new("year", DataType::Int32, false),
                Field::new("month", DataType::UInt32, false),
                Field::new("temperature", DataType::Int32, false),
                Field::new("temperature_c", DataType::Float64, false),
                Field::new("date", DataType::Date32, false),
                Field::new("season", DataType::Utf8, false),
                Field::new("latitude", DataType::Float64, false),
                Field::new("longitude", DataType::Float64, false),
                Field::new("elevation", DataType::Float64, false),
                Field::new("name", DataType::Utf8, false),
                Field::new("country", DataType::Utf8, false),
                Field::new("region", DataType::Utf8, false),
                Field::new("decade", DataType::Int32, false),
            ],
        };

        Arc::new(Schema::new(fields))
    }

    fn table_to_batch(table: &ResultTable, schema: Arc<Schema>) -> Result<RecordBatch> {
        let columns = match table {
            ResultTable::AnnualGlobalAvg(rows) => annual_global_columns(rows),
            ResultTable::AnnualRegionalAvg(rows) => annual_regional_columns(rows),
            ResultTable::SeasonalAvg(rows) => seasonal_columns(rows),
            ResultTable::DecadalAvg(rows) => decadal_columns(rows),
            ResultTable::ExtremeCounts(rows) => extreme_columns(rows),
            ResultTable::ProcessedData(rows) => processed_columns(rows),
        };

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            let rg_metadata = metadata.row_group(i);
            row_group_sizes.push(rg_metadata.num_rows());
        }

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

fn annual_global_columns(rows: &[AnnualGlobalAverage]) -> Vec<ArrayRef> {
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let temps: Vec<f64> = rows.iter().map(|r| r.temperature_c).collect();
    let anomalies: Vec<f64> = rows.iter().map(|r| r.temp_anomaly).collect();

    vec![
        Arc::new(Int32Array::from(years)),
        Arc::new(Float64Array::from(temps)),
        Arc::new(Float64Array::from(anomalies)),
    ]
}

fn annual_regional_columns(rows: &[AnnualRegionalAverage]) -> Vec<ArrayRef> {
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
    let temps: Vec<f64> = rows.iter().map(|r| r.temperature_c).collect();
    let baselines: Vec<Option<f64>> = rows.iter().map(|r| r.baseline_temp).collect();
    let anomalies: Vec<Option<f64>> = rows.iter().map(|r| r.temp_anomaly).collect();

    vec![
        Arc::new(Int32Array::from(years)),
        Arc::new(StringArray::from(regions)),
        Arc::new(Float64Array::from(temps)),
        Arc::new(Float64Array::from(baselines)),
        Arc::new(Float64Array::from(anomalies)),
    ]
}

fn seasonal_columns(rows: &[SeasonalAverage]) -> Vec<ArrayRef> {
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let seasons: Vec<&str> = rows.iter().map(|r| r.season.as_str()).collect();
    let temps: Vec<f64> = rows.iter().map(|r| r.temperature_c).collect();

    vec![
        Arc::new(Int32Array::from(years)),
        Arc::new(StringArray::from(seasons)),
        Arc::new(Float64Array::from(temps)),
    ]
}

fn decadal_columns(rows: &[DecadalRegionalAverage]) -> Vec<ArrayRef> {
    let decades: Vec<i32> = rows.iter().map(|r| r.decade).collect();
    let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
    let temps: Vec<f64> = rows.iter().map(|r| r.temperature_c).collect();

    vec![
        Arc::new(Int32Array::from(decades)),
        Arc::new(StringArray::from(regions)),
        Arc::new(Float64Array::from(temps)),
    ]
}

fn extreme_columns(rows: &[ExtremeEventCount]) -> Vec<ArrayRef> {
    let decades: Vec<i32> = rows.iter().map(|r| r.decade).collect();
    let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
    let hot: Vec<u64> = rows.iter().map(|r| r.extreme_hot).collect();
    let cold: Vec<u64> = rows.iter().map(|r| r.extreme_cold).collect();

    vec![
        Arc::new(Int32Array::from(decades)),
        Arc::new(StringArray::from(regions)),
        Arc::new(UInt64Array::from(hot)),
        Arc::new(UInt64Array::from(cold)),
    ]
}

fn processed_columns(rows: &[EnrichedRecord]) -> Vec<ArrayRef> {
    let epoch = NaiveDate::default();

    let station_ids: Vec<&str> = rows.iter().map(|r| r.station_id.as_str()).collect();
    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let months: Vec<u32> = rows.iter().map(|r| r.month).collect();
    let tenths: Vec<i32> = rows.iter().map(|r| r.temperature).collect();
    let temps: Vec<f64> = rows.iter().map(|r| r.temperature_c).collect();
    // Date32 counts days since the Unix epoch
    let dates: Vec<i32> = rows
        .iter()
        .map(|r| r.date.signed_duration_since(epoch).num_days() as i32)
        .collect();
    let seasons: Vec<&str> = rows.iter().map(|r| r.season.as_str()).collect();
    let latitudes: Vec<f64> = rows.iter().map(|r| r.latitude).collect();
    let longitudes: Vec<f64> = rows.iter().map(|r| r.longitude).collect();
    let elevations: Vec<f64> = rows.iter().map(|r| r.elevation).collect();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    let countries: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
    let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
    let decades: Vec<i32> = rows.iter().map(|r| r.decade).collect();

    vec![
        Arc::new(StringArray::from(station_ids)),
        Arc::new(Int32Array::from(years)),
        Arc::new(UInt32Array::from(months)),
        Arc::new(Int32Array::from(tenths)),
        Arc::new(Float64Array::from(temps)),
        Arc::new(Date32Array::from(dates)),
        Arc::new(StringArray::from(seasons)),
        Arc::new(Float64Array::from(latitudes)),
        Arc::new(Float64Array::from(longitudes)),
        Arc::new(Float64Array::from(elevations)),
        Arc::new(StringArray::from(names)),
        Arc::new(StringArray::from(countries)),
        Arc::new(StringArray::from(regions)),
        Arc::new(Int32Array::from(decades)),
    ]
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
            avg_rows
        )
    }
}
