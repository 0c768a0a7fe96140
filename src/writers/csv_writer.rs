use crate::error::Result;
use crate::store::{ResultTable, TableName};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Reads and writes result tables as headed CSV
#[derive(Debug, Clone, Default)]
pub struct CsvTableWriter;

impl CsvTableWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write one table. The header is always written, so an empty table still
    /// produces a file with its column names.
    pub fn write_table(&self, table: &ResultTable, path: &Path) -> Result<()> {
        self.write_to(table, File::create(path)?, usize::MAX)
    }

    /// Write at most `limit` rows of a table, header included, to any writer
    pub fn write_to<W: Write>(&self, table: &ResultTable, out: W, limit: usize) -> Result<()> {
        let columns = table.name().columns();
        match table {
            ResultTable::AnnualGlobalAvg(rows) => write_rows(columns, rows, out, limit),
            ResultTable::AnnualRegionalAvg(rows) => write_rows(columns, rows, out, limit),
            ResultTable::SeasonalAvg(rows) => write_rows(columns, rows, out, limit),
            ResultTable::DecadalAvg(rows) => write_rows(columns, rows, out, limit),
            ResultTable::ExtremeCounts(rows) => write_rows(columns, rows, out, limit),
            ResultTable::ProcessedData(rows) => write_rows(columns, rows, out, limit),
        }
    }

    pub fn read_table(&self, name: TableName, path: &Path) -> Result<ResultTable> {
        let table = match name {
            TableName::AnnualGlobalAvg => ResultTable::AnnualGlobalAvg(read_rows(path)?),
            TableName::AnnualRegionalAvg => ResultTable::AnnualRegionalAvg(read_rows(path)?),
            TableName::SeasonalAvg => ResultTable::SeasonalAvg(read_rows(path)?),
            TableName::DecadalAvg => ResultTable::DecadalAvg(read_rows(path)?),
            TableName::ExtremeCounts => ResultTable::ExtremeCounts(read_rows(path)?),
            TableName::ProcessedData => ResultTable::ProcessedData(read_rows(path)?),
        };
        Ok(table)
    }
}

fn write_rows<T: Serialize, W: Write>(
    columns: &[&str],
    rows: &[T],
    out: W,
    limit: usize,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    writer.write_record(columns)?;
    for row in rows.iter().take(limit) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
