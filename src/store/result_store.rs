use crate::error::{ProcessingError, Result};
use crate::models::{
    AnnualGlobalAverage, AnnualRegionalAverage, DecadalRegionalAverage, EnrichedRecord,
    ExtremeEventCount, SeasonalAverage,
};
use crate::processors::TrendTables;
use crate::writers::CsvTableWriter;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableName {
    AnnualGlobalAvg,
    AnnualRegionalAvg,
    SeasonalAvg,
    DecadalAvg,
    ExtremeCounts,
    ProcessedData,
}

impl TableName {
    pub const ALL: [TableName; 6] = [
        TableName::AnnualGlobalAvg,
        TableName::AnnualRegionalAvg,
        TableName::SeasonalAvg,
        TableName::DecadalAvg,
        TableName::ExtremeCounts,
        TableName::ProcessedData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::AnnualGlobalAvg => "annual_global_avg",
            TableName::AnnualRegionalAvg => "annual_regional_avg",
            TableName::SeasonalAvg => "seasonal_avg",
            TableName::DecadalAvg => "decadal_avg",
            TableName::ExtremeCounts => "extreme_counts",
            TableName::ProcessedData => "processed_data",
        }
    }

    /// Persisted column order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            TableName::AnnualGlobalAvg => &["year", "temperature_c", "temp_anomaly"],
            TableName::AnnualRegionalAvg => &[
                "year",
                "region",
                "temperature_c",
                "baseline_temp",
                "temp_anomaly",
            ],
            TableName::SeasonalAvg => &["year", "season", "temperature_c"],
            TableName::DecadalAvg => &["decade", "region", "temperature_c"],
            TableName::ExtremeCounts => &["decade", "region", "extreme_hot", "extreme_cold"],
            TableName::ProcessedData => &[
                "station_id",
                "year",
                "month",
                "temperature",
                "temperature_c",
                "date",
                "season",
                "latitude",
                "longitude",
                "elevation",
                "name",
                "country",
                "region",
                "decade",
            ],
        }
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.as_str(), extension)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        TableName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "Unknown table '{}'. Expected one of: {}",
                    s,
                    TableName::ALL.map(|n| n.as_str()).join(", ")
                ))
            })
    }
}

/// One built result table
#[derive(Debug, Clone, PartialEq)]
pub enum ResultTable {
    AnnualGlobalAvg(Vec<AnnualGlobalAverage>),
    AnnualRegionalAvg(Vec<AnnualRegionalAverage>),
    SeasonalAvg(Vec<SeasonalAverage>),
    DecadalAvg(Vec<DecadalRegionalAverage>),
    ExtremeCounts(Vec<ExtremeEventCount>),
    ProcessedData(Vec<EnrichedRecord>),
}

impl ResultTable {
    pub fn name(&self) -> TableName {
        match self {
            ResultTable::AnnualGlobalAvg(_) => TableName::AnnualGlobalAvg,
            ResultTable::AnnualRegionalAvg(_) => TableName::AnnualRegionalAvg,
            ResultTable::SeasonalAvg(_) => TableName::SeasonalAvg,
            ResultTable::DecadalAvg(_) => TableName::DecadalAvg,
            ResultTable::ExtremeCounts(_) => TableName::ExtremeCounts,
            ResultTable::ProcessedData(_) => TableName::ProcessedData,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultTable::AnnualGlobalAvg(rows) => rows.len(),
            ResultTable::AnnualRegionalAvg(rows) => rows.len(),
            ResultTable::SeasonalAvg(rows) => rows.len(),
            ResultTable::DecadalAvg(rows) => rows.len(),
            ResultTable::ExtremeCounts(rows) => rows.len(),
            ResultTable::ProcessedData(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable, name-addressed collection of the tables produced by one run.
///
/// Tables are shared behind `Arc`, so consumers get read-only views that can
/// outlive a borrow of the store. A table that was never built is reported as
/// `ResultNotAvailable`, never as an empty table.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    tables: BTreeMap<TableName, Arc<ResultTable>>,
}

impl ResultStore {
    /// Store holding every table of a completed run
    pub fn from_run(
        trends: TrendTables,
        extreme_counts: Vec<ExtremeEventCount>,
        processed: Vec<EnrichedRecord>,
    ) -> Self {
        Self::from_tables([
            ResultTable::AnnualGlobalAvg(trends.annual_global),
            ResultTable::AnnualRegionalAvg(trends.annual_regional),
            ResultTable::SeasonalAvg(trends.seasonal),
            ResultTable::DecadalAvg(trends.decadal),
            ResultTable::ExtremeCounts(extreme_counts),
            ResultTable::ProcessedData(processed),
        ])
    }

    pub fn from_tables(tables: impl IntoIterator<Item = ResultTable>) -> Self {
        let tables = tables
            .into_iter()
            .map(|table| (table.name(), Arc::new(table)))
            .collect();
        Self { tables }
    }

    /// Reload whichever persisted CSV tables exist in `dir`.
    ///
    /// Missing files leave their table unavailable; a directory with none of
    /// the tables is `DataUnavailable`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let reader = CsvTableWriter::new();
        let mut tables = Vec::new();

        for name in TableName::ALL {
            let path = dir.join(name.file_name("csv"));
            if path.exists() {
                let table = reader.read_table(name, &path)?;
                debug!(table = %name, rows = table.len(), "Loaded result table");
                tables.push(table);
            }
        }

        if tables.is_empty() {
            return Err(ProcessingError::DataUnavailable(format!(
                "No result tables found in {}. Run the analysis first.",
                dir.display()
            )));
        }

        info!(
            dir = %dir.display(),
            tables = tables.len(),
            "Loaded persisted result tables"
        );

        Ok(Self::from_tables(tables))
    }

    /// Shared read-only view of one table
    pub fn get(&self, name: TableName) -> Result<Arc<ResultTable>> {
        self.tables
            .get(&name)
            .cloned()
            .ok_or_else(|| not_available(name))
    }

    pub fn contains(&self, name: TableName) -> bool {
        self.tables.contains_key(&name)
    }

    pub fn available(&self) -> Vec<TableName> {
        self.tables.keys().copied().collect()
    }

    pub fn tables(&self) -> impl Iterator<Item = &ResultTable> {
        self.tables.values().map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn annual_global_avg(&self) -> Result<&[AnnualGlobalAverage]> {
        match self.table(TableName::AnnualGlobalAvg)? {
            ResultTable::AnnualGlobalAvg(rows) => Ok(rows),
            _ => Err(not_available(TableName::AnnualGlobalAvg)),
        }
    }

    pub fn annual_regional_avg(&self) -> Result<&[AnnualRegionalAverage]> {
        match self.table(TableName::AnnualRegionalAvg)? {
            ResultTable::AnnualRegionalAvg(rows) => Ok(rows),
            _ => Err(not_available(TableName::AnnualRegionalAvg)),
        }
    }

    pub fn seasonal_avg(&self) -> Result<&[SeasonalAverage]> {
        match self.table(TableName::SeasonalAvg)? {
            ResultTable::SeasonalAvg(rows) => Ok(rows),
            _ => Err(not_available(TableName::SeasonalAvg)),
        }
    }

    pub fn decadal_avg(&self) -> Result<&[DecadalRegionalAverage]> {
        match self.table(TableName::DecadalAvg)? {
            ResultTable::DecadalAvg(rows) => Ok(rows),
            _ => Err(not_available(TableName::DecadalAvg)),
        }
    }

    pub fn extreme_counts(&self) -> Result<&[ExtremeEventCount]> {
        match self.table(TableName::ExtremeCounts)? {
            ResultTable::ExtremeCounts(rows) => Ok(rows),
            _ => Err(not_available(TableName::ExtremeCounts)),
        }
    }

    pub fn processed_data(&self) -> Result<&[EnrichedRecord]> {
        match self.table(TableName::ProcessedData)? {
            ResultTable::ProcessedData(rows) => Ok(rows),
            _ => Err(not_available(TableName::ProcessedData)),
        }
    }

    fn table(&self, name: TableName) -> Result<&ResultTable> {
        self.tables
            .get(&name)
            .map(|t| t.as_ref())
            .ok_or_else(|| not_available(name))
    }
}

fn not_available(name: TableName) -> ProcessingError {
    ProcessingError::ResultNotAvailable {
        table: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;

    fn counts() -> Vec<ExtremeEventCount> {
        vec![ExtremeEventCount {
            decade: 1990,
            region: Region::Northern,
            extreme_hot: 3,
            extreme_cold: 1,
        }]
    }

    #[test]
    fn test_empty_store_reports_not_available() {
        let store = ResultStore::default();

        for name in TableName::ALL {
            match store.get(name) {
                Err(ProcessingError::ResultNotAvailable { table }) => {
                    assert_eq!(table, name.as_str())
                }
                other => panic!("expected ResultNotAvailable for {}, got {:?}", name, other),
            }
        }
        assert!(matches!(
            store.annual_global_avg(),
            Err(ProcessingError::ResultNotAvailable { .. })
        ));
    }

    #[test]
    fn test_partial_store_does_not_substitute_empty_tables() {
        let store = ResultStore::from_tables([ResultTable::ExtremeCounts(counts())]);

        assert_eq!(store.extreme_counts().unwrap(), counts().as_slice());
        assert!(store.contains(TableName::ExtremeCounts));
        assert!(!store.contains(TableName::DecadalAvg));
        assert!(matches!(
            store.decadal_avg(),
            Err(ProcessingError::ResultNotAvailable { .. })
        ));
        assert_eq!(store.available(), vec![TableName::ExtremeCounts]);
    }

    #[test]
    fn test_built_empty_table_is_available() {
        let store = ResultStore::from_run(TrendTables::default(), Vec::new(), Vec::new());

        assert_eq!(store.available().len(), 6);
        assert!(store.seasonal_avg().unwrap().is_empty());
        assert!(store.get(TableName::ProcessedData).unwrap().is_empty());
    }

    #[test]
    fn test_shared_view_outlives_borrow() {
        let view = {
            let store = ResultStore::from_tables([ResultTable::ExtremeCounts(counts())]);
            store.get(TableName::ExtremeCounts).unwrap()
        };
        assert_eq!(view.len(), 1);
        assert_eq!(view.name(), TableName::ExtremeCounts);
    }

    #[test]
    fn test_table_name_parsing() {
        assert_eq!(
            "decadal_avg".parse::<TableName>().unwrap(),
            TableName::DecadalAvg
        );
        assert!(matches!(
            "decadal".parse::<TableName>(),
            Err(ProcessingError::InvalidFormat(_))
        ));
        for name in TableName::ALL {
            assert_eq!(name.as_str().parse::<TableName>().unwrap(), name);
        }
    }

    #[test]
    fn test_load_dir_without_tables() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ResultStore::load_dir(dir.path()),
            Err(ProcessingError::DataUnavailable(_))
        ));
    }
}
