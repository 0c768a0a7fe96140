use crate::config::OutputFormat;
use crate::error::Result;
use crate::store::ResultStore;
use crate::writers::{CsvTableWriter, ParquetWriter};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Persists every table of a store, one blocking task per table
pub struct ResultWriter {
    format: OutputFormat,
    parquet: ParquetWriter,
}

impl ResultWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            parquet: ParquetWriter::new(),
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.parquet = self.parquet.with_compression(compression)?;
        Ok(self)
    }

    /// Write all available tables into `dir`, creating it if needed.
    ///
    /// Returns the written paths in table order. The first failing table fails
    /// the whole write.
    pub async fn write_all(&self, store: &ResultStore, dir: &Path) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(dir).await?;

        let mut handles: Vec<JoinHandle<Result<Vec<PathBuf>>>> = Vec::new();

        for name in store.available() {
            let table = store.get(name)?;
            let dir = dir.to_path_buf();
            let format = self.format;
            let parquet = self.parquet.clone();

            handles.push(tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
                let mut written = Vec::new();

                if format.writes_csv() {
                    let path = dir.join(name.file_name("csv"));
                    CsvTableWriter::new().write_table(&table, &path)?;
                    written.push(path);
                }

                if format.writes_parquet() {
                    let path = dir.join(name.file_name("parquet"));
                    parquet.write_table(&table, &path)?;
                    written.push(path);
                }

                debug!(table = %name, rows = table.len(), "Wrote result table");
                Ok(written)
            }));
        }

        let mut paths = Vec::new();
        for handle in handles {
            paths.extend(handle.await??);
        }

        info!(
            dir = %dir.display(),
            files = paths.len(),
            "Saved result tables"
        );

        Ok(paths)
    }
}
