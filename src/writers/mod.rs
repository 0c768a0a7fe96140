pub mod csv_writer;
pub mod parquet_writer;
pub mod result_writer;

pub use csv_writer::CsvTableWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
pub use result_writer::ResultWriter;
