//! # Ingestion
//!
//! Fire-detection source ingestion module.
//!
//! Responsibilities:
//! - Refresh the local CSV cache over HTTP (optional, per run)
//! - Decode cached CSV feeds into `DetectionRecord`
//! - Skip and count malformed rows
//! - Concatenate all sources into one provenance-tagged batch
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{download_sources, DownloadConfig, HttpFetcher, SourceSet};
//!
//! let policy = DownloadConfig::from(&config);
//! let fetcher = HttpFetcher::new(&policy)?;
//! download_sources(&fetcher, &config.csv_urls, &config.csv_output_directory, &policy).await?;
//!
//! let batch = SourceSet::discover(&config.csv_output_directory)?.load()?;
//! println!("{} records", batch.records.len());
//! ```

mod config;
mod csv_reader;
mod error;
mod fetch;
mod source_set;

// Re-exports
pub use config::{DownloadConfig, DownloadReport, IngestionStats, SourceStats};
pub use contracts::DetectionRecord;
pub use csv_reader::{parse_row, ColumnLayout, CsvRecordReader};
pub use error::{IngestionError, Result};
pub use fetch::{download_sources, HttpFetcher};
pub use source_set::{IngestedBatch, SourceSet};
