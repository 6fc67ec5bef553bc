//! Multi-source concatenation with provenance tagging
//!
//! Every cached CSV becomes one tagged source; their records are concatenated
//! into a single uniform batch before the merge engine sees them.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use contracts::{DetectionRecord, SourceTag};
use tracing::{info, instrument};

use crate::config::IngestionStats;
use crate::csv_reader::CsvRecordReader;
use crate::error::{IngestionError, Result};

/// Records from every source, concatenated
#[derive(Debug, Clone, Default)]
pub struct IngestedBatch {
    pub records: Vec<DetectionRecord>,
    pub stats: IngestionStats,
}

/// Ordered set of CSV sources in the cache directory
#[derive(Debug, Clone)]
pub struct SourceSet {
    directory: PathBuf,
    files: Vec<PathBuf>,
}

pub(crate) fn is_csv(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

impl SourceSet {
    /// Discover `.csv` files, sorted by name
    ///
    /// # Errors
    /// - `NoSources` if the directory holds no CSV files
    /// - I/O errors listing the directory
    pub fn discover(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        let mut files = Vec::new();
        for entry in fs::read_dir(&directory)? {
            let path = entry?.path();
            if is_csv(&path) {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(IngestionError::NoSources {
                directory: directory.display().to_string(),
            });
        }

        Ok(Self { directory, files })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Read and concatenate every source
    #[instrument(name = "load_sources", skip(self), fields(directory = %self.directory.display()))]
    pub fn load(&self) -> Result<IngestedBatch> {
        let mut batch = IngestedBatch::default();

        for path in &self.files {
            let tag = SourceTag::new(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            );

            let file = File::open(path)
                .map_err(|e| IngestionError::source_read(tag.as_str(), e.to_string()))?;
            let (records, stats) = CsvRecordReader::new(tag).read(BufReader::new(file))?;

            info!(
                source = %stats.source,
                rows = stats.rows,
                records = stats.records,
                skipped = stats.skipped,
                "Source loaded"
            );

            batch.records.extend(records);
            batch.stats.sources.push(stats);
        }

        Ok(batch)
    }
}
