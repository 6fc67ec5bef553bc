//! Download policy and ingestion statistics

use std::time::Duration;

use contracts::{FireFinderConfig, SourceTag};

/// Download policy
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Per-request timeout
    pub timeout: Duration,

    /// Keep going when some (but not all) sources fail
    pub allow_partial: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            allow_partial: false,
        }
    }
}

impl DownloadConfig {
    /// Create download policy
    pub fn new(timeout: Duration, allow_partial: bool) -> Self {
        Self {
            timeout,
            allow_partial,
        }
    }
}

impl From<&FireFinderConfig> for DownloadConfig {
    fn from(config: &FireFinderConfig) -> Self {
        Self::new(
            Duration::from_secs(config.download_timeout_secs),
            config.allow_partial_download,
        )
    }
}

/// Per-source read statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStats {
    /// Provenance tag
    pub source: SourceTag,

    /// Data rows seen (header excluded)
    pub rows: u64,

    /// Records produced
    pub records: u64,

    /// Malformed rows skipped
    pub skipped: u64,
}

impl SourceStats {
    pub fn new(source: SourceTag) -> Self {
        Self {
            source,
            rows: 0,
            records: 0,
            skipped: 0,
        }
    }
}

/// Statistics over all sources of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionStats {
    pub sources: Vec<SourceStats>,
}

impl IngestionStats {
    /// Total data rows seen
    pub fn rows(&self) -> u64 {
        self.sources.iter().map(|s| s.rows).sum()
    }

    /// Total records produced
    pub fn records(&self) -> u64 {
        self.sources.iter().map(|s| s.records).sum()
    }

    /// Total malformed rows skipped
    pub fn skipped(&self) -> u64 {
        self.sources.iter().map(|s| s.skipped).sum()
    }
}

/// Result of a download run
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Files written, as `(url, file name)`
    pub written: Vec<(String, String)>,

    /// URLs that failed
    pub failed: Vec<String>,

    /// Stale cached files removed
    pub pruned: Vec<String>,
}
