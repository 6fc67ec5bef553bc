//! Source download and local cache refresh
//!
//! Each downloaded file is staged in a temporary file inside the cache
//! directory and renamed into place, so an interrupted refresh never leaves a
//! truncated CSV behind.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::Path;

use contracts::{cache_file_name, ContractError, FetchedSource, SourceFetcher};
use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

use crate::config::{DownloadConfig, DownloadReport};
use crate::error::{IngestionError, Result};

/// HTTP transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the policy's per-request timeout
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IngestionError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchedSource, ContractError> {
        let file_name = cache_file_name(url)
            .ok_or_else(|| ContractError::source_fetch(url, "cannot derive file name"))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ContractError::source_fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContractError::source_fetch(url, format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ContractError::source_fetch(url, e.to_string()))?;

        Ok(FetchedSource {
            url: url.to_string(),
            file_name,
            body,
        })
    }
}

/// Refresh the local cache from every configured URL
///
/// Cached `.csv` files that do not correspond to any configured URL are
/// removed afterwards. Files for URLs that failed this time are kept.
///
/// # Errors
/// - `CacheCollision` when two URLs map to the same cache file
/// - `IncompleteDownload` when any source fails and partial coverage is not
///   allowed, or when every source fails
/// - I/O errors creating the directory or persisting a file
#[instrument(name = "download_sources", skip(fetcher, urls, config), fields(sources = urls.len()))]
pub async fn download_sources<F: SourceFetcher>(
    fetcher: &F,
    urls: &[String],
    directory: &Path,
    config: &DownloadConfig,
) -> Result<DownloadReport> {
    let targets = cache_targets(urls)?;
    fs::create_dir_all(directory)?;

    let mut report = DownloadReport::default();
    for (url, file_name) in urls.iter().zip(&targets) {
        match fetcher.fetch(url).await {
            Ok(source) => {
                persist_source(directory, file_name, &source)?;
                info!(url = %url, file = %file_name, bytes = source.body.len(), "Source downloaded");
                report.written.push((source.url, file_name.clone()));
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Source download failed");
                report.failed.push(url.clone());
            }
        }
    }

    let all_failed = !urls.is_empty() && report.written.is_empty();
    if !report.failed.is_empty() && (!config.allow_partial || all_failed) {
        return Err(IngestionError::IncompleteDownload {
            failed: report.failed.len(),
            total: urls.len(),
            urls: report.failed,
        });
    }

    report.pruned = prune_stale(directory, &targets)?;
    Ok(report)
}

/// Cache file name for every URL, in order
///
/// Two URLs sharing a cache file would overwrite each other, so that is an
/// error before anything is fetched.
fn cache_targets(urls: &[String]) -> Result<Vec<String>> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    let mut targets = Vec::with_capacity(urls.len());
    for url in urls {
        let name = cache_file_name(url)
            .ok_or_else(|| ContractError::source_fetch(url, "cannot derive file name"))?;
        if let Some(first) = owners.insert(name.clone(), url) {
            return Err(IngestionError::CacheCollision {
                file_name: name,
                first: first.to_string(),
                second: url.clone(),
            });
        }
        targets.push(name);
    }
    Ok(targets)
}

/// Write one source atomically into the cache directory
fn persist_source(directory: &Path, file_name: &str, source: &FetchedSource) -> Result<()> {
    let mut staged = NamedTempFile::new_in(directory)?;
    staged.write_all(&source.body)?;
    staged.as_file().sync_all()?;
    staged
        .persist(directory.join(file_name))
        .map_err(|e| IngestionError::Io(e.error))?;
    Ok(())
}

/// Remove cached `.csv` files that are not among `targets`
fn prune_stale(directory: &Path, targets: &[String]) -> Result<Vec<String>> {
    let expected: HashSet<&str> = targets.iter().map(String::as_str).collect();

    let mut pruned = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if !crate::source_set::is_csv(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !expected.contains(name) {
            fs::remove_file(&path)?;
            info!(file = %name, "Removed stale cached source");
            pruned.push(name.to_string());
        }
    }
    pruned.sort();
    Ok(pruned)
}
