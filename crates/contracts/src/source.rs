//! SourceFetcher trait - Ingestion input interface
//!
//! Abstracts the transport used to refresh cached source files so that the
//! download step can be exercised without network access.

use std::path::Path;

use bytes::Bytes;
use url::Url;

use crate::ContractError;

/// One downloaded source file
#[derive(Debug, Clone)]
pub struct FetchedSource {
    /// Requested URL
    pub url: String,

    /// Cache file name, see [`cache_file_name`]
    pub file_name: String,

    /// Raw body
    pub body: Bytes,
}

/// Source transport trait
#[trait_variant::make(SourceFetcher: Send)]
pub trait LocalSourceFetcher {
    /// Fetch a single URL
    ///
    /// # Errors
    /// Returns `ContractError::SourceFetch` on transport failure or a
    /// non-success status
    async fn fetch(&self, url: &str) -> Result<FetchedSource, ContractError>;
}

/// Local cache file name for a source URL
///
/// The last non-empty path segment of an `http(s)` URL, with `.csv` appended
/// when the segment does not already end in it. The URL is parsed the same
/// way the HTTP client parses it, so dot segments are resolved and query
/// strings and fragments are ignored.
pub fn cache_file_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let segment = parsed.path_segments()?.rev().find(|s| !s.is_empty())?;

    let has_csv_extension = Path::new(segment)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if has_csv_extension {
        Some(segment.to_string())
    } else {
        Some(format!("{segment}.csv"))
    }
}
