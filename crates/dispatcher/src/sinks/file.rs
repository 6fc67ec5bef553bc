//! GeoJsonFileSink - writes the feature collection to disk atomically

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use contracts::{ContractError, FeatureCollection, FeatureSink};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, instrument};

use crate::error::DispatcherError;

/// Sink that writes the collection as pretty-printed GeoJSON
///
/// The document is serialized in memory, written to a temporary file next to
/// the destination, flushed, then renamed over it. A failed write leaves any
/// existing destination untouched.
pub struct GeoJsonFileSink {
    name: String,
    path: PathBuf,
    written: bool,
}

impl GeoJsonFileSink {
    /// Create a sink for `path`
    ///
    /// # Errors
    /// `SinkCreation` if the destination is a directory
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self, DispatcherError> {
        let name = name.into();
        let path = path.into();
        if path.is_dir() {
            return Err(DispatcherError::sink_creation(
                &name,
                format!("{} is a directory", path.display()),
            ));
        }
        Ok(Self {
            name,
            path,
            written: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn persist(&self, document: &[u8]) -> Result<(), DispatcherError> {
        let mut staged = NamedTempFile::new_in(self.staging_dir())?;
        staged.write_all(document)?;
        staged.write_all(b"\n")?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|e| DispatcherError::Io(e.error))?;
        Ok(())
    }

    fn write_collection(&mut self, collection: &FeatureCollection) -> Result<(), DispatcherError> {
        let document = serde_json::to_vec_pretty(collection)?;
        self.persist(&document)?;
        self.written = true;
        info!(
            sink = %self.name,
            path = %self.path.display(),
            features = collection.len(),
            bytes = document.len(),
            "Feature collection written"
        );
        Ok(())
    }
}

impl FeatureSink for GeoJsonFileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_write",
        skip(self, collection),
        fields(sink = %self.name, features = collection.len())
    )]
    async fn write(&mut self, collection: &FeatureCollection) -> Result<(), ContractError> {
        self.write_collection(collection).map_err(|e| {
            error!(sink = %self.name, path = %self.path.display(), error = %e, "Write failed");
            ContractError::sink_write(&self.name, e.to_string())
        })
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        if self.written && !fs::metadata(&self.path).is_ok_and(|m| m.is_file()) {
            return Err(ContractError::sink_write(
                &self.name,
                format!("{} vanished after write", self.path.display()),
            ));
        }
        debug!(sink = %self.name, "GeoJsonFileSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::{Feature, FireProperties, Geometry};
    use tempfile::tempdir;

    fn collection() -> FeatureCollection {
        FeatureCollection::new(vec![Feature::new(
            Geometry::point(9.1688, -79.5373),
            FireProperties {
                latitude: 9.1688,
                longitude: -79.5373,
                acq_date: NaiveDate::from_ymd_opt(2020, 12, 13).unwrap(),
                acq_time: "0636".parse().unwrap(),
            },
        )])
    }

    #[tokio::test]
    async fn test_file_sink_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fires.geojson");

        let mut sink = GeoJsonFileSink::new("geojson", &path).unwrap();
        sink.write(&collection()).await.unwrap();
        sink.close().await.unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let back: FeatureCollection = serde_json::from_str(&text).unwrap();
        assert_eq!(back, collection());

        // Only the destination remains; the staging file was renamed
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fires.geojson");
        fs::write(&path, "stale").unwrap();

        let mut sink = GeoJsonFileSink::new("geojson", &path).unwrap();
        sink.write(&FeatureCollection::default()).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_missing_parent_fails_without_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/fires.geojson");

        let mut sink = GeoJsonFileSink::new("geojson", &path).unwrap();
        let err = sink.write(&collection()).await.unwrap_err();
        assert!(matches!(err, ContractError::SinkWrite { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_directory_destination_rejected() {
        let dir = tempdir().unwrap();
        let result = GeoJsonFileSink::new("geojson", dir.path());
        assert!(matches!(result, Err(DispatcherError::SinkCreation { .. })));
    }
}
