//! Dispatcher - fan-out of the final collection to sinks

use std::path::PathBuf;

use contracts::{ContractError, FeatureCollection, FeatureSink};
use tracing::{info, instrument};

use crate::error::DispatcherError;
use crate::sinks::{GeoJsonFileSink, LogSink};

/// Kind of sink to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkType {
    /// Atomic GeoJSON file at `path`
    File { path: PathBuf },
    /// tracing output only
    Log,
}

/// Sink configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    pub name: String,
    pub sink_type: SinkType,
}

impl SinkConfig {
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            sink_type: SinkType::File { path: path.into() },
        }
    }

    pub fn log(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sink_type: SinkType::Log,
        }
    }
}

/// Closed set of sinks the dispatcher can drive
pub enum AnySink {
    File(GeoJsonFileSink),
    Log(LogSink),
}

impl FeatureSink for AnySink {
    fn name(&self) -> &str {
        match self {
            Self::File(sink) => sink.name(),
            Self::Log(sink) => sink.name(),
        }
    }

    async fn write(&mut self, collection: &FeatureCollection) -> Result<(), ContractError> {
        match self {
            Self::File(sink) => sink.write(collection).await,
            Self::Log(sink) => sink.write(collection).await,
        }
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        match self {
            Self::File(sink) => sink.close().await,
            Self::Log(sink) => sink.close().await,
        }
    }
}

/// Create a sink from configuration
#[instrument(
    name = "dispatcher_create_sink",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
pub fn create_sink(config: &SinkConfig) -> Result<AnySink, DispatcherError> {
    match &config.sink_type {
        SinkType::Log => Ok(AnySink::Log(LogSink::new(&config.name))),
        SinkType::File { path } => GeoJsonFileSink::new(&config.name, path).map(AnySink::File),
    }
}

/// Writes one collection to every configured sink, in order
///
/// A batch run produces exactly one collection, so sinks are driven
/// sequentially and the first failure aborts the dispatch.
pub struct Dispatcher {
    sinks: Vec<AnySink>,
}

impl Dispatcher {
    /// Create a dispatcher with prebuilt sinks
    pub fn with_sinks(sinks: Vec<AnySink>) -> Self {
        Self { sinks }
    }

    /// Build every sink from configuration
    ///
    /// # Errors
    /// `SinkCreation` for the first sink that cannot be created
    pub fn from_configs(configs: &[SinkConfig]) -> Result<Self, DispatcherError> {
        let sinks = configs.iter().map(create_sink).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { sinks })
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    /// Write `collection` to all sinks, then close them
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, collection),
        fields(sinks = self.sinks.len(), features = collection.len())
    )]
    pub async fn dispatch(mut self, collection: &FeatureCollection) -> Result<usize, DispatcherError> {
        for sink in &mut self.sinks {
            sink.write(collection).await?;
        }
        for sink in &mut self.sinks {
            sink.close().await?;
        }
        info!(sinks = self.sinks.len(), "Dispatch complete");
        Ok(self.sinks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_dispatcher_fanout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.geojson");

        let dispatcher = Dispatcher::from_configs(&[
            SinkConfig::log("console"),
            SinkConfig::file("geojson", &path),
        ])
        .unwrap();
        assert_eq!(dispatcher.sink_names(), vec!["console", "geojson"]);

        let written = dispatcher.dispatch(&FeatureCollection::default()).await.unwrap();
        assert_eq!(written, 2);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_dispatch_failure_propagates() {
        let dir = tempdir().unwrap();
        let dispatcher = Dispatcher::from_configs(&[SinkConfig::file(
            "geojson",
            dir.path().join("missing/out.geojson"),
        )])
        .unwrap();

        let err = dispatcher.dispatch(&FeatureCollection::default()).await.unwrap_err();
        assert!(matches!(err, DispatcherError::Contract(ContractError::SinkWrite { .. })));
    }

    #[test]
    fn test_create_sink_rejects_directory() {
        let dir = tempdir().unwrap();
        let result = create_sink(&SinkConfig::file("geojson", dir.path()));
        assert!(matches!(result, Err(DispatcherError::SinkCreation { .. })));
    }
}
