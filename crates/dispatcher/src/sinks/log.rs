//! LogSink - logs collection summary via tracing

use contracts::{ContractError, FeatureCollection, FeatureSink};
use tracing::{debug, info, instrument};

/// Sink that logs the collection for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_collection_summary(&self, collection: &FeatureCollection) {
        info!(
            sink = %self.name,
            features = collection.len(),
            "FeatureCollection received"
        );

        for (rank, feature) in collection.features.iter().enumerate() {
            debug!(
                sink = %self.name,
                rank = rank + 1,
                latitude = feature.properties.latitude,
                longitude = feature.properties.longitude,
                acq_date = %feature.properties.acq_date,
                acq_time = %feature.properties.acq_time,
                "Feature"
            );
        }
    }
}

impl FeatureSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, collection),
        fields(sink = %self.name, features = collection.len())
    )]
    async fn write(&mut self, collection: &FeatureCollection) -> Result<(), ContractError> {
        self.log_collection_summary(collection);
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
