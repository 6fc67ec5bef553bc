//! FeatureSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{ContractError, FeatureCollection};

/// Feature collection output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(FeatureSink: Send)]
pub trait LocalFeatureSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write the complete, ranked collection
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, collection: &FeatureCollection) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
