//! # Merge Engine
//!
//! Spatial deduplication of fire detections.
//!
//! Responsibilities:
//! - Resolve merge sensitivity to a rounding precision
//! - Drop records outside the region of interest
//! - Group records by rounded coordinate key, keeping the earliest member
//! - Rank clusters for reporting
//!
//! Everything here is synchronous and in-memory; one call to
//! [`MergeEngine::run`] processes one run's dataset to completion.
//!
//! ## Usage Example
//!
//! ```ignore
//! use merge_engine::{MergeConfig, MergeEngine};
//!
//! let engine = MergeEngine::new(MergeConfig {
//!     sensitivity: 3,
//!     region: Some(config.country_bounding_box),
//! })?;
//!
//! let outcome = engine.run(batch.records);
//! println!("merged {} into {}", outcome.retained_records, outcome.cluster_count());
//! ```

mod aggregator;
mod engine;
mod error;
mod filter;
mod precision;
mod ranker;

// Re-exports
pub use aggregator::ClusterAggregator;
pub use engine::{MergeConfig, MergeEngine, MergeOutcome};
pub use error::MergeError;
pub use filter::RegionFilter;
pub use precision::{
    resolve_precision, DistanceThreshold, Precision, Sensitivity, DEFAULT_SENSITIVITY,
    MAX_SENSITIVITY,
};
pub use ranker::{compare, rank, report_rows};

// Re-export contracts types
pub use contracts::{Cluster, ClusterKey, RepresentativePoint, ReportRow};
