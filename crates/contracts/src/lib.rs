//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend only on this crate, never on each other's internals.
//!
//! ## Coordinate model
//! - Latitude/longitude are WGS84 decimal degrees (`f64`)
//! - Acquisition timestamps are `(date, HHMM)` pairs in UTC, compared lexicographically

mod blueprint;
mod cluster;
mod error;
mod feature;
mod record;
mod region;
mod sink;
mod source;

pub use blueprint::*;
pub use cluster::*;
pub use error::*;
pub use feature::*;
pub use record::*;
pub use region::*;
pub use sink::{FeatureSink, LocalFeatureSink};
pub use source::{cache_file_name, FetchedSource, LocalSourceFetcher, SourceFetcher};
