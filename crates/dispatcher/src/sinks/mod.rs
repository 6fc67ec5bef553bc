//! Sink implementations
//!
//! Contains GeoJsonFileSink and LogSink.

mod file;
mod log;

pub use self::file::GeoJsonFileSink;
pub use self::log::LogSink;
