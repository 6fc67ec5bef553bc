//! # Dispatcher
//!
//! 输出分发模块。
//!
//! 负责：
//! - 将排序后的簇组装为 `FeatureCollection`
//! - 渲染控制台报表
//! - Fan-out 到多个 sinks（原子写入 GeoJSON 文件、日志）

pub mod assembler;
pub mod dispatcher;
pub mod error;
pub mod report;
pub mod sinks;

pub use assembler::FeatureAssembler;
pub use contracts::{FeatureCollection, FeatureSink};
pub use dispatcher::{create_sink, AnySink, Dispatcher, SinkConfig, SinkType};
pub use error::DispatcherError;
pub use report::ConsoleReport;
pub use sinks::{GeoJsonFileSink, LogSink};
