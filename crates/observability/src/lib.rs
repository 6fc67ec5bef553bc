//! # Observability
//!
//! 可观测性模块：Tracing + 运行指标。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)
//! - `metrics` 门面计数器 (无导出器，批处理工具)
//! - 单次运行指标聚合与摘要
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::{init_with_config, metrics, ObservabilityConfig};
//!
//! // 初始化
//! init_with_config(ObservabilityConfig::default())?;
//!
//! // 记录合并指标
//! let outcome = engine.run(records);
//! metrics::record_merge(outcome.filtered_out, &outcome.clusters);
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    record_download, record_merge, record_source_loaded, RunMetricsAggregator, RunSummary,
    RunningStats, StatsSummary,
};

/// 初始化可观测性（默认配置）
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// 可观测性配置
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// 日志格式
    pub log_format: LogFormat,
    /// 默认日志级别
    pub default_log_level: String,
    /// 为 false 时忽略 RUST_LOG，强制使用默认级别
    pub honor_env_filter: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            default_log_level: "info".to_string(),
            honor_env_filter: true,
        }
    }
}

impl ObservabilityConfig {
    /// 由 `-v` / `-q` 推导配置
    ///
    /// `quiet` 只保留 warn 及以上，并忽略 RUST_LOG。
    pub fn from_verbosity(verbose: u8, quiet: bool, log_format: LogFormat) -> Self {
        if quiet {
            return Self {
                log_format,
                default_log_level: "warn".to_string(),
                honor_env_filter: false,
            };
        }

        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        Self {
            log_format,
            default_log_level: level.to_string(),
            honor_env_filter: true,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        if self.honor_env_filter {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&self.default_log_level))
        } else {
            EnvFilter::new(&self.default_log_level)
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 结构化日志
    Json,
    /// 人类可读格式
    #[default]
    Pretty,
    /// 紧凑单行格式
    Compact,
}

/// 使用自定义配置初始化
///
/// 日志写入 stderr，stdout 留给报表。
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = config.env_filter();

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        log_format = ?config.log_format,
        level = %config.default_log_level,
        "Observability initialized"
    );

    Ok(())
}
