//! # Fire Finder CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证 (`--dry-run`)
//! - 下载、合并、输出管道编排

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::Cli;
use commands::{run_pipeline, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig::from_verbosity(
        cli.verbose,
        cli.quiet,
        cli.log_format.into(),
    ))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Fire Finder starting");

    let result = if cli.dry_run {
        run_validate(&cli)
    } else {
        run_pipeline(&cli).await
    };

    if let Err(ref e) = result {
        tracing::error!(error = %format!("{e:#}"), "Command failed");
    }

    result
}
