//! Pipeline run implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::Cli;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute a full run: merge and write `output_file`
pub async fn run_pipeline(cli: &Cli) -> Result<()> {
    let output_file = cli.output_file.clone().ok_or(CliError::MissingOutputFile)?;

    info!(config = %cli.config_file.display(), "Loading configuration");

    // Validate config path
    if !cli.config_file.exists() {
        return Err(CliError::config_not_found(&cli.config_file).into());
    }

    let settings = config_loader::ConfigLoader::load_from_path(&cli.config_file)
        .with_context(|| format!("Failed to load config from {}", cli.config_file.display()))?;

    info!(
        sources = settings.csv_urls.len(),
        directory = %settings.csv_output_directory.display(),
        bounding_box = ?settings.country_bounding_box,
        "Configuration loaded"
    );

    let pipeline_config = PipelineConfig {
        settings,
        config_path: cli.config_file.clone(),
        output_file,
        sensitivity: cli.merge_sensitivity,
        representative_point: cli.representative_point.into(),
        honor_bounding_box: !cli.ignore_bounding_box,
        download: cli.download_csvs,
        allow_partial_download: cli.allow_partial_download,
    };

    let stats = Pipeline::new(pipeline_config).run().await?;

    info!(
        wildfires = stats.report.rows().len(),
        duration_secs = stats.duration.as_secs_f64(),
        "Pipeline completed successfully"
    );

    stats.report.print();
    if !cli.quiet {
        stats.print_summary();
    }

    Ok(())
}
