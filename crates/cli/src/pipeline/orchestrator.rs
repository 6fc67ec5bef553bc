//! Pipeline orchestrator - coordinates all components.
//!
//! Resolve sensitivity → (download) → ingest → merge → assemble → dispatch.
//! Nothing is written to the output path unless every earlier stage succeeded.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{FireFinderConfig, RepresentativePoint};
use dispatcher::{ConsoleReport, Dispatcher, FeatureAssembler, SinkConfig};
use ingestion::{download_sources, DownloadConfig, HttpFetcher, SourceSet};
use merge_engine::{MergeConfig, MergeEngine};
use observability::RunMetricsAggregator;
use tracing::{info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated configuration document
    pub settings: FireFinderConfig,

    /// Where `settings` was loaded from (for the report footer)
    pub config_path: PathBuf,

    /// GeoJSON destination
    pub output_file: PathBuf,

    /// Raw merge sensitivity
    pub sensitivity: i64,

    pub representative_point: RepresentativePoint,

    /// Apply `country_bounding_box`
    pub honor_bounding_box: bool,

    /// Refresh the CSV cache before merging
    pub download: bool,

    /// Command-line override for partial downloads
    pub allow_partial_download: bool,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let settings = &self.config.settings;
        let mut metrics = RunMetricsAggregator::new();

        // Resolve sensitivity before any I/O
        let engine = MergeEngine::new(MergeConfig {
            sensitivity: self.config.sensitivity,
            region: self
                .config
                .honor_bounding_box
                .then_some(settings.country_bounding_box),
        })
        .context("Invalid merge sensitivity")?;

        if !self.config.honor_bounding_box {
            warn!("Bounding box ignored - every detection is kept");
        }

        // Refresh cache
        if self.config.download {
            self.download(&mut metrics).await?;
        }

        // Ingest
        let sources = SourceSet::discover(&settings.csv_output_directory).with_context(|| {
            format!(
                "Failed to find CSV files in {}",
                settings.csv_output_directory.display()
            )
        })?;
        let batch = sources.load().context("Failed to read CSV files")?;
        for source in &batch.stats.sources {
            metrics.update_source(source.source.as_str(), source.records, source.skipped);
        }

        info!(
            sources = sources.files().len(),
            records = batch.records.len(),
            skipped = batch.stats.skipped(),
            "Ingestion complete"
        );

        // Merge
        let outcome = engine.run(batch.records);
        metrics.update_merge(outcome.retained_records, outcome.filtered_out, &outcome.clusters);

        // Assemble and dispatch
        let policy = self.config.representative_point;
        let collection = FeatureAssembler::new(policy).assemble(&outcome.clusters);
        let dispatcher = Dispatcher::from_configs(&[
            SinkConfig::log("console"),
            SinkConfig::file("geojson", &self.config.output_file),
        ])
        .context("Failed to create output sinks")?;
        dispatcher
            .dispatch(&collection)
            .await
            .with_context(|| format!("Failed to write {}", self.config.output_file.display()))?;

        let report = ConsoleReport::new(
            outcome.report_rows(policy),
            outcome.sensitivity.distance_threshold(),
            outcome.retained_records,
            &self.config.config_path,
            &self.config.output_file,
        );

        Ok(PipelineStats {
            report,
            sensitivity: outcome.sensitivity,
            sources: sources.files().len(),
            duration: start_time.elapsed(),
            metrics,
        })
    }

    async fn download(&self, metrics: &mut RunMetricsAggregator) -> Result<()> {
        let settings = &self.config.settings;
        let mut policy = DownloadConfig::from(settings);
        policy.allow_partial |= self.config.allow_partial_download;

        info!(
            sources = settings.csv_urls.len(),
            directory = %settings.csv_output_directory.display(),
            timeout_secs = policy.timeout.as_secs(),
            "Downloading datasets"
        );

        let fetcher = HttpFetcher::new(&policy).context("Failed to create HTTP client")?;
        let report = download_sources(
            &fetcher,
            &settings.csv_urls,
            &settings.csv_output_directory,
            &policy,
        )
        .await
        .context("Failed to download datasets")?;

        for (url, _) in &report.written {
            metrics.update_download(url, true);
        }
        for url in &report.failed {
            metrics.update_download(url, false);
        }

        info!(
            written = report.written.len(),
            failed = report.failed.len(),
            pruned = report.pruned.len(),
            "Datasets refreshed"
        );
        Ok(())
    }
}
