//! Pipeline statistics and metrics.

use std::time::Duration;

use dispatcher::ConsoleReport;
use merge_engine::Sensitivity;
use observability::RunMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Report printed to stdout
    pub report: ConsoleReport,

    /// Resolved merge sensitivity
    pub sensitivity: Sensitivity,

    /// Number of CSV sources read
    pub sources: usize,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Run metrics aggregator
    pub metrics: RunMetricsAggregator,
}

impl PipelineStats {
    /// Detections processed per second
    pub fn records_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.metrics.records_ingested as f64 / secs
        } else {
            0.0
        }
    }

    /// Print detailed summary to stderr
    pub fn print_summary(&self) {
        let summary = self.metrics.summary();

        eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
        eprintln!("║                    Pipeline Statistics                       ║");
        eprintln!("╚══════════════════════════════════════════════════════════════╝\n");

        eprintln!("📊 Overview");
        eprintln!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        eprintln!("   ├─ Sources: {}", self.sources);
        eprintln!("   ├─ Records/s: {:.0}", self.records_per_sec());
        eprintln!(
            "   └─ Sensitivity: {} ({})",
            self.sensitivity,
            self.sensitivity.distance_threshold()
        );

        eprintln!("\n📈 Merge Metrics");
        if summary.downloads_ok + summary.downloads_failed > 0 {
            eprintln!(
                "   ├─ Downloads: {} ok, {} failed",
                summary.downloads_ok, summary.downloads_failed
            );
        }
        eprintln!("   ├─ Records ingested: {}", summary.records_ingested);
        eprintln!("   ├─ Malformed rows skipped: {}", summary.rows_skipped);
        eprintln!("   ├─ Outside bounding box: {}", summary.records_filtered_out);
        eprintln!(
            "   ├─ Merged: {} → {} ({:.2} per wildfire)",
            summary.records_merged, summary.clusters, summary.merge_ratio
        );
        eprintln!("   └─ Wildfire size: {}", summary.cluster_size);

        if !summary.source_records.is_empty() {
            eprintln!("\n🛰️  Records per Source");
            for (source, count) in &summary.source_records {
                eprintln!("   ├─ {}: {}", source, count);
            }
        }

        eprintln!();
    }
}
