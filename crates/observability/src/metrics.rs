//! 运行指标收集模块
//!
//! 通过 `metrics` 门面记录计数器，同时在内存中聚合一次运行的统计摘要。

use std::collections::BTreeMap;
use std::fmt;

use contracts::Cluster;
use metrics::{counter, gauge, histogram};

/// 记录单个数据源的读取结果
pub fn record_source_loaded(source: &str, records: u64, skipped: u64) {
    counter!("fire_finder_records_ingested_total", "source" => source.to_string())
        .increment(records);
    if skipped > 0 {
        counter!("fire_finder_rows_skipped_total", "source" => source.to_string())
            .increment(skipped);
    }
}

/// 记录一次下载尝试
pub fn record_download(url: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "fire_finder_downloads_total",
        "url" => url.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录区域过滤与聚类结果
pub fn record_merge(filtered_out: usize, clusters: &[Cluster]) {
    counter!("fire_finder_records_filtered_out_total").increment(filtered_out as u64);
    gauge!("fire_finder_clusters").set(clusters.len() as f64);
    for cluster in clusters {
        histogram!("fire_finder_cluster_size").record(cluster.count() as f64);
    }
}

/// 运行指标聚合器
///
/// 在内存中聚合指标，便于输出运行摘要。
#[derive(Debug, Clone, Default)]
pub struct RunMetricsAggregator {
    /// 成功下载数
    pub downloads_ok: u64,

    /// 失败下载数
    pub downloads_failed: u64,

    /// 读取的记录数
    pub records_ingested: u64,

    /// 跳过的畸形行数
    pub rows_skipped: u64,

    /// 区域外记录数
    pub records_filtered_out: u64,

    /// 参与合并的记录数
    pub records_merged: u64,

    /// 簇大小统计
    pub cluster_sizes: RunningStats,

    /// 各数据源记录数
    pub source_records: BTreeMap<String, u64>,
}

impl RunMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_download(&mut self, url: &str, success: bool) {
        if success {
            self.downloads_ok += 1;
        } else {
            self.downloads_failed += 1;
        }
        record_download(url, success);
    }

    pub fn update_source(&mut self, source: &str, records: u64, skipped: u64) {
        self.records_ingested += records;
        self.rows_skipped += skipped;
        *self.source_records.entry(source.to_string()).or_insert(0) += records;
        record_source_loaded(source, records, skipped);
    }

    pub fn update_merge(&mut self, retained: usize, filtered_out: usize, clusters: &[Cluster]) {
        self.records_merged += retained as u64;
        self.records_filtered_out += filtered_out as u64;
        for cluster in clusters {
            self.cluster_sizes.push(cluster.count() as f64);
        }
        record_merge(filtered_out, clusters);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> RunSummary {
        let clusters = self.cluster_sizes.count();
        RunSummary {
            downloads_ok: self.downloads_ok,
            downloads_failed: self.downloads_failed,
            records_ingested: self.records_ingested,
            rows_skipped: self.rows_skipped,
            records_filtered_out: self.records_filtered_out,
            records_merged: self.records_merged,
            clusters,
            merge_ratio: if clusters > 0 {
                self.records_merged as f64 / clusters as f64
            } else {
                0.0
            },
            cluster_size: StatsSummary::from(&self.cluster_sizes),
            source_records: self.source_records.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 运行摘要
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub downloads_ok: u64,
    pub downloads_failed: u64,
    pub records_ingested: u64,
    pub rows_skipped: u64,
    pub records_filtered_out: u64,
    pub records_merged: u64,
    pub clusters: u64,
    /// 平均每簇记录数
    pub merge_ratio: f64,
    pub cluster_size: StatsSummary,
    pub source_records: BTreeMap<String, u64>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Run Metrics Summary ===")?;
        if self.downloads_ok + self.downloads_failed > 0 {
            writeln!(
                f,
                "Downloads: {} ok, {} failed",
                self.downloads_ok, self.downloads_failed
            )?;
        }
        writeln!(f, "Records ingested: {}", self.records_ingested)?;
        writeln!(f, "Rows skipped: {}", self.rows_skipped)?;
        writeln!(f, "Outside region: {}", self.records_filtered_out)?;
        writeln!(
            f,
            "Merged: {} records into {} clusters ({:.2} per cluster)",
            self.records_merged, self.clusters, self.merge_ratio
        )?;
        writeln!(f, "Cluster size: {}", self.cluster_size)?;

        if !self.source_records.is_empty() {
            writeln!(f, "Records per source:")?;
            for (source, count) in &self.source_records {
                writeln!(f, "  {}: {}", source, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
