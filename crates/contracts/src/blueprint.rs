//! FireFinderConfig - Config Loader 输出
//!
//! 描述一次运行的完整配置：关注区域、数据源、缓存目录、下载策略。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::Region;

/// 完整的运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FireFinderConfig {
    /// 关注区域 `[lat_a, lon_a, lat_b, lon_b]`
    pub country_bounding_box: Region,

    /// 数据源 CSV 地址
    #[validate(length(min = 1, message = "at least one source url is required"))]
    pub csv_urls: Vec<String>,

    /// 本地 CSV 缓存目录
    #[serde(default = "default_csv_output_directory")]
    pub csv_output_directory: PathBuf,

    /// 单个下载请求超时 (秒)
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// 部分数据源下载失败时是否继续
    #[serde(default)]
    pub allow_partial_download: bool,
}

fn default_csv_output_directory() -> PathBuf {
    PathBuf::from("csvs")
}

fn default_download_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: FireFinderConfig = serde_json::from_str(
            r#"{
                "country_bounding_box": [7.2, -82.9, 9.6, -77.2],
                "csv_urls": ["https://example.org/a.csv"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.csv_output_directory, PathBuf::from("csvs"));
        assert_eq!(config.download_timeout_secs, 30);
        assert!(!config.allow_partial_download);
    }

    #[test]
    fn test_missing_required_field() {
        let result: Result<FireFinderConfig, _> =
            serde_json::from_str(r#"{ "csv_urls": ["https://example.org/a.csv"] }"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("country_bounding_box"), "{err}");
    }

    #[test]
    fn test_validate_rejects_empty_urls() {
        let config = FireFinderConfig {
            country_bounding_box: Region::new(0.0, 0.0, 1.0, 1.0),
            csv_urls: vec![],
            csv_output_directory: default_csv_output_directory(),
            download_timeout_secs: 30,
            allow_partial_download: false,
        };
        assert!(config.validate().is_err());
    }
}
