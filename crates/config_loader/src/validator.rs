//! 配置校验模块
//!
//! 校验规则：
//! - 派生规则 (csv_urls 非空)
//! - country_bounding_box 坐标有限且在经纬度范围内
//! - csv_urls 为 http(s) 地址、可推导缓存文件名、缓存文件名不重复
//! - csv_output_directory 非空
//! - download_timeout_secs > 0

use std::collections::HashMap;

use contracts::{cache_file_name, ContractError, FireFinderConfig};
use url::Url;
use validator::Validate;

/// 校验 FireFinderConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &FireFinderConfig) -> Result<(), ContractError> {
    validate_derived_rules(config)?;
    validate_bounding_box(config)?;
    validate_urls(config)?;
    validate_output_directory(config)?;
    validate_timeout(config)?;
    Ok(())
}

/// 派生校验规则
fn validate_derived_rules(config: &FireFinderConfig) -> Result<(), ContractError> {
    config.validate().map_err(|errors| {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "config".to_string());
        ContractError::config_validation(field, errors.to_string())
    })
}

/// 校验关注区域
fn validate_bounding_box(config: &FireFinderConfig) -> Result<(), ContractError> {
    let region = &config.country_bounding_box;
    let corners = [
        ("lat_a", region.lat_a, 90.0),
        ("lon_a", region.lon_a, 180.0),
        ("lat_b", region.lat_b, 90.0),
        ("lon_b", region.lon_b, 180.0),
    ];

    for (name, value, limit) in corners {
        if !value.is_finite() || value.abs() > limit {
            return Err(ContractError::config_validation(
                format!("country_bounding_box.{name}"),
                format!("{value} is outside [-{limit}, {limit}]"),
            ));
        }
    }
    Ok(())
}

/// 校验数据源地址
///
/// 每个地址映射到缓存目录中唯一的文件名，否则后下载的数据源会覆盖先下载的。
fn validate_urls(config: &FireFinderConfig) -> Result<(), ContractError> {
    let mut cache_names: HashMap<String, usize> = HashMap::new();
    for (idx, url) in config.csv_urls.iter().enumerate() {
        let field = format!("csv_urls[{idx}]");

        let parsed = Url::parse(url).map_err(|e| {
            ContractError::config_validation(&field, format!("'{url}' is not a valid url: {e}"))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ContractError::config_validation(
                &field,
                format!("'{url}' is not an http(s) url"),
            ));
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ContractError::config_validation(
                &field,
                format!("'{url}' has no host"),
            ));
        }

        let name = cache_file_name(url).ok_or_else(|| {
            ContractError::config_validation(&field, format!("cannot derive a file name from '{url}'"))
        })?;

        if let Some(first) = cache_names.insert(name.clone(), idx) {
            return Err(ContractError::config_validation(
                field,
                format!("cache file '{name}' is already used by csv_urls[{first}]"),
            ));
        }
    }
    Ok(())
}

/// 校验缓存目录
fn validate_output_directory(config: &FireFinderConfig) -> Result<(), ContractError> {
    if config.csv_output_directory.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "csv_output_directory",
            "directory cannot be empty",
        ));
    }
    Ok(())
}

/// 校验下载超时
fn validate_timeout(config: &FireFinderConfig) -> Result<(), ContractError> {
    if config.download_timeout_secs == 0 {
        return Err(ContractError::config_validation(
            "download_timeout_secs",
            "download_timeout_secs must be > 0",
        ));
    }
    Ok(())
}
