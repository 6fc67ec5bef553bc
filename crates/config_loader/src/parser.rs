//! 配置解析模块
//!
//! 支持 JSON (主要, 兼容既有 config.json) 和 TOML 格式。

use contracts::{ContractError, FireFinderConfig};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON 格式 (默认)
    Json,
    /// TOML 格式
    Toml,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<FireFinderConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<FireFinderConfig, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<FireFinderConfig, ContractError> {
    match format {
        ConfigFormat::Json => parse_json(content),
        ConfigFormat::Toml => parse_toml(content),
    }
}
