//! Ingestion 错误类型

use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 缓存目录中没有可读取的数据源
    #[error("no csv sources found in {directory}")]
    NoSources {
        /// 缓存目录
        directory: String,
    },

    /// 数据源读取失败 (非单行格式问题)
    #[error("failed to read source '{source_name}': {message}")]
    SourceRead {
        /// 数据源名称
        source_name: String,
        /// 错误消息
        message: String,
    },

    /// 数据源下载不完整
    #[error("{failed} of {total} sources failed to download: {urls:?}")]
    IncompleteDownload {
        /// 失败数量
        failed: usize,
        /// 总数
        total: usize,
        /// 失败的地址
        urls: Vec<String>,
    },

    /// 两个地址映射到同一个缓存文件
    #[error("sources '{first}' and '{second}' would both be cached as {file_name}")]
    CacheCollision {
        /// 缓存文件名
        file_name: String,
        /// 先出现的地址
        first: String,
        /// 后出现的地址
        second: String,
    },

    /// HTTP 客户端构建失败
    #[error("failed to build http client: {0}")]
    Client(String),

    /// 合约层错误
    #[error(transparent)]
    Contract(#[from] contracts::ContractError),

    /// IO 错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestionError {
    pub fn source_read(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceRead {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
