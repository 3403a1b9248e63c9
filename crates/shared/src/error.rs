//! 统一错误处理模块
//!
//! 定义点赞处理链路中与具体 AWS 服务无关的共享错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum LikesError {
    // ==================== 配置错误 ====================
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    #[error("配置项无效: {field} - {message}")]
    InvalidConfig { field: String, message: String },

    // ==================== 数据格式错误 ====================
    #[error("变更记录格式错误: {0}")]
    MalformedRecord(String),

    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, LikesError>;

impl LikesError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::MalformedRecord(_) => "MALFORMED_RECORD",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// 是否为瞬时故障，共享层的错误都是配置或数据问题，重放也不会成功
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Config(_)
            | Self::InvalidConfig { .. }
            | Self::MalformedRecord(_)
            | Self::Serialization(_) => false,
        }
    }
}
