//! 点赞积分服务专用错误类型
//!
//! 在共享库 LikesError 基础上定义本服务与 DynamoDB / SQS 交互时的错误变体。

use likes_shared::error::LikesError;

/// 点赞记录处理错误
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// 元数据表 Query 调用失败（网络、限流或权限问题）
    #[error("元数据查询失败: directory={directory}, 原因={message}")]
    MetadataQuery { directory: String, message: String },

    /// SQS SendMessage 调用失败
    #[error("积分消息投递失败: 原因={0}")]
    SendMessage(String),

    /// 透传共享库错误，避免在每个 match 分支手动转换
    #[error(transparent)]
    Shared(#[from] LikesError),
}

impl ProcessorError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MetadataQuery { .. } => "METADATA_QUERY_ERROR",
            Self::SendMessage(_) => "SEND_MESSAGE_ERROR",
            Self::Shared(e) => e.code(),
        }
    }

    /// 是否为瞬时故障
    ///
    /// 本服务不做重试，该标记只写入日志，便于运维判断是否需要人工重放。
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::MetadataQuery { .. } | Self::SendMessage(_) => true,
            Self::Shared(e) => e.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProcessorError::MetadataQuery {
            directory: "movie-001".to_string(),
            message: "连接超时".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "元数据查询失败: directory=movie-001, 原因=连接超时"
        );
        assert!(err.is_retryable());

        let err = ProcessorError::SendMessage("队列不存在".to_string());
        assert_eq!(err.to_string(), "积分消息投递失败: 原因=队列不存在");
        assert_eq!(err.code(), "SEND_MESSAGE_ERROR");

        let shared_err = LikesError::MalformedRecord("缺少 OldImage".to_string());
        let err = ProcessorError::Shared(shared_err);
        assert_eq!(err.to_string(), "变更记录格式错误: 缺少 OldImage");
        assert_eq!(err.code(), "MALFORMED_RECORD");
        assert!(!err.is_retryable());

        let body_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ProcessorError::from(LikesError::from(body_err));
        assert_eq!(err.code(), "SERIALIZATION_ERROR");
        assert!(!err.is_retryable());
    }
}
