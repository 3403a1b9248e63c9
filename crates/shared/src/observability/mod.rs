//! 统一可观测性模块
//!
//! 提供结构化日志的统一初始化。Lambda 运行时会把标准输出转发到 CloudWatch Logs，
//! 因此这里只负责 tracing 订阅器的装配，不做指标导出或追踪上报。

pub mod tracing;

use ::tracing::info;
use anyhow::Result;
use serde::Deserialize;

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// 服务名称，用于标识日志来源
    pub service_name: String,

    /// 日志级别（如 "info", "debug"）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 是否启用 JSON 格式日志
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown-service".to_string(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl ObservabilityConfig {
    /// 从环境变量加载配置
    ///
    /// 运行在 Lambda 中（存在 AWS_LAMBDA_FUNCTION_NAME）且未显式设置 JSON_LOGS 时默认输出 JSON，
    /// 便于在 CloudWatch Logs Insights 中按字段检索。
    pub fn from_env(service_name: &str) -> Self {
        let in_lambda = std::env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok();

        Self {
            service_name: service_name.to_string(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| default_log_level()),
            json_logs: std::env::var("JSON_LOGS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(in_lambda),
        }
    }
}

/// 统一初始化可观测性
///
/// # Example
///
/// ```ignore
/// use likes_shared::observability::{init, ObservabilityConfig};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ObservabilityConfig::from_env("likes-processor");
///     init(&config)?;
///
///     // 应用逻辑...
///
///     Ok(())
/// }
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    tracing::init(config)?;

    info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Observability initialized"
    );

    Ok(())
}
