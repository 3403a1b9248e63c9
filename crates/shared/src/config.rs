//! 配置管理模块
//!
//! 支持可选的配置文件加载与环境变量覆盖。Lambda 环境下三项核心标识
//! （点赞表、元数据表、队列 URL）均由部署方通过环境变量注入，仅在冷启动时读取一次。

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::error::{LikesError, Result};

/// 元数据缺失时的批次处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMetadataPolicy {
    /// 终止整个批次，剩余记录不再处理（历史行为）
    AbortBatch,
    /// 仅跳过当前记录
    #[default]
    SkipRecord,
}

/// 单条记录处理出错时的批次处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordErrorPolicy {
    /// 记录日志后丢弃剩余批次（历史行为）
    AbortBatch,
    /// 记录日志后继续处理下一条
    #[default]
    Continue,
}

/// 批处理配置
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub on_missing_metadata: MissingMetadataPolicy,
    #[serde(default)]
    pub on_record_error: RecordErrorPolicy,
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    /// 触发本服务的点赞表，仅用于日志标识
    pub likes_table: String,
    /// 存放 actors / directors / genres 的元数据表
    pub metadata_table: String,
    /// 积分消息投递的 SQS 队列 URL
    pub queue_url: String,
    /// 为空时沿用 SDK 默认的区域解析链
    #[serde(default)]
    pub aws_region: Option<String>,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（可选，本地调试用）
    /// 2. config/{environment}.toml（可选）
    /// 3. 环境变量（无前缀，LIKES_TABLE -> likes_table，PROCESSING__ON_RECORD_ERROR -> processing.on_record_error）
    /// 4. 扁平策略变量 ON_MISSING_METADATA / ON_RECORD_ERROR
    pub fn load(service_name: &str) -> Result<Self> {
        let env = std::env::var("LIKES_ENV").unwrap_or_else(|_| "production".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let config = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(Environment::default().separator("__"))
            .set_override_option(
                "processing.on_missing_metadata",
                std::env::var("ON_MISSING_METADATA").ok(),
            )?
            .set_override_option(
                "processing.on_record_error",
                std::env::var("ON_RECORD_ERROR").ok(),
            )?
            .build()?;

        Self::from_config(config)
    }

    /// 从已构建的 Config 反序列化并校验
    pub fn from_config(config: Config) -> Result<Self> {
        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// 三项外部标识缺一不可，空字符串视同未配置
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("likes_table", &self.likes_table),
            ("metadata_table", &self.metadata_table),
            ("queue_url", &self.queue_url),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(LikesError::InvalidConfig {
                    field: field.to_string(),
                    message: "不能为空".to_string(),
                });
            }
        }

        Ok(())
    }
}
