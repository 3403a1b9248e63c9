//! 流事件模型与积分消息
//!
//! 定义点赞表 DynamoDB Stream 推送的变更记录格式、从记录镜像中解码出的
//! 点赞快照，以及投递给下游聚合队列的积分消息。

use serde::{Deserialize, Serialize};
use serde_dynamo::Item;
use serde_json::Value;

use crate::error::{LikesError, Result};

/// 积分消息的来源标识，下游据此区分消息生产方
pub const SENDER_TAG: &str = "likes_processor";

// ---------------------------------------------------------------------------
// ChangeKind — 变更类型
// ---------------------------------------------------------------------------

/// 变更类型，对应 Stream 记录的 eventName
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    Insert,
    Remove,
    Modify,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Insert => "INSERT",
            Self::Remove => "REMOVE",
            Self::Modify => "MODIFY",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// StreamEvent — Lambda 收到的批次
// ---------------------------------------------------------------------------

/// 一次 Lambda 调用携带的变更记录批次
///
/// 记录在批次层面只保留原始 JSON，逐条解码，单条记录结构错误不会使整批反序列化失败。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<RawRecord>,
}

/// 尚未校验结构的单条变更记录
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    /// 解码为结构化记录，缺少 dynamodb 或 eventName 不在三种变更类型内时返回 MalformedRecord
    pub fn decode(&self) -> Result<StreamRecord> {
        StreamRecord::deserialize(&self.0)
            .map_err(|e| LikesError::MalformedRecord(format!("记录结构错误: {e}")))
    }

    /// 日志中用于定位记录的标识，缺少 eventID 时退回序列号
    pub fn trace_key(&self) -> &str {
        self.0
            .get("eventID")
            .and_then(Value::as_str)
            .or_else(|| {
                self.0
                    .pointer("/dynamodb/SequenceNumber")
                    .and_then(Value::as_str)
            })
            .unwrap_or("unknown")
    }

    /// 原始 eventName，未经校验
    pub fn event_name(&self) -> &str {
        self.0
            .get("eventName")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }
}

/// 单条变更记录
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRecord {
    #[serde(rename = "eventID", default)]
    pub event_id: Option<String>,
    pub event_name: ChangeKind,
    #[serde(rename = "eventSourceARN", default)]
    pub event_source_arn: Option<String>,
    pub dynamodb: StreamChange,
}

/// 变更前后的属性镜像，镜像按 DynamoDB 属性类型编码（{"S": ...}、{"BOOL": ...}）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamChange {
    #[serde(default)]
    pub keys: Option<Item>,
    #[serde(default)]
    pub new_image: Option<Item>,
    #[serde(default)]
    pub old_image: Option<Item>,
    #[serde(default)]
    pub sequence_number: Option<String>,
}

// ---------------------------------------------------------------------------
// LikeImage / LikeChange — 解码后的点赞快照
// ---------------------------------------------------------------------------

/// 点赞表中单条记录在某一时刻的快照
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeImage {
    /// 被点赞内容所在目录，同时是元数据表的分区键
    pub directory: String,
    pub user_id: String,
    pub liked: bool,
}

impl LikeImage {
    pub fn from_item(item: &Item) -> Result<Self> {
        serde_dynamo::from_item(item.clone())
            .map_err(|e| LikesError::MalformedRecord(format!("镜像解码失败: {e}")))
    }
}

/// 按变更类型携带所需镜像的点赞变更
///
/// INSERT 只关心新镜像，REMOVE 只关心旧镜像，MODIFY 需要前后两份镜像比较 liked 的跳变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeChange {
    Created { new: LikeImage },
    Removed { old: LikeImage },
    Modified { old: LikeImage, new: LikeImage },
}

impl LikeChange {
    /// 从原始 Stream 记录解码，缺少所需镜像或字段类型不符时返回 MalformedRecord
    pub fn from_record(record: &StreamRecord) -> Result<Self> {
        let change = &record.dynamodb;

        match record.event_name {
            ChangeKind::Insert => Ok(Self::Created {
                new: decode_image(change.new_image.as_ref(), "NewImage")?,
            }),
            ChangeKind::Remove => Ok(Self::Removed {
                old: decode_image(change.old_image.as_ref(), "OldImage")?,
            }),
            ChangeKind::Modify => Ok(Self::Modified {
                old: decode_image(change.old_image.as_ref(), "OldImage")?,
                new: decode_image(change.new_image.as_ref(), "NewImage")?,
            }),
        }
    }

    /// 决定用户与目录的镜像：REMOVE 取旧镜像，其余取新镜像
    pub fn subject(&self) -> &LikeImage {
        match self {
            Self::Removed { old } => old,
            Self::Created { new } | Self::Modified { new, .. } => new,
        }
    }
}

fn decode_image(image: Option<&Item>, name: &str) -> Result<LikeImage> {
    let item = image.ok_or_else(|| LikesError::MalformedRecord(format!("缺少 {name}")))?;
    LikeImage::from_item(item)
}

// ---------------------------------------------------------------------------
// ScoreMessage — 下游积分消息
// ---------------------------------------------------------------------------

/// 投递给聚合队列的积分消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreMessage {
    pub user_id: String,
    /// 已去重的分类名列表
    pub categories: Vec<String>,
    pub points: i32,
    pub sender: String,
}

impl ScoreMessage {
    pub fn new(
        user_id: impl Into<String>,
        categories: impl IntoIterator<Item = String>,
        points: i32,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            categories: categories.into_iter().collect(),
            points,
            sender: SENDER_TAG.to_string(),
        }
    }

    /// 序列化为 SQS 消息体
    pub fn to_body(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
