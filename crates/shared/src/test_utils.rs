//! 测试工具模块
//!
//! 以 DynamoDB Stream 的真实 JSON 形态构造变更记录，
//! 让单元测试与集成测试走与线上相同的反序列化路径。

use serde_json::{Value, json};

use crate::events::{ChangeKind, StreamEvent};

// ==================== 镜像与记录 ====================

/// 构造属性类型编码的点赞镜像
pub fn like_image(directory: &str, user_id: &str, liked: bool) -> Value {
    json!({
        "directory": {"S": directory},
        "userId": {"S": user_id},
        "liked": {"BOOL": liked}
    })
}

/// 构造单条 Stream 记录 JSON，镜像为 None 时省略对应字段
pub fn stream_record(kind: ChangeKind, old_image: Option<Value>, new_image: Option<Value>) -> Value {
    let keys: serde_json::Map<String, Value> = old_image
        .as_ref()
        .or(new_image.as_ref())
        .and_then(Value::as_object)
        .map(|image| {
            ["directory", "userId"]
                .iter()
                .filter_map(|key| image.get(*key).map(|v| (key.to_string(), v.clone())))
                .collect()
        })
        .unwrap_or_default();

    let mut change = json!({
        "Keys": keys,
        "SequenceNumber": next_sequence_number(),
        "SizeBytes": 59,
        "StreamViewType": "NEW_AND_OLD_IMAGES"
    });

    if let Value::Object(ref mut map) = change {
        if let Some(image) = old_image {
            map.insert("OldImage".to_string(), image);
        }
        if let Some(image) = new_image {
            map.insert("NewImage".to_string(), image);
        }
    }

    json!({
        "eventID": format!("evt-{}", next_sequence_number()),
        "eventName": kind.to_string(),
        "eventVersion": "1.1",
        "eventSource": "aws:dynamodb",
        "awsRegion": "us-east-1",
        "eventSourceARN": "arn:aws:dynamodb:us-east-1:123456789012:table/likes/stream/2024-01-01T00:00:00.000",
        "dynamodb": change
    })
}

/// 将若干记录包装为 Lambda 批次并反序列化
pub fn stream_event(records: Vec<Value>) -> Result<StreamEvent, serde_json::Error> {
    serde_json::from_value(json!({ "Records": records }))
}

/// 生成递增序列号
///
/// 使用原子计数器确保并行测试时的唯一性
fn next_sequence_number() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    format!("{:021}", COUNTER.fetch_add(1, Ordering::SeqCst))
}
