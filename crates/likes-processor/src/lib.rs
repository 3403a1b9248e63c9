//! 点赞积分处理服务
//!
//! 消费点赞表 DynamoDB Stream 的变更记录，查询被点赞内容的分类元数据，
//! 根据 liked 标记的跳变计算积分增量，并将积分消息投递到 SQS 供下游聚合。

pub mod categories;
pub mod error;
pub mod handler;
pub mod metadata_store;
pub mod processor;
pub mod score_queue;
pub mod scoring;
