//! 点赞变更处理器
//!
//! 对批次内的每条变更记录依次执行：
//! 选取镜像 -> 查询分类元数据 -> 计算积分增量 -> 投递积分消息。
//!
//! 记录严格按投递顺序串行处理。元数据缺失与单条失败时是继续还是放弃剩余批次，
//! 分别由 `MissingMetadataPolicy` 与 `RecordErrorPolicy` 决定；无论哪种策略，
//! 错误都只记录日志，不会向 Lambda 运行时抛出。

use std::sync::Arc;
use std::time::Instant;

use likes_shared::config::{MissingMetadataPolicy, ProcessingConfig, RecordErrorPolicy};
use likes_shared::events::{LikeChange, RawRecord, ScoreMessage};
use tracing::{debug, error, info, warn};

use crate::error::ProcessorError;
use crate::metadata_store::MetadataStore;
use crate::score_queue::ScorePublisher;
use crate::scoring::point_delta;

/// 单条记录的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// 积分消息已投递
    Published {
        points: i32,
        message_id: Option<String>,
    },
    /// 元数据不存在，或存在但解析不出任何分类
    NoCategories { directory: String },
    /// 积分增量为 0，无需投递
    ZeroPoints,
}

/// 一次批次调用的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub published: usize,
    pub skipped_no_categories: usize,
    pub skipped_zero_points: usize,
    pub failed: usize,
    /// 因策略提前终止而未处理的记录数
    pub abandoned: usize,
    pub aborted: bool,
    pub processing_time_ms: i64,
}

impl BatchReport {
    fn abort_after(&mut self, index: usize) {
        self.aborted = true;
        self.abandoned = self.total - index - 1;
    }

    /// 批次是否完整处理且没有失败记录
    pub fn is_clean(&self) -> bool {
        !self.aborted && self.failed == 0
    }
}

/// 点赞变更处理器
///
/// 元数据存储与消息发送器在冷启动时构造一次，通过 trait object 注入，
/// 之后在同一执行环境的多次调用间复用。
pub struct LikesProcessor {
    metadata_store: Arc<dyn MetadataStore>,
    publisher: Arc<dyn ScorePublisher>,
    processing: ProcessingConfig,
}

impl LikesProcessor {
    pub fn new(
        metadata_store: Arc<dyn MetadataStore>,
        publisher: Arc<dyn ScorePublisher>,
        processing: ProcessingConfig,
    ) -> Self {
        Self {
            metadata_store,
            publisher,
            processing,
        }
    }

    /// 按顺序处理整个批次，始终返回汇总而不是错误
    pub async fn process_batch(&self, records: &[RawRecord]) -> BatchReport {
        let start = Instant::now();
        let mut report = BatchReport {
            total: records.len(),
            ..Default::default()
        };

        for (index, record) in records.iter().enumerate() {
            match self.process_record(record).await {
                Ok(RecordOutcome::Published { .. }) => report.published += 1,
                Ok(RecordOutcome::ZeroPoints) => report.skipped_zero_points += 1,
                Ok(RecordOutcome::NoCategories { directory }) => {
                    report.skipped_no_categories += 1;

                    if self.processing.on_missing_metadata == MissingMetadataPolicy::AbortBatch {
                        report.abort_after(index);
                        warn!(
                            directory = %directory,
                            event_id = %record.trace_key(),
                            abandoned = report.abandoned,
                            "未找到分类元数据，终止本批次剩余记录"
                        );
                        break;
                    }

                    debug!(directory = %directory, "未找到分类元数据，跳过该记录");
                }
                Err(e) => {
                    report.failed += 1;
                    error!(
                        event_id = %record.trace_key(),
                        event_name = record.event_name(),
                        code = e.code(),
                        retryable = e.is_retryable(),
                        error = %e,
                        "处理点赞记录失败"
                    );

                    if self.processing.on_record_error == RecordErrorPolicy::AbortBatch {
                        report.abort_after(index);
                        warn!(abandoned = report.abandoned, "放弃本批次剩余记录");
                        break;
                    }
                }
            }
        }

        report.processing_time_ms = start.elapsed().as_millis() as i64;
        report
    }

    /// 处理单条变更记录，结构错误与镜像错误都作为 MalformedRecord 返回
    #[tracing::instrument(
        skip_all,
        fields(event_id = %record.trace_key(), event_name = record.event_name())
    )]
    pub async fn process_record(
        &self,
        record: &RawRecord,
    ) -> Result<RecordOutcome, ProcessorError> {
        let change = LikeChange::from_record(&record.decode()?)?;
        let subject = change.subject();

        let categories = match self
            .metadata_store
            .find_by_directory(&subject.directory)
            .await?
        {
            Some(metadata) => metadata.categories(),
            None => Default::default(),
        };

        if categories.is_empty() {
            return Ok(RecordOutcome::NoCategories {
                directory: subject.directory.clone(),
            });
        }

        let points = point_delta(&change);
        if points == 0 {
            debug!(
                directory = %subject.directory,
                user_id = %subject.user_id,
                "liked 状态未变化，无需投递"
            );
            return Ok(RecordOutcome::ZeroPoints);
        }

        let message = ScoreMessage::new(subject.user_id.clone(), categories, points);
        let message_id = self.publisher.publish(&message).await?;

        info!(
            user_id = %message.user_id,
            directory = %subject.directory,
            points,
            category_count = message.categories.len(),
            message_id = ?message_id,
            "积分消息已投递"
        );

        Ok(RecordOutcome::Published { points, message_id })
    }
}
