//! Lambda 入口处理函数
//!
//! 接收 DynamoDB Stream 批次并交给 LikesProcessor。处理中的任何错误都已在
//! 处理器内部记录，这里总是向运行时返回成功，Stream 不会因此重投整批记录。

use lambda_runtime::{Error, LambdaEvent};
use likes_shared::events::StreamEvent;
use tracing::{debug, info, warn};

use crate::processor::{BatchReport, LikesProcessor};

#[tracing::instrument(
    skip_all,
    fields(
        request_id = %event.context.request_id,
        record_count = event.payload.records.len()
    )
)]
pub async fn handler(
    processor: &LikesProcessor,
    event: LambdaEvent<StreamEvent>,
) -> Result<(), Error> {
    let (payload, _context) = event.into_parts();
    debug!(records = ?payload.records, "收到变更记录批次");

    let report = processor.process_batch(&payload.records).await;
    log_report(&report);

    Ok(())
}

fn log_report(report: &BatchReport) {
    if report.is_clean() {
        info!(
            total = report.total,
            published = report.published,
            skipped_no_categories = report.skipped_no_categories,
            skipped_zero_points = report.skipped_zero_points,
            processing_time_ms = report.processing_time_ms,
            "变更记录批次处理完成"
        );
    } else {
        warn!(
            total = report.total,
            published = report.published,
            failed = report.failed,
            aborted = report.aborted,
            abandoned = report.abandoned,
            processing_time_ms = report.processing_time_ms,
            "变更记录批次未完整处理"
        );
    }
}
