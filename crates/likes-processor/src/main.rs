//! 点赞积分处理服务
//!
//! 由点赞表的 DynamoDB Stream 触发，计算积分后投递到 SQS。

use std::sync::Arc;

use anyhow::Context;
use aws_config::{BehaviorVersion, Region};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use likes_processor::handler::handler;
use likes_processor::metadata_store::DynamoMetadataStore;
use likes_processor::processor::LikesProcessor;
use likes_processor::score_queue::SqsScorePublisher;
use likes_shared::config::AppConfig;
use likes_shared::events::StreamEvent;
use likes_shared::observability::{self, ObservabilityConfig};
use tracing::info;

const SERVICE_NAME: &str = "likes-processor";

#[tokio::main]
async fn main() -> Result<(), Error> {
    observability::init(&ObservabilityConfig::from_env(SERVICE_NAME))?;

    let config =
        AppConfig::load(SERVICE_NAME).context("all necessary env vars should be available")?;

    info!(
        environment = %config.environment,
        likes_table = %config.likes_table,
        metadata_table = %config.metadata_table,
        queue_url = %config.queue_url,
        on_missing_metadata = ?config.processing.on_missing_metadata,
        on_record_error = ?config.processing.on_record_error,
        "Starting likes-processor..."
    );

    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.aws_region {
        loader = loader.region(Region::new(region.clone()));
    }
    let sdk_config = loader.load().await;

    // 客户端在冷启动时构造一次，之后的每次调用都复用
    let processor = Arc::new(LikesProcessor::new(
        Arc::new(DynamoMetadataStore::new(
            &sdk_config,
            config.metadata_table.clone(),
        )),
        Arc::new(SqsScorePublisher::new(&sdk_config, config.queue_url.clone())),
        config.processing,
    ));

    let func = service_fn(move |event: LambdaEvent<StreamEvent>| {
        let processor = processor.clone();
        async move { handler(&processor, event).await }
    });

    run(func).await
}
