//! 积分消息投递
//!
//! 将积分消息序列化为 JSON 后发送到下游 SQS 队列。单次发送，不做重试。

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sqs::Client;
use aws_sdk_sqs::error::DisplayErrorContext;
use likes_shared::events::ScoreMessage;

use crate::error::ProcessorError;

/// 积分消息发送的抽象接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScorePublisher: Send + Sync {
    /// 发送一条积分消息，返回队列分配的消息 ID
    async fn publish(&self, message: &ScoreMessage) -> Result<Option<String>, ProcessorError>;
}

/// 基于 SQS SendMessage 的发送器
#[derive(Debug, Clone)]
pub struct SqsScorePublisher {
    client: Client,
    queue_url: String,
}

impl SqsScorePublisher {
    pub fn new(aws_config: &SdkConfig, queue_url: impl Into<String>) -> Self {
        Self::new_from_client(Client::new(aws_config), queue_url)
    }

    pub fn new_from_client(client: Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }
}

#[async_trait]
impl ScorePublisher for SqsScorePublisher {
    #[tracing::instrument(skip(self, message), fields(user_id = %message.user_id, points = message.points))]
    async fn publish(&self, message: &ScoreMessage) -> Result<Option<String>, ProcessorError> {
        let body = message.to_body()?;

        let output = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| ProcessorError::SendMessage(DisplayErrorContext(&e).to_string()))?;

        Ok(output.message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_sqs::operation::send_message::{SendMessageError, SendMessageOutput};
    use aws_sdk_sqs::types::error::QueueDoesNotExist;
    use aws_smithy_mocks::{mock, mock_client};

    const QUEUE_URL: &str = "https://sqs.us-east-1.amazonaws.com/123456789012/score-aggregation";

    fn message() -> ScoreMessage {
        ScoreMessage::new("user-001", vec!["A".to_string(), "Drama".to_string()], -2)
    }

    #[tokio::test]
    async fn test_publish_sends_json_body_to_configured_queue() {
        let send = mock!(Client::send_message)
            .match_requests(|input| {
                let body = input
                    .message_body()
                    .and_then(|body| serde_json::from_str::<serde_json::Value>(body).ok());

                input.queue_url() == Some(QUEUE_URL)
                    && body
                        == Some(serde_json::json!({
                            "userId": "user-001",
                            "categories": ["A", "Drama"],
                            "points": -2,
                            "sender": "likes_processor"
                        }))
            })
            .then_output(|| SendMessageOutput::builder().message_id("msg-001").build());

        let client = mock_client!(aws_sdk_sqs, [&send]);
        let publisher = SqsScorePublisher::new_from_client(client, QUEUE_URL);

        let message_id = publisher.publish(&message()).await.unwrap();
        assert_eq!(message_id.as_deref(), Some("msg-001"));
        assert_eq!(send.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_publish_failure_maps_to_send_message_error() {
        let send = mock!(Client::send_message).then_error(|| {
            SendMessageError::QueueDoesNotExist(
                QueueDoesNotExist::builder()
                    .message("The specified queue does not exist.")
                    .build(),
            )
        });

        let client = mock_client!(aws_sdk_sqs, [&send]);
        let publisher = SqsScorePublisher::new_from_client(client, QUEUE_URL);

        let err = publisher.publish(&message()).await.unwrap_err();
        assert_eq!(err.code(), "SEND_MESSAGE_ERROR");
        assert!(err.is_retryable());
        assert_eq!(send.num_calls(), 1);
    }
}
