//! 元数据表查询
//!
//! 按 directory 分区键查询元数据表，只接受带非空 title 的记录。
//! 通过 trait 抽象以支持单元测试中的 mock 注入。

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use crate::categories::MovieMetadata;
use crate::error::ProcessorError;

/// 元数据查询的抽象接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// 查询目录对应的有效元数据，不存在时返回 None
    async fn find_by_directory(
        &self,
        directory: &str,
    ) -> Result<Option<MovieMetadata>, ProcessorError>;
}

/// 基于 DynamoDB Query 的元数据存储
#[derive(Debug, Clone)]
pub struct DynamoMetadataStore {
    client: Client,
    table: String,
}

impl DynamoMetadataStore {
    pub fn new(aws_config: &SdkConfig, table: impl Into<String>) -> Self {
        Self::new_from_client(Client::new(aws_config), table)
    }

    pub fn new_from_client(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl MetadataStore for DynamoMetadataStore {
    /// FilterExpression 在读取之后才生效，单页可能被过滤成空但仍带有 LastEvaluatedKey，
    /// 因此沿分页继续查找，直到命中或没有下一页
    #[tracing::instrument(skip(self), fields(table = %self.table))]
    async fn find_by_directory(
        &self,
        directory: &str,
    ) -> Result<Option<MovieMetadata>, ProcessorError> {
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;
        let mut page = 0u32;

        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table)
                .key_condition_expression("directory = :directory")
                .filter_expression("attribute_exists(title)")
                .expression_attribute_values(
                    ":directory",
                    AttributeValue::S(directory.to_string()),
                )
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(|e| ProcessorError::MetadataQuery {
                    directory: directory.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                })?;

            page += 1;
            let items = output.items.unwrap_or_default();
            debug!(page, count = items.len(), "元数据查询返回");

            if let Some(metadata) = items
                .iter()
                .find_map(|item| metadata_from_item(directory, item))
            {
                return Ok(Some(metadata));
            }

            match output.last_evaluated_key {
                Some(key) => exclusive_start_key = Some(key),
                None => return Ok(None),
            }
        }
    }
}

/// 将 DynamoDB 属性映射转换为元数据，title 缺失或为空时视为无效记录
pub fn metadata_from_item(
    directory: &str,
    item: &HashMap<String, AttributeValue>,
) -> Option<MovieMetadata> {
    let title = string_attr(item, "title").filter(|title| !title.is_empty())?;

    Some(MovieMetadata {
        directory: string_attr(item, "directory")
            .unwrap_or(directory)
            .to_string(),
        title: title.to_string(),
        actors: string_attr(item, "actors").unwrap_or_default().to_string(),
        directors: string_attr(item, "directors").unwrap_or_default().to_string(),
        genres: string_attr(item, "genres").unwrap_or_default().to_string(),
    })
}

fn string_attr<'a>(item: &'a HashMap<String, AttributeValue>, name: &str) -> Option<&'a str> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Some(value.as_str()),
        _ => None,
    }
}
