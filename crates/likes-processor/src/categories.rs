//! 内容分类解析
//!
//! 元数据表中 actors、directors、genres 三个字段均为逗号分隔的名称列表，
//! 三者合并去重后即为一次点赞影响的全部分类。

use std::collections::BTreeSet;

/// 元数据表中的一条内容记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieMetadata {
    pub directory: String,
    pub title: String,
    /// 逗号分隔，属性缺失时为空串
    pub actors: String,
    pub directors: String,
    pub genres: String,
}

impl MovieMetadata {
    /// 解析全部分类，结果有序且去重
    pub fn categories(&self) -> BTreeSet<String> {
        parse_categories([
            self.actors.as_str(),
            self.directors.as_str(),
            self.genres.as_str(),
        ])
    }
}

/// 拆分若干逗号分隔字段并合并
///
/// 连续逗号或首尾逗号产生的空片段会被丢弃，名称本身不做 trim，保持与元数据表一致。
pub fn parse_categories<'a>(fields: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    fields
        .into_iter()
        .flat_map(|field| field.split(','))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_segments_dropped() {
        let categories = parse_categories(["a,b,,c"]);
        assert_eq!(
            categories.into_iter().collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_leading_and_trailing_commas() {
        let categories = parse_categories([",Drama,", ","]);
        assert_eq!(categories.len(), 1);
        assert!(categories.contains("Drama"));
    }

    #[test]
    fn test_union_deduplicates_across_fields() {
        let metadata = MovieMetadata {
            directory: "movie-001".to_string(),
            title: "Unforgiven".to_string(),
            actors: "Clint Eastwood,Gene Hackman".to_string(),
            directors: "Clint Eastwood".to_string(),
            genres: "Western,Drama".to_string(),
        };

        let categories: Vec<_> = metadata.categories().into_iter().collect();
        assert_eq!(
            categories,
            vec!["Clint Eastwood", "Drama", "Gene Hackman", "Western"]
        );
    }

    #[test]
    fn test_all_fields_empty() {
        let metadata = MovieMetadata {
            directory: "movie-002".to_string(),
            title: "Untitled".to_string(),
            ..Default::default()
        };
        assert!(metadata.categories().is_empty());
    }
}
