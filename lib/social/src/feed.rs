//! Feed query parameters and validation.
//!
//! The feed endpoint accepts pagination, sorting and filtering options
//! from the query string. Bounds are enforced here so both the API layer
//! and the repository can rely on them.

use crate::error::FeedQueryError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum number of posts per page.
pub const MAX_LIMIT: i64 = 100;
/// Maximum number of tag filters.
pub const MAX_TAGS: usize = 5;

/// Sort order for feed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Returns the SQL keyword for this order.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = FeedQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(FeedQueryError::InvalidSort {
                sort: other.to_string(),
            }),
        }
    }
}

/// Validated feed query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedQuery {
    pub limit: i64,
    pub offset: i64,
    pub sort: SortOrder,
    /// Substring matched against title and content; empty matches all.
    pub search: String,
    /// Posts must carry every listed tag; empty matches all.
    pub tags: Vec<String>,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            sort: SortOrder::Desc,
            search: String::new(),
            tags: Vec::new(),
        }
    }
}

impl FeedQuery {
    /// Builds a validated query from raw parameters, applying defaults
    /// for missing values.
    pub fn new(
        limit: Option<i64>,
        offset: Option<i64>,
        sort: Option<&str>,
        search: Option<String>,
        tags: Vec<String>,
    ) -> Result<Self, FeedQueryError> {
        let defaults = Self::default();

        let limit = limit.unwrap_or(defaults.limit);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(FeedQueryError::InvalidLimit { limit });
        }

        let offset = offset.unwrap_or(defaults.offset);
        if offset < 0 {
            return Err(FeedQueryError::InvalidOffset { offset });
        }

        let sort = match sort {
            Some(s) => SortOrder::from_str(s)?,
            None => defaults.sort,
        };

        if tags.len() > MAX_TAGS {
            return Err(FeedQueryError::InvalidTags {
                reason: format!("at most {MAX_TAGS} tags, got {}", tags.len()),
            });
        }
        if let Some(tag) = tags.iter().find(|t| t.len() < 2 || t.len() > 30) {
            return Err(FeedQueryError::InvalidTags {
                reason: format!("tag '{tag}' must be between 2 and 30 characters"),
            });
        }

        Ok(Self {
            limit,
            offset,
            sort,
            search: search.unwrap_or_default(),
            tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_is_twenty_newest() {
        let query = FeedQuery::default();
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
        assert_eq!(query.sort, SortOrder::Desc);
        assert!(query.search.is_empty());
        assert!(query.tags.is_empty());
    }

    #[test]
    fn missing_params_get_defaults() {
        let query = FeedQuery::new(None, None, None, None, vec![]).expect("should validate");
        assert_eq!(query, FeedQuery::default());
    }

    #[test]
    fn limit_out_of_range_is_rejected() {
        assert!(FeedQuery::new(Some(0), None, None, None, vec![]).is_err());
        assert!(FeedQuery::new(Some(101), None, None, None, vec![]).is_err());
        assert!(FeedQuery::new(Some(100), None, None, None, vec![]).is_ok());
    }

    #[test]
    fn negative_offset_is_rejected() {
        assert!(FeedQuery::new(None, Some(-1), None, None, vec![]).is_err());
    }

    #[test]
    fn unknown_sort_is_rejected() {
        assert!(FeedQuery::new(None, None, Some("sideways"), None, vec![]).is_err());
        let query = FeedQuery::new(None, None, Some("asc"), None, vec![]).expect("valid");
        assert_eq!(query.sort, SortOrder::Asc);
    }

    #[test]
    fn too_many_tags_are_rejected() {
        let tags: Vec<String> = (0..6).map(|i| format!("tag{i}")).collect();
        assert!(FeedQuery::new(None, None, None, None, tags).is_err());
    }

    #[test]
    fn short_tag_is_rejected() {
        assert!(FeedQuery::new(None, None, None, None, vec!["x".to_string()]).is_err());
    }

    #[test]
    fn sort_order_sql_keywords() {
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
    }
}
