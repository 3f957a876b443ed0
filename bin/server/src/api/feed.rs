//! The follower feed endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use sandpiper_social::FeedQuery;
use serde::Deserialize;

use super::{AppState, json_data, middleware::RequireAuth};
use crate::error::ApiError;

/// Raw query string parameters for `GET /v1/users/feed`.
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<String>,
    pub search: Option<String>,
    /// Comma-separated tag list.
    pub tags: Option<String>,
}

impl FeedParams {
    fn into_query(self) -> Result<FeedQuery, ApiError> {
        let tags = split_tags(self.tags.as_deref());
        FeedQuery::new(
            self.limit,
            self.offset,
            self.sort.as_deref(),
            self.search,
            tags,
        )
        .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// `GET /v1/users/feed`.
///
/// Returns posts by the users the caller follows, with the author's
/// username and a comment count on each.
pub async fn user_feed(
    State(state): State<Arc<AppState>>,
    RequireAuth(viewer): RequireAuth,
    Query(params): Query<FeedParams>,
) -> Result<Response, ApiError> {
    let query = params.into_query()?;
    let feed = state.posts().user_feed(viewer.id(), &query).await?;

    Ok(json_data(StatusCode::OK, feed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandpiper_social::SortOrder;

    #[test]
    fn tags_split_on_commas() {
        assert_eq!(
            split_tags(Some("rust, web ,backend")),
            vec!["rust", "web", "backend"]
        );
        assert!(split_tags(Some("")).is_empty());
        assert!(split_tags(None).is_empty());
    }

    #[test]
    fn params_build_a_validated_query() {
        let params = FeedParams {
            limit: Some(50),
            offset: Some(10),
            sort: Some("asc".to_owned()),
            search: Some("rust".to_owned()),
            tags: Some("web,backend".to_owned()),
        };
        let query = params.into_query().expect("valid");
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 10);
        assert_eq!(query.sort, SortOrder::Asc);
        assert_eq!(query.search, "rust");
        assert_eq!(query.tags, vec!["web", "backend"]);
    }

    #[test]
    fn invalid_limit_is_a_bad_request() {
        let params = FeedParams {
            limit: Some(0),
            ..FeedParams::default()
        };
        assert!(matches!(
            params.into_query(),
            Err(ApiError::BadRequest(_))
        ));
    }
}
