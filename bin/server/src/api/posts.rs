//! Post and comment endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use sandpiper_core::PostId;
use sandpiper_social::{Comment, CommentWithAuthor, Post, Role, User};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{AppState, json_data, middleware::RequireAuth};
use crate::error::ApiError;

/// Payload for `POST /v1/posts`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostPayload {
    #[validate(length(min = 1, max = 30))]
    pub title: String,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    #[validate(custom = "validate_tags")]
    pub tags: Vec<String>,
}

/// Payload for `PATCH /v1/posts/{post_id}`. All fields optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostPayload {
    #[validate(length(min = 1, max = 30))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Payload for `POST /v1/posts/{post_id}/comments`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentPayload {
    #[validate(length(min = 3, max = 1000))]
    pub content: String,
}

/// A post with its comments, as returned by the detail endpoint.
#[derive(Debug, Serialize)]
struct PostWithComments {
    #[serde(flatten)]
    post: Post,
    comments: Vec<CommentWithAuthor>,
}

/// One to five tags, each 2 to 30 characters, no duplicates.
fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    if tags.is_empty() {
        return Err(ValidationError::new("missing_tags"));
    }
    if tags.len() > 5 {
        return Err(ValidationError::new("too_many_tags"));
    }
    for (i, tag) in tags.iter().enumerate() {
        if tag.len() < 2 || tag.len() > 30 {
            return Err(ValidationError::new("tag_length"));
        }
        if tags[..i].contains(tag) {
            return Err(ValidationError::new("duplicate_tag"));
        }
    }
    Ok(())
}

/// Checks that `user` may modify `post`: the author always may, anyone
/// else needs at least `required`.
fn authorize(user: &User, post: &Post, required: Role) -> Result<(), ApiError> {
    if post.is_authored_by(user.id()) || user.role().satisfies(required) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// `POST /v1/posts`.
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    RequireAuth(author): RequireAuth,
    Json(payload): Json<CreatePostPayload>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let post = Post::new(payload.title, payload.content, payload.tags, author.id());
    state.posts().create(&post).await?;

    tracing::info!(post_id = %post.id(), "post created");
    Ok(json_data(StatusCode::CREATED, post))
}

/// `GET /v1/posts/{post_id}`. Includes the post's comments.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    RequireAuth(_viewer): RequireAuth,
    Path(post_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_post_id(&post_id)?;
    let post = find_post(&state, id).await?;
    let comments = state.comments().find_by_post_id(id).await?;

    Ok(json_data(StatusCode::OK, PostWithComments { post, comments }))
}

/// `PATCH /v1/posts/{post_id}`.
///
/// Author or moderator only. The stored version must still match the
/// version the post was loaded at, otherwise a concurrent update wins
/// and the request gets a 409.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Path(post_id): Path<String>,
    Json(payload): Json<UpdatePostPayload>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let id = parse_post_id(&post_id)?;
    let mut post = find_post(&state, id).await?;
    authorize(&user, &post, Role::Moderator)?;

    if let Some(title) = payload.title {
        post.set_title(title);
    }
    if let Some(content) = payload.content {
        post.set_content(content);
    }
    if let Some(tags) = payload.tags {
        validate_tags(&tags).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        post.set_tags(tags);
    }

    let version = state.posts().update(&post).await?;
    post.set_version(version);

    Ok(json_data(StatusCode::OK, post))
}

/// `DELETE /v1/posts/{post_id}`. Author or admin only.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Path(post_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_post_id(&post_id)?;
    let post = find_post(&state, id).await?;
    authorize(&user, &post, Role::Admin)?;

    state.posts().delete(id).await?;
    tracing::info!(post_id = %id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /v1/posts/{post_id}/comments`.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    RequireAuth(author): RequireAuth,
    Path(post_id): Path<String>,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let id = parse_post_id(&post_id)?;
    // Commenting on a missing post is a 404, not a constraint error.
    find_post(&state, id).await?;

    let comment = Comment::new(id, author.id(), payload.content);
    state.comments().create(&comment).await?;

    Ok(json_data(StatusCode::CREATED, comment))
}

fn parse_post_id(raw: &str) -> Result<PostId, ApiError> {
    PostId::from_str(raw).map_err(|_| ApiError::BadRequest("invalid post id".to_owned()))
}

async fn find_post(state: &AppState, id: PostId) -> Result<Post, ApiError> {
    state
        .posts()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("post not found".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sandpiper_core::UserId;
    use sandpiper_social::PasswordHash;

    fn user_with_role(role: Role) -> User {
        let mut user = User::new(
            "Ada".to_owned(),
            "Lovelace".to_owned(),
            "ada".to_owned(),
            "ada@example.com".to_owned(),
            PasswordHash::from_stored("$2b$12$stub".to_owned()),
        );
        user.set_role(role);
        user
    }

    fn post_by(author: UserId) -> Post {
        Post::new("title".to_owned(), "content".to_owned(), vec![], author)
    }

    #[test]
    fn author_may_always_modify() {
        let user = user_with_role(Role::User);
        let post = post_by(user.id());
        assert!(authorize(&user, &post, Role::Admin).is_ok());
    }

    #[test]
    fn plain_user_may_not_touch_others_posts() {
        let user = user_with_role(Role::User);
        let post = post_by(UserId::new());
        assert!(authorize(&user, &post, Role::Moderator).is_err());
    }

    #[test]
    fn moderator_may_update_but_not_delete() {
        let user = user_with_role(Role::Moderator);
        let post = post_by(UserId::new());
        assert!(authorize(&user, &post, Role::Moderator).is_ok());
        assert!(authorize(&user, &post, Role::Admin).is_err());
    }

    #[test]
    fn admin_may_delete_any_post() {
        let user = user_with_role(Role::Admin);
        let post = post_by(UserId::new());
        assert!(authorize(&user, &post, Role::Admin).is_ok());
    }

    #[test]
    fn tag_rules() {
        assert!(validate_tags(&vec!["rust".to_owned()]).is_ok());
        assert!(validate_tags(&vec!["rust".to_owned(), "web".to_owned()]).is_ok());
        assert!(validate_tags(&vec!["x".to_owned()]).is_err());
        assert!(validate_tags(&vec!["rust".to_owned(), "rust".to_owned()]).is_err());
        let many: Vec<String> = (0..6).map(|i| format!("tag{i}")).collect();
        assert!(validate_tags(&many).is_err());
    }

    #[test]
    fn a_post_needs_at_least_one_tag() {
        assert!(validate_tags(&vec![]).is_err());

        let untagged = CreatePostPayload {
            title: "hello".to_owned(),
            content: "world".to_owned(),
            tags: vec![],
        };
        assert!(untagged.validate().is_err());
    }

    #[test]
    fn create_payload_validation() {
        let payload = CreatePostPayload {
            title: "hello".to_owned(),
            content: "world".to_owned(),
            tags: vec!["rust".to_owned()],
        };
        assert!(payload.validate().is_ok());

        let long_title = CreatePostPayload {
            title: "t".repeat(31),
            content: "world".to_owned(),
            tags: vec!["rust".to_owned()],
        };
        assert!(long_title.validate().is_err());
    }

    #[test]
    fn comment_content_bounds() {
        let ok = CreateCommentPayload {
            content: "nice post".to_owned(),
        };
        assert!(ok.validate().is_ok());

        let too_short = CreateCommentPayload {
            content: "hm".to_owned(),
        };
        assert!(too_short.validate().is_err());

        let too_long = CreateCommentPayload {
            content: "c".repeat(1001),
        };
        assert!(too_long.validate().is_err());
    }
}
