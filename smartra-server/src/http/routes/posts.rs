//! Community post endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::users::UserResponse;
use crate::db::repos::{PostRepo, PostWithAuthor};
use crate::http::error::ApiError;
use crate::http::extractors::{OptionalJsonBody, QueryParams, RecordId};
use crate::http::server::AppState;
use crate::models::{NewPost, PostFilter, ValidationError, Window, WindowParams};

/// Create post fields. Any of them may come from the JSON body or the
/// query string; body values win.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePostFields {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub author_id: Option<i64>,
}

impl CreatePostFields {
    fn merge(self, fallback: Self) -> Self {
        Self {
            title: self.title.or(fallback.title),
            content: self.content.or(fallback.content),
            category: self.category.or(fallback.category),
            author_id: self.author_id.or(fallback.author_id),
        }
    }

    fn into_new_post(self) -> Result<NewPost, ValidationError> {
        Ok(NewPost {
            title: self.title.ok_or(ValidationError::Missing { field: "title" })?,
            content: self.content.ok_or(ValidationError::Missing { field: "content" })?,
            category: self.category.ok_or(ValidationError::Missing { field: "category" })?,
            author_id: self
                .author_id
                .ok_or(ValidationError::Missing { field: "author_id" })?,
        })
    }
}

/// Post response
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author_id: i64,
    pub created_at: String,
    pub author: UserResponse,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(p: PostWithAuthor) -> Self {
        let PostWithAuthor { post, author } = p;
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            category: post.category,
            author_id: post.author_id,
            created_at: post.created_at.to_rfc3339(),
            author: UserResponse::from(author),
        }
    }
}

/// Query parameters for listing posts
///
/// Spelled out rather than flattened: flattened query structs lose numeric
/// parsing.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
}

impl ListPostsParams {
    fn split(self) -> (PostFilter, Window) {
        let filter = PostFilter {
            category: self.category,
        };
        let window = Window::from(WindowParams {
            skip: self.skip,
            limit: self.limit,
        });
        (filter.normalized(), window)
    }
}

/// GET /posts - newest first
async fn list_posts(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<ListPostsParams>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let (filter, window) = params.split();
    let posts = PostRepo::new(&state.pool).list(filter, window).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// POST /posts
async fn create_post(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<CreatePostFields>,
    OptionalJsonBody(body): OptionalJsonBody<CreatePostFields>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let fields = match body {
        Some(body) => body.merge(query),
        None => query,
    };
    let post = PostRepo::new(&state.pool)
        .create(fields.into_new_post()?)
        .await?;

    tracing::info!(post_id = post.post.id, author_id = post.post.author_id, "post created");
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// GET /posts/{id}
async fn get_post(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<PostResponse>, ApiError> {
    let post = PostRepo::new(&state.pool).get(id).await?;
    Ok(Json(PostResponse::from(post)))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_fields_win_over_query() {
        let body = CreatePostFields {
            title: Some("From body".into()),
            content: Some("text".into()),
            category: None,
            author_id: None,
        };
        let query = CreatePostFields {
            title: Some("From query".into()),
            content: None,
            category: Some("question".into()),
            author_id: Some(5),
        };

        let post = body.merge(query).into_new_post().unwrap();
        assert_eq!(post.title, "From body");
        assert_eq!(post.category, "question");
        assert_eq!(post.author_id, 5);
    }

    #[test]
    fn list_params_split() {
        let params = ListPostsParams {
            skip: None,
            limit: Some(0),
            category: Some(String::new()),
        };
        let (filter, window) = params.split();
        assert_eq!(filter, PostFilter::default());
        assert_eq!(window, Window::new(0, 1));
    }

    #[test]
    fn missing_author_is_validation_error() {
        let fields = CreatePostFields {
            title: Some("t".into()),
            content: Some("c".into()),
            category: Some("tutorial".into()),
            author_id: None,
        };
        let err = fields.into_new_post().unwrap_err();
        assert!(matches!(err, ValidationError::Missing { field: "author_id" }));
    }
}
