//! User endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, QueryParams, RecordId};
use crate::http::server::AppState;
use crate::models::{NewUser, Window, WindowParams};

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// GET /users
async fn list_users(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<WindowParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepo::new(&state.pool).list(Window::from(params)).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /users
async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = UserRepo::new(&state.pool).create(req).await?;
    tracing::info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.pool).get(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
}
