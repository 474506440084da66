//! Pattern endpoints
//!
//! Creation takes a multipart form so a cover image and a pattern file can
//! be attached. Text fields are validated before anything is written to
//! the upload store.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::users::UserResponse;
use crate::db::repos::{PatternRepo, PatternWithAuthor};
use crate::http::error::ApiError;
use crate::http::extractors::{QueryParams, RecordId};
use crate::http::server::AppState;
use crate::models::{PatternFields, PatternFilter, Window, WindowParams};

/// Pattern response
#[derive(Debug, Serialize)]
pub struct PatternResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub yarn_weight: Option<String>,
    pub needle_size: Option<String>,
    pub estimated_time: Option<String>,
    pub image_url: Option<String>,
    pub pattern_file_url: Option<String>,
    pub author_id: i64,
    pub created_at: String,
    pub is_public: bool,
    pub author: UserResponse,
}

impl From<PatternWithAuthor> for PatternResponse {
    fn from(p: PatternWithAuthor) -> Self {
        let PatternWithAuthor { pattern, author } = p;
        Self {
            id: pattern.id,
            title: pattern.title,
            description: pattern.description,
            difficulty: pattern.difficulty,
            category: pattern.category,
            yarn_weight: pattern.yarn_weight,
            needle_size: pattern.needle_size,
            estimated_time: pattern.estimated_time,
            image_url: pattern.image_url,
            pattern_file_url: pattern.pattern_file_url,
            author_id: pattern.author_id,
            created_at: pattern.created_at.to_rfc3339(),
            is_public: pattern.is_public,
            author: UserResponse::from(author),
        }
    }
}

/// Query parameters for listing patterns
#[derive(Debug, Default, Deserialize)]
pub struct ListPatternsParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
}

impl ListPatternsParams {
    fn split(self) -> (PatternFilter, Window) {
        let filter = PatternFilter {
            difficulty: self.difficulty,
            category: self.category,
        };
        let window = Window::from(WindowParams {
            skip: self.skip,
            limit: self.limit,
        });
        (filter.normalized(), window)
    }
}

/// File part of the form
struct UploadedFile {
    name: String,
    bytes: Bytes,
}

/// Parsed multipart form
#[derive(Default)]
struct PatternForm {
    fields: PatternFields,
    image: Option<UploadedFile>,
    pattern_file: Option<UploadedFile>,
}

async fn read_form(multipart: &mut Multipart) -> Result<PatternForm, ApiError> {
    let mut form = PatternForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "image" | "pattern_file" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                let file = Some(UploadedFile {
                    name: file_name,
                    bytes,
                });
                if name == "image" {
                    form.image = file;
                } else {
                    form.pattern_file = file;
                }
            }
            _ => {
                let value = field.text().await?;
                if !form.fields.set(&name, value) {
                    tracing::debug!(field = %name, "ignoring unknown pattern form field");
                }
            }
        }
    }

    Ok(form)
}

/// GET /patterns - public patterns only
async fn list_patterns(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<ListPatternsParams>,
) -> Result<Json<Vec<PatternResponse>>, ApiError> {
    let (filter, window) = params.split();
    let patterns = PatternRepo::new(&state.pool).list(filter, window).await?;
    Ok(Json(patterns.into_iter().map(PatternResponse::from).collect()))
}

/// Store the attachments, then insert the row.
///
/// Every URL written is pushed to `stored` before the next step runs, so
/// the caller can remove the files if a later step fails.
async fn store_and_insert(
    state: &AppState,
    form: PatternForm,
    stored: &mut Vec<String>,
) -> Result<PatternWithAuthor, ApiError> {
    let mut new = form.fields.into_new_pattern()?;

    if let Some(image) = form.image {
        let url = state.uploads.save(&image.name, &image.bytes).await?;
        stored.push(url.clone());
        new.image_url = Some(url);
    }
    if let Some(file) = form.pattern_file {
        let url = state.uploads.save(&file.name, &file.bytes).await?;
        stored.push(url.clone());
        new.pattern_file_url = Some(url);
    }

    Ok(PatternRepo::new(&state.pool).create(new).await?)
}

/// POST /patterns - multipart form with optional `image` and `pattern_file`
async fn create_pattern(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<PatternResponse>), ApiError> {
    let mut multipart = multipart?;
    let form = read_form(&mut multipart).await?;

    let mut stored = Vec::new();
    let pattern = match store_and_insert(&state, form, &mut stored).await {
        Ok(pattern) => pattern,
        Err(e) => {
            state.uploads.discard(&stored).await;
            return Err(e);
        }
    };

    tracing::info!(
        pattern_id = pattern.pattern.id,
        author_id = pattern.pattern.author_id,
        "pattern created"
    );

    Ok((StatusCode::CREATED, Json(PatternResponse::from(pattern))))
}

/// GET /patterns/{id}
async fn get_pattern(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<PatternResponse>, ApiError> {
    let pattern = PatternRepo::new(&state.pool).get(id).await?;
    Ok(Json(PatternResponse::from(pattern)))
}

/// Pattern routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/patterns", get(list_patterns).post(create_pattern))
        .route("/patterns/", get(list_patterns).post(create_pattern))
        .route("/patterns/{id}", get(get_pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_defaults() {
        let (filter, window) = ListPatternsParams::default().split();
        assert_eq!(filter, PatternFilter::default());
        assert_eq!(window, Window::default());
    }

    #[test]
    fn list_params_empty_filters_ignored() {
        let params = ListPatternsParams {
            skip: Some(10),
            limit: Some(500),
            difficulty: Some(String::new()),
            category: Some("sweater".into()),
        };
        let (filter, window) = params.split();
        assert_eq!(filter.difficulty, None);
        assert_eq!(filter.category.as_deref(), Some("sweater"));
        assert_eq!(window, Window::new(10, 100));
    }
}
