//! smartra-server: HTTP backend for the knitting community platform
//!
//! Users, patterns (with image and file attachments), community posts, and
//! the yarn calculator from `smartra-core`, served over axum with Postgres
//! storage through sqlx.

pub mod db;
pub mod http;
pub mod models;
pub mod uploads;

pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use uploads::{UploadError, UploadStore};
