//! Attachment storage on the local filesystem
//!
//! Files are written under `{uuid}_{sanitized original name}` so two
//! uploads with the same name never collide, and the returned URL stays
//! valid for as long as the file exists.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// URL prefix under which stored files are served
pub const DEFAULT_URL_PREFIX: &str = "/uploads";

/// Anything outside this set is replaced in stored file names
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("invalid filename regex"));

/// Upload error type
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create upload directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Stores uploaded bytes and hands back retrieval URLs
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    url_prefix: String,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_prefix(root, DEFAULT_URL_PREFIX)
    }

    pub fn with_prefix(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_owned(),
        }
    }

    /// Directory files are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Create the storage directory if needed.
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| UploadError::CreateDir {
                path: self.root.clone(),
                source,
            })
    }

    /// Write `bytes` and return the URL the file is served from.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_name));
        let path = self.root.join(&stored_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| UploadError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "stored upload");
        Ok(format!("{}/{}", self.url_prefix, stored_name))
    }

    /// Map a URL returned by [`save`](Self::save) back to its file.
    ///
    /// Returns `None` for URLs outside this store.
    pub fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(&self.url_prefix)?.strip_prefix('/')?;
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return None;
        }
        Some(self.root.join(name))
    }

    /// Best-effort removal of stored files whose record was never written.
    pub async fn discard(&self, urls: &[String]) {
        for url in urls {
            let Some(path) = self.path_for(url) else {
                continue;
            };
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "discarded upload"),
                Err(e) => tracing::warn!(path = %path.display(), "failed to discard upload: {}", e),
            }
        }
    }

    /// Whether the storage directory exists and is a directory.
    pub async fn is_ready(&self) -> bool {
        tokio::fs::metadata(&self.root)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }
}

/// Reduce a client-supplied name to a safe single path component.
pub fn sanitize_filename(name: &str) -> String {
    // Clients on Windows send backslash-separated paths
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = UNSAFE_CHARS.replace_all(last, "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "file".to_owned()
    } else {
        cleaned.to_owned()
    }
}
