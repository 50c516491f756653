//! Shared state for extraction handlers.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::config::ServerConfig;
use crate::pipeline::structuring::TranscriptExtractor;

const OUTSIDE_DATA_DIR: &str = "file must be a relative path inside the data directory";

/// Handler state. Cheap to clone; holds no per-request data.
#[derive(Clone)]
pub struct ApiContext {
    pub extractor: Arc<TranscriptExtractor>,
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl ApiContext {
    pub fn new(extractor: Arc<TranscriptExtractor>, server: &ServerConfig) -> Self {
        Self {
            extractor,
            data_dir: server.data_dir.clone(),
            max_upload_bytes: server.max_upload_bytes,
        }
    }

    /// Resolve a client-supplied transcript reference against the data
    /// directory.
    ///
    /// Absolute paths and `..` segments are rejected outright. An existing
    /// file is canonicalized and must still live under the data directory,
    /// so symlinks cannot point elsewhere. A missing file resolves normally
    /// and fails later as not found.
    pub fn resolve_transcript_path(&self, reference: &str) -> Result<PathBuf, ApiError> {
        let relative = Path::new(reference);
        let confined = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !confined {
            tracing::warn!(reference, "Rejected transcript reference outside data directory");
            return Err(ApiError::BadRequest(OUTSIDE_DATA_DIR.into()));
        }

        let candidate = self.data_dir.join(relative);
        if !candidate.exists() {
            return Ok(candidate);
        }

        let root = self
            .data_dir
            .canonicalize()
            .map_err(|e| ApiError::Internal(format!("Data directory unavailable: {e}")))?;
        let resolved = candidate
            .canonicalize()
            .map_err(|e| ApiError::Internal(format!("Cannot resolve transcript path: {e}")))?;

        if !resolved.starts_with(&root) {
            tracing::warn!(reference, "Transcript reference resolves outside data directory");
            return Err(ApiError::BadRequest(OUTSIDE_DATA_DIR.into()));
        }

        Ok(resolved)
    }
}
