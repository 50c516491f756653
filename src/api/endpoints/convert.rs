//! Transcript conversion endpoints.
//!
//! - `POST /convert-text?file=<path>`: legacy schema from a stored transcript
//! - `POST /v2/convert-text`: current schema from an uploaded `txt_file`
//!
//! The model call blocks, so extraction runs on the blocking pool.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::structuring::{
    ExtractedRecord, ExtractionError, SchemaVariant, TranscriptExtractor,
};

/// Multipart field carrying the uploaded transcript.
pub const UPLOAD_FIELD: &str = "txt_file";

#[derive(Deserialize)]
pub struct ConvertQuery {
    pub file: Option<String>,
}

#[derive(Serialize)]
pub struct LegacyConvertResponse {
    pub status: &'static str,
    pub data: ExtractedRecord,
}

#[derive(Serialize)]
pub struct ConvertResponse {
    pub status: &'static str,
    pub patient_data: ExtractedRecord,
}

/// `POST /convert-text?file=<path>`: extract a legacy record from a
/// transcript already on disk.
pub async fn convert_stored(
    State(ctx): State<ApiContext>,
    Query(query): Query<ConvertQuery>,
) -> Result<Json<LegacyConvertResponse>, ApiError> {
    let reference = query
        .file
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("file parameter missing".into()))?;

    let path = ctx.resolve_transcript_path(&reference)?;
    tracing::info!(path = %path.display(), "Legacy conversion requested");

    let record = run_extraction(&ctx, move |extractor| {
        extractor.extract_from_file(&path, SchemaVariant::Legacy)
    })
    .await?;

    Ok(Json(LegacyConvertResponse {
        status: "success",
        data: record,
    }))
}

/// `POST /v2/convert-text`: extract a current-schema record from an
/// uploaded transcript. The upload is decoded in memory; nothing is written
/// to disk.
pub async fn convert_upload(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut transcript: Option<String> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("<unnamed>").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| ApiError::BadRequest("Uploaded file is not valid UTF-8 text".into()))?;

        tracing::info!(file_name, bytes = text.len(), "Transcript uploaded");
        transcript = Some(text);
        break;
    }

    let transcript = transcript
        .ok_or_else(|| ApiError::BadRequest(format!("Missing `{UPLOAD_FIELD}` file field")))?;

    let record = run_extraction(&ctx, move |extractor| {
        extractor.extract(&transcript, SchemaVariant::Current)
    })
    .await?;

    Ok(Json(ConvertResponse {
        status: "success",
        patient_data: record,
    }))
}

async fn run_extraction<F>(ctx: &ApiContext, job: F) -> Result<ExtractedRecord, ApiError>
where
    F: FnOnce(&TranscriptExtractor) -> Result<ExtractedRecord, ExtractionError> + Send + 'static,
{
    let extractor = ctx.extractor.clone();
    let record = tokio::task::spawn_blocking(move || job(&extractor)).await??;
    Ok(record)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}
