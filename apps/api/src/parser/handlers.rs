use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{DocumentFormat, RawDocument};
use crate::models::resume::{ExtractionDiagnostics, ParseResult};
use crate::parser::{parse_document, ParseOutcome};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ParseResponse {
    pub parse_id: Uuid,
    pub result: ParseResult,
    pub diagnostics: ExtractionDiagnostics,
}

impl ParseResponse {
    fn new(outcome: ParseOutcome) -> Self {
        Self {
            parse_id: Uuid::new_v4(),
            result: outcome.result,
            diagnostics: outcome.diagnostics,
        }
    }
}

#[derive(Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

struct Upload {
    file_name: String,
    bytes: Bytes,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}

fn check_size(len: usize, max: usize) -> Result<(), AppError> {
    if len > max {
        return Err(AppError::PayloadTooLarge(format!(
            "Upload is {len} bytes; the limit is {max} bytes"
        )));
    }
    Ok(())
}

/// POST /api/v1/resumes/parse
///
/// `file` carries the document; an optional `format` field (`pdf`, `docx`,
/// `txt`) overrides the file extension.
pub async fn handle_parse_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    let max = state.config.max_upload_bytes;
    let mut upload: Option<Upload> = None;
    let mut format_override: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                check_size(bytes.len(), max)?;
                upload = Some(Upload { file_name, bytes });
            }
            Some("format") => {
                format_override = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field in upload".to_string()))?;
    let format = match format_override.as_deref().map(str::trim) {
        Some(tag) if !tag.is_empty() => DocumentFormat::from_tag(tag)?,
        _ => DocumentFormat::from_file_name(&upload.file_name)?,
    };

    let doc = RawDocument::new(upload.bytes, format);
    if doc.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    info!(
        file_name = %upload.file_name,
        format = %doc.format(),
        bytes = doc.len(),
        "parse upload received"
    );

    let outcome = parse_document(doc).await?;
    Ok(Json(ParseResponse::new(outcome)))
}

/// POST /api/v1/resumes/parse/text
pub async fn handle_parse_text(
    State(state): State<AppState>,
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<ParseResponse>, AppError> {
    check_size(req.text.len(), state.config.max_upload_bytes)?;
    let doc = RawDocument::new(req.text.into_bytes(), DocumentFormat::Text);
    let outcome = parse_document(doc).await?;
    Ok(Json(ParseResponse::new(outcome)))
}
