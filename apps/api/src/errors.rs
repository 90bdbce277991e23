use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const PDF_EXTRACTION_FAILURE_MESSAGE: &str = "Could not extract enough text from this PDF. \
It may be a scanned image, password-protected, or use an unusual text encoding. \
Try uploading a DOCX version of your résumé instead.";

pub const DOCX_EXTRACTION_FAILURE_MESSAGE: &str = "Could not read enough text from this DOCX file. \
The archive may be corrupted or not a Word document.";

/// Failures a parse call can surface. Intermediate extractor errors never
/// appear here; they are logged and the next strategy is tried.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file type '{0}'. Upload a PDF, DOCX, or TXT file.")]
    UnsupportedFormat(String),

    #[error("{0}")]
    ExtractionFailure(String),

    #[error("Extracted text is too short to parse ({chars} characters).")]
    InsufficientContent { chars: usize },

    #[error("No readable text was found in the document.")]
    EmptyExtraction,

    #[error("Extraction task failed: {0}")]
    TaskFailed(String),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnsupportedFormat(_) => AppError::Validation(err.to_string()),
            ParseError::ExtractionFailure(_)
            | ParseError::InsufficientContent { .. }
            | ParseError::EmptyExtraction => AppError::UnprocessableEntity(err.to_string()),
            ParseError::TaskFailed(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_maps_to_bad_request() {
        let app: AppError = ParseError::UnsupportedFormat("odt".into()).into();
        assert_eq!(app.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_terminal_extraction_errors_map_to_unprocessable() {
        for err in [
            ParseError::ExtractionFailure(PDF_EXTRACTION_FAILURE_MESSAGE.to_string()),
            ParseError::InsufficientContent { chars: 4 },
            ParseError::EmptyExtraction,
        ] {
            let app: AppError = err.into();
            assert_eq!(app.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn test_task_failure_maps_to_internal() {
        let app: AppError = ParseError::TaskFailed("join error".into()).into();
        assert_eq!(
            app.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_pdf_failure_message_names_causes_and_docx_workaround() {
        let msg = PDF_EXTRACTION_FAILURE_MESSAGE.to_lowercase();
        assert!(msg.contains("scanned"));
        assert!(msg.contains("password"));
        assert!(msg.contains("encoding"));
        assert!(msg.contains("docx"));
    }
}
