use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use palette_pack::ReformError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Cannot decode image: {0}")]
    Decode(String),

    #[error("Invalid settings: {0}")]
    Reform(#[from] ReformError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Decode(msg) => ApiError::Decode(msg),
            PipelineError::Core(e) => ApiError::Reform(e),
            PipelineError::InvalidPrefix(_) | PipelineError::ZeroTargetSize(_) => {
                ApiError::BadRequest(e.to_string())
            }
            PipelineError::Config { .. }
            | PipelineError::PngEncode(_)
            | PipelineError::Io(_)
            | PipelineError::Task(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

/// Failures of a single reform run on the host side.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("{0}")]
    Core(#[from] ReformError),

    #[error("Invalid name prefix '{0}': expected a C identifier")]
    InvalidPrefix(String),

    #[error("Target {0} must be greater than zero")]
    ZeroTargetSize(&'static str),

    #[error("Invalid config file {path}: {message}")]
    Config { path: String, message: String },

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reform task failed: {0}")]
    Task(String),
}

impl From<image::ImageError> for PipelineError {
    fn from(e: image::ImageError) -> Self {
        PipelineError::Decode(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Reform(_) => StatusCode::BAD_REQUEST,
            ApiError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_bad_request() {
        let error = ApiError::BadRequest("depth must be a number".to_string());
        assert_eq!(error.to_string(), "Bad request: depth must be a number");
    }

    #[test]
    fn test_api_error_reform() {
        let error = ApiError::Reform(ReformError::InvalidDepth(3));
        assert_eq!(
            error.to_string(),
            "Invalid settings: invalid color depth 3 (expected 1, 4 or 8)"
        );
    }

    #[test]
    fn test_pipeline_error_core_is_transparent() {
        let error = PipelineError::Core(ReformError::UnknownDitherKernel("Bayer".to_string()));
        assert_eq!(error.to_string(), "unknown dither kernel: Bayer");
    }

    #[test]
    fn test_pipeline_error_prefix() {
        let error = PipelineError::InvalidPrefix("9lives".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid name prefix '9lives': expected a C identifier"
        );
    }

    #[test]
    fn test_pipeline_error_io_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: PipelineError = io_error.into();
        assert!(matches!(error, PipelineError::Io(_)));
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Reform(ReformError::InvalidDepth(2)),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Decode("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_pipeline_to_api_mapping() {
        assert!(matches!(
            ApiError::from(PipelineError::Decode("bad".into())),
            ApiError::Decode(_)
        ));
        assert!(matches!(
            ApiError::from(PipelineError::InvalidPrefix("1x".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(PipelineError::ZeroTargetSize("height")),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(PipelineError::Task("panicked".into())),
            ApiError::Internal(_)
        ));
    }
}
