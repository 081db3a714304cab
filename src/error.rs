//! API error type and its HTTP mapping

use actix_web::error::{BlockingError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use std::io;
use thiserror::Error;

pub const PERMISSION_DENIED_MESSAGE: &str = "Permission denied. Cannot access the directory.";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    InvalidPath(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    PermissionDenied(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// Map a listing failure: refused access gets the fixed 403 message
    pub fn from_listing(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => {
                ApiError::PermissionDenied(PERMISSION_DENIED_MESSAGE.to_string())
            }
            _ => ApiError::from(err),
        }
    }
}

impl From<io::Error> for ApiError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => ApiError::PermissionDenied(err.to_string()),
            io::ErrorKind::NotFound => ApiError::NotFound(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPath(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

/// `web::JsonConfig` error handler turning malformed bodies into `{error}` 400s
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected request body: {}", err);
    ApiError::InvalidInput(format!("Invalid request body: {}", err)).into()
}

pub type ApiResult<T> = Result<T, ApiError>;
