use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::collections::BTreeMap;
use thiserror::Error;

/// Request-level failures. Each variant maps to exactly one status code;
/// handlers return these instead of building responses inline.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(BTreeMap<String, Vec<String>>),
    #[error("bad request")]
    BadRequest(BTreeMap<String, Vec<String>>),
    #[error("not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Single malformed parameter, single message.
    pub fn bad_param(param: &str, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(param.to_string(), vec![message.to_string()]);
        ApiError::BadRequest(errors)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(errors) | ApiError::BadRequest(errors) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "errors": errors }))
            }
            ApiError::NotFound => {
                HttpResponse::NotFound().json(serde_json::json!({ "detail": "Not found." }))
            }
            // Internals stay in the server log.
            ApiError::Database(e) => {
                log::error!("database error: {:?}", e);
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "detail": "Internal server error." }))
            }
            ApiError::Io(e) => {
                log::error!("io error: {:?}", e);
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "detail": "Internal server error." }))
            }
        }
    }
}
