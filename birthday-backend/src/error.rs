use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::db::DbError;

/// Errors that end a single request. The next page load starts clean.
#[derive(Debug)]
pub enum AppError {
    /// Storage fault in one of the SQLite stores
    Db(DbError),
    /// Filesystem fault in an asset folder
    Io(std::io::Error),
    /// Malformed multipart body
    Upload(String),
    /// Filename that cannot name a file inside an asset folder
    InvalidFilename(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {}", e),
            AppError::Io(e) => write!(f, "File error: {}", e),
            AppError::Upload(msg) => write!(f, "Upload failed: {}", msg),
            AppError::InvalidFilename(name) => write!(f, "Invalid filename: {:?}", name),
        }
    }
}

impl std::error::Error for AppError {}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        AppError::Db(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        AppError::Upload(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upload(_) | AppError::InvalidFilename(_) => StatusCode::BAD_REQUEST,
            AppError::Db(_) | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("{}", self);
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
