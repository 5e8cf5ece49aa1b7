use crate::{db::StoreError, mail::MailError, views};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Errors of the JSON editor API.
#[derive(Debug)]
pub enum ApiError {
    InvalidCredentials,
    UserAlreadyExists,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict(String),
    ValidationError(String),
    InternalError(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::EmailTaken => ApiError::UserAlreadyExists,
            StoreError::SlugTaken { .. } => ApiError::Conflict(err.to_string()),
            StoreError::EmptySlug => ApiError::ValidationError(err.to_string()),
            // The token outlived its user.
            StoreError::AuthorMissing(_) => ApiError::Unauthorized,
        }
    }
}

/// Convert our custom errors to HTTP responses
///
/// `IntoResponse` trait: Axum calls this to convert errors to responses
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ApiError::Conflict(msg) => {
                return (
                    StatusCode::CONFLICT,
                    Json(serde_json::json!({
                      "error": msg
                    })),
                )
                    .into_response();
            }
            ApiError::ValidationError(msg) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                      "error": msg
                    })),
                )
                    .into_response();
            }
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            Json(serde_json::json!({
              "error": message
            })),
        )
            .into_response()
    }
}

/// Errors of the HTML blog pages. Only `NotFound` is expected; the rest are
/// fatal and end up as a 500 page.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("page not found")]
    NotFound,
    #[error("template rendering failed")]
    Render(#[from] askama::Error),
    #[error("could not hand off share email")]
    Mail(#[from] MailError),
    #[error("storage failure")]
    Store(#[source] StoreError),
}

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => PageError::NotFound,
            other => PageError::Store(other),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => views::not_found_response(),
            other => {
                error!(error = ?other, "request failed");
                views::server_error_response()
            }
        }
    }
}
