use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use warbler_db::StoreError;

use crate::pages;

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("not found")]
    NotFound,

    #[error("blocking task failed: {0}")]
    Blocking(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound => {
                (StatusCode::NOT_FOUND, pages::not_found_page(None)).into_response()
            }
            err => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    pages::server_error_page(),
                )
                    .into_response()
            }
        }
    }
}
