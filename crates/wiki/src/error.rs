// File: src/error.rs
// Purpose: Request-level errors and how they reach the client

use crate::form::FormError;
use crate::render::RenderError;
use crate::response::plain_text;
use crate::store::StoreError;
use crate::title::InvalidPath;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body sent for every rejected path.
pub const NOT_FOUND_BODY: &str = "404 page not found";

/// Failures a handler reports to the client.
///
/// Load failures never appear here: a page that cannot be read is treated
/// as a page that does not exist yet.
#[derive(Debug, Error)]
pub enum WikiError {
    #[error(transparent)]
    InvalidPath(#[from] InvalidPath),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// Save body too large or not a readable form; nothing is written.
    #[error(transparent)]
    Form(#[from] FormError),
}

impl WikiError {
    pub fn status(&self) -> StatusCode {
        match self {
            WikiError::InvalidPath(_) => StatusCode::NOT_FOUND,
            WikiError::Store(_) | WikiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WikiError::Form(err) => err.status(),
        }
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        match self {
            WikiError::InvalidPath(_) => plain_text(StatusCode::NOT_FOUND, NOT_FOUND_BODY),
            other => plain_text(other.status(), other.to_string()),
        }
    }
}
