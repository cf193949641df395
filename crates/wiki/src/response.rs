// File: src/response.rs
// Purpose: Response builders shared by the page handlers

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};

/// `302 Found` redirect to another wiki path.
///
/// ```ignore
/// RedirectResponse::found("/edit/FrontPage")
/// ```
#[derive(Debug)]
pub struct RedirectResponse {
    location: String,
}

impl RedirectResponse {
    pub fn found(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

impl IntoResponse for RedirectResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&self.location) {
            Ok(value) => {
                headers.insert(header::LOCATION, value);
            }
            Err(_) => {
                return plain_text(StatusCode::INTERNAL_SERVER_ERROR, "invalid redirect location");
            }
        }
        // Small HTML body like most servers send with a redirect
        let body = Html(format!("<a href=\"{}\">Found</a>.\n", self.location));
        (StatusCode::FOUND, headers, body).into_response()
    }
}

/// A `text/plain` response whose body is `message` plus a trailing newline.
pub fn plain_text(status: StatusCode, message: impl AsRef<str>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    (status, headers, format!("{}\n", message.as_ref())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_found() {
        let resp = RedirectResponse::found("/edit/Test").into_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get("location").unwrap(), "/edit/Test");
    }

    #[test]
    fn test_redirect_rejects_bad_location() {
        let resp = RedirectResponse::found("/view/\nTest").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_plain_text() {
        let resp = plain_text(StatusCode::NOT_FOUND, "404 page not found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers().get("x-content-type-options").unwrap(), "nosniff");
        assert!(resp
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }
}
