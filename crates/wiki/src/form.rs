// File: src/form.rs
// Purpose: Reading the submitted page body from a save request

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderMap, StatusCode};
use std::borrow::Cow;
use thiserror::Error;

/// Name of the form field carrying the page body.
pub const BODY_FIELD: &str = "body";

/// Largest request body a save accepts (10 MiB).
pub const MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

/// How a request body carries form fields, judged by its media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEncoding {
    UrlEncoded,
    Multipart,
    Other,
}

impl FormEncoding {
    /// Media type comparison ignores case and any parameters.
    pub fn of(headers: &HeaderMap) -> Self {
        let media_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .and_then(|ct| ct.split(';').next())
            .map(str::trim)
            .unwrap_or_default();

        if media_type.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            FormEncoding::UrlEncoded
        } else if media_type.eq_ignore_ascii_case("multipart/form-data") {
            FormEncoding::Multipart
        } else {
            FormEncoding::Other
        }
    }
}

/// The request body could not be read as a form.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FormError {
    status: StatusCode,
    message: String,
}

impl FormError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<BytesRejection> for FormError {
    fn from(rejection: BytesRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartRejection> for FormError {
    fn from(rejection: MultipartRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for FormError {
    fn from(err: MultipartError) -> Self {
        Self {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

/// Look up `field` in the submitted form data.
///
/// An urlencoded or multipart request body is consulted first, then the URL
/// query string. Values are raw bytes; urlencoded values are percent-decoded
/// with `+` standing for a space. File uploads in a multipart body are not
/// form values and are skipped. Returns `Ok(None)` when the field is absent.
pub async fn form_value(request: Request, field: &str) -> Result<Option<Vec<u8>>, FormError> {
    let query = request.uri().query().map(str::to_owned);

    let posted = match FormEncoding::of(request.headers()) {
        FormEncoding::UrlEncoded => {
            let body = Bytes::from_request(request, &()).await?;
            find_field(&body, field)
        }
        FormEncoding::Multipart => {
            let multipart = Multipart::from_request(request, &()).await?;
            multipart_field(multipart, field).await?
        }
        FormEncoding::Other => None,
    };

    Ok(posted.or_else(|| query.and_then(|q| find_field(q.as_bytes(), field))))
}

async fn multipart_field(
    mut multipart: Multipart,
    field: &str,
) -> Result<Option<Vec<u8>>, MultipartError> {
    while let Some(part) = multipart.next_field().await? {
        if part.name() == Some(field) && part.file_name().is_none() {
            return Ok(Some(part.bytes().await?.to_vec()));
        }
    }
    Ok(None)
}

/// First value of `field` in an `a=1&b=2` encoded string.
fn find_field(encoded: &[u8], field: &str) -> Option<Vec<u8>> {
    encoded
        .split(|b| *b == b'&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (key, value) = match pair.iter().position(|b| *b == b'=') {
                Some(i) => (&pair[..i], &pair[i + 1..]),
                None => (pair, &pair[pair.len()..]),
            };
            (&*decode(key) == field.as_bytes()).then(|| decode(value).into_owned())
        })
}

fn decode(raw: &[u8]) -> Cow<'_, [u8]> {
    if raw.contains(&b'+') {
        let spaced: Vec<u8> = raw.iter().map(|b| if *b == b'+' { b' ' } else { *b }).collect();
        Cow::Owned(urlencoding::decode_binary(&spaced).into_owned())
    } else {
        urlencoding::decode_binary(raw)
    }
}
