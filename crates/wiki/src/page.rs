// File: src/page.rs
// Purpose: The persisted unit of wiki content

use crate::title::Title;
use std::borrow::Cow;

/// A wiki page: a validated title plus its raw body bytes.
///
/// Pages are built per request and dropped once the response is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: Title, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title,
            body: body.into(),
        }
    }

    /// A page with no content yet, offered when editing a title that has never been saved.
    pub fn empty(title: Title) -> Self {
        Self {
            title,
            body: Vec::new(),
        }
    }

    /// Body as text; invalid UTF-8 sequences are replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
