// File: src/title.rs
// Purpose: Title validation and operation recognition for wiki paths

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Matches `/<operation>/<title>` with nothing before or after.
static VALID_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/(view|edit|save)/([a-zA-Z0-9]+)$").expect("valid path pattern")
});

static VALID_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid title pattern"));

/// A page identifier restricted to ASCII letters and digits.
///
/// The only way to obtain a `Title` is through validation, so anything that
/// turns a title into a file name can rely on it containing no `/`, `.` or
/// other filesystem-meaningful characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    pub fn parse(raw: &str) -> Result<Self, InvalidTitle> {
        if VALID_TITLE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidTitle(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backing file name: `<title>.txt`.
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three supported actions on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    View,
    Edit,
    Save,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::View => "view",
            Operation::Edit => "edit",
            Operation::Save => "save",
        }
    }

    /// URL path for this operation on `title`, e.g. `/edit/FrontPage`.
    pub fn path_for(&self, title: &Title) -> String {
        format!("/{}/{}", self.as_str(), title)
    }

    fn from_capture(capture: &str) -> Option<Self> {
        match capture {
            "view" => Some(Operation::View),
            "edit" => Some(Operation::Edit),
            "save" => Some(Operation::Save),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request path that named a supported operation on a valid title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    pub operation: Operation,
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid page title: {0:?}")]
pub struct InvalidTitle(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid page path: {0:?}")]
pub struct InvalidPath(pub String);

/// Split a request path into its operation and title.
///
/// Anything other than exactly `/(view|edit|save)/[a-zA-Z0-9]+` is rejected,
/// including trailing slashes, query-like suffixes and `..` segments.
pub fn parse_path(path: &str) -> Result<PathMatch, InvalidPath> {
    let caps = VALID_PATH
        .captures(path)
        .ok_or_else(|| InvalidPath(path.to_string()))?;

    let operation =
        Operation::from_capture(&caps[1]).ok_or_else(|| InvalidPath(path.to_string()))?;

    Ok(PathMatch {
        operation,
        title: Title(caps[2].to_string()),
    })
}
