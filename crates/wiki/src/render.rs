// File: src/render.rs
// Purpose: Turning a page into the HTML for the view and edit screens

use crate::page::Page;
use crate::title::Operation;
use maud::{html, Markup, DOCTYPE};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Screens a page can be rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    View,
    Edit,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::View => "view",
            View::Edit => "edit",
        }
    }

    /// Template file name inside a template directory.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.as_str())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("failed to render {view} template: {message}")]
pub struct RenderError {
    pub view: View,
    pub message: String,
}

impl RenderError {
    pub fn new(view: View, message: impl Into<String>) -> Self {
        Self {
            view,
            message: message.into(),
        }
    }
}

/// Problems found while loading a template directory at startup.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template {path:?} uses unknown placeholder {{{name}}}")]
    UnknownPlaceholder { path: PathBuf, name: String },
}

/// Produces the HTML for a page shown as `view`.
///
/// Implementations are loaded once at startup and shared read-only between
/// requests.
pub trait Renderer: Send + Sync {
    fn render(&self, view: View, page: &Page) -> Result<String, RenderError>;
}

// ============================================================================
// Compiled-in templates
// ============================================================================

/// Default screens written with Maud.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl BuiltinTemplates {
    fn layout(heading: Markup, content: Markup, title: &str) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    title { (title) }
                }
                body {
                    h1 { (heading) }
                    (content)
                }
            }
        }
    }

    fn view_page(page: &Page) -> Markup {
        let title = page.title.as_str();
        let body = page.body_text();
        Self::layout(
            html! { (title) },
            html! {
                p { "[" a href=(Operation::Edit.path_for(&page.title)) { "edit" } "]" }
                div { (&*body) }
            },
            title,
        )
    }

    fn edit_page(page: &Page) -> Markup {
        let title = page.title.as_str();
        let body = page.body_text();
        Self::layout(
            html! { "Editing " (title) },
            html! {
                form action=(Operation::Save.path_for(&page.title)) method="POST" {
                    div {
                        textarea name="body" rows="20" cols="80" { (&*body) }
                    }
                    div {
                        input type="submit" value="Save";
                    }
                }
            },
            title,
        )
    }
}

impl Renderer for BuiltinTemplates {
    fn render(&self, view: View, page: &Page) -> Result<String, RenderError> {
        let markup = match view {
            View::View => Self::view_page(page),
            View::Edit => Self::edit_page(page),
        };
        Ok(markup.into_string())
    }
}

// ============================================================================
// Templates loaded from disk
// ============================================================================

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("valid placeholder pattern"));

const PLACEHOLDERS: [&str; 2] = ["title", "body"];

/// `view.html` and `edit.html` read from a directory.
///
/// `{title}` and `{body}` are replaced with the HTML-escaped page title and
/// body. Any other `{name}` is rejected when the set is loaded.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    dir: PathBuf,
    view: String,
    edit: String,
}

impl TemplateSet {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let view = Self::load_one(dir, View::View)?;
        let edit = Self::load_one(dir, View::Edit)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            view,
            edit,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_one(dir: &Path, view: View) -> Result<String, TemplateError> {
        let path = dir.join(view.file_name());
        let content = fs::read_to_string(&path).map_err(|source| TemplateError::Read {
            path: path.clone(),
            source,
        })?;

        if let Some(name) = PLACEHOLDER
            .captures_iter(&content)
            .map(|caps| caps[1].to_string())
            .find(|name| !PLACEHOLDERS.contains(&name.as_str()))
        {
            return Err(TemplateError::UnknownPlaceholder { path, name });
        }

        Ok(content)
    }

    fn source(&self, view: View) -> &str {
        match view {
            View::View => &self.view,
            View::Edit => &self.edit,
        }
    }
}

impl Renderer for TemplateSet {
    fn render(&self, view: View, page: &Page) -> Result<String, RenderError> {
        let title = escape(page.title.as_str());
        let body = escape(&page.body_text());

        let html = PLACEHOLDER.replace_all(self.source(view), |caps: &regex::Captures| {
            match &caps[1] {
                "title" => title.clone(),
                "body" => body.clone(),
                other => format!("{{{}}}", other),
            }
        });
        Ok(html.into_owned())
    }
}

fn escape(raw: &str) -> String {
    html! { (raw) }.into_string()
}
