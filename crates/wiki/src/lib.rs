// wiki - plain-text pages addressed by title, served over HTTP
//
// Pages live in `<title>.txt` files. Titles are restricted to ASCII letters
// and digits and every request path is checked before anything touches disk.

pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod page;
pub mod render;
pub mod response;
pub mod router;
pub mod store;
pub mod title;

pub use config::Config;
pub use error::WikiError;
pub use page::Page;
pub use render::{BuiltinTemplates, RenderError, Renderer, TemplateError, TemplateSet, View};
pub use router::{router, AppState, ValidPath};
pub use store::{FileStore, LoadError, PageStore, StoreError};
pub use title::{parse_path, InvalidPath, InvalidTitle, Operation, PathMatch, Title};

// Re-export commonly used types from dependencies
pub use axum;
