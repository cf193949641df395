// File: src/router.rs
// Purpose: Shared state, path validation and route table

use crate::config::Config;
use crate::error::WikiError;
use crate::form::MAX_FORM_BYTES;
use crate::handlers;
use crate::render::{BuiltinTemplates, Renderer, TemplateError, TemplateSet};
use crate::store::{FileStore, PageStore};
use crate::title::{parse_path, PathMatch};
use axum::async_trait;
use axum::extract::{DefaultBodyLimit, FromRequestParts};
use axum::http::request::Parts;
use axum::routing::any;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
///
/// Both members are read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PageStore>,
    pub renderer: Arc<dyn Renderer>,
}

impl AppState {
    pub fn new(store: impl PageStore + 'static, renderer: impl Renderer + 'static) -> Self {
        Self {
            store: Arc::new(store),
            renderer: Arc::new(renderer),
        }
    }

    /// File store under `storage.data_dir`; templates from `templates.dir`
    /// when set, otherwise the compiled-in ones.
    pub fn from_config(config: &Config) -> Result<Self, TemplateError> {
        let store = FileStore::new(&config.storage.data_dir);

        let renderer: Arc<dyn Renderer> = match &config.templates.dir {
            Some(dir) => {
                let set = TemplateSet::load(dir)?;
                info!("Templates: {:?}", set.dir());
                Arc::new(set)
            }
            None => {
                info!("Templates: built-in");
                Arc::new(BuiltinTemplates)
            }
        };

        info!("Pages: {:?} ({})", store.root(), store.name());

        Ok(Self {
            store: Arc::new(store),
            renderer,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.name())
            .finish()
    }
}

/// The request path, checked against `/(view|edit|save)/<title>`.
///
/// Extraction fails with a 404 before the handler runs, so an invalid path
/// never reaches the store.
#[derive(Debug, Clone)]
pub struct ValidPath(pub PathMatch);

#[async_trait]
impl<S> FromRequestParts<S> for ValidPath
where
    S: Send + Sync,
{
    type Rejection = WikiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ValidPath(parse_path(parts.uri.path())?))
    }
}

/// Build the wiki's route table.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/view/*rest", any(handlers::view_page))
        .route("/edit/*rest", any(handlers::edit_page))
        .route("/save/*rest", any(handlers::save_page))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
