// File: src/handlers.rs
// Purpose: The view, edit and save operations

use crate::error::{WikiError, NOT_FOUND_BODY};
use crate::form::{form_value, BODY_FIELD};
use crate::page::Page;
use crate::render::View;
use crate::response::{plain_text, RedirectResponse};
use crate::router::{AppState, ValidPath};
use crate::title::{InvalidPath, Operation, PathMatch, Title};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::debug;

/// Show a stored page, or send the client to the editor if there is none.
pub async fn view_page(
    State(state): State<AppState>,
    ValidPath(path): ValidPath,
) -> Result<Response, WikiError> {
    let title = expect_operation(path, Operation::View)?;

    match state.store.load(&title).await {
        Ok(page) => render(&state, View::View, &page),
        Err(err) => {
            debug!(missing = err.is_not_found(), "{}; redirecting to editor", err);
            Ok(RedirectResponse::found(Operation::Edit.path_for(&title)).into_response())
        }
    }
}

/// Show the edit form, starting from an empty body for new pages.
pub async fn edit_page(
    State(state): State<AppState>,
    ValidPath(path): ValidPath,
) -> Result<Response, WikiError> {
    let title = expect_operation(path, Operation::Edit)?;

    let page = match state.store.load(&title).await {
        Ok(page) => page,
        Err(err) => {
            debug!(missing = err.is_not_found(), "{}; editing as new page", err);
            Page::empty(title)
        }
    };
    render(&state, View::Edit, &page)
}

/// Store the submitted body and show the result.
pub async fn save_page(
    State(state): State<AppState>,
    ValidPath(path): ValidPath,
    request: Request,
) -> Result<Response, WikiError> {
    let title = expect_operation(path, Operation::Save)?;

    let text = form_value(request, BODY_FIELD).await?.unwrap_or_default();
    let page = Page::new(title, text);
    state.store.save(&page).await?;

    Ok(RedirectResponse::found(Operation::View.path_for(&page.title)).into_response())
}

/// Anything outside `/view/`, `/edit/` and `/save/`.
pub async fn not_found() -> Response {
    plain_text(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

fn expect_operation(path: PathMatch, operation: Operation) -> Result<Title, WikiError> {
    if path.operation == operation {
        Ok(path.title)
    } else {
        Err(InvalidPath(path.operation.path_for(&path.title)).into())
    }
}

fn render(state: &AppState, view: View, page: &Page) -> Result<Response, WikiError> {
    let html = state.renderer.render(view, page)?;
    Ok(Html(html).into_response())
}
