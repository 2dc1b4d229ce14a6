//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod books;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{MethodRouter, get};

use bookshelf_app::ports::BookRepository;

use crate::error::error_response;
use crate::state::AppState;

/// Build the books sub-router.
///
/// Every path is registered with and without its trailing slash. Verbs a
/// path does not support are answered by [`method_not_allowed`].
pub fn routes<BR>() -> Router<AppState<BR>>
where
    BR: BookRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/books", collection::<BR>())
        .route("/books/", collection::<BR>())
        .route("/books/{id}", member::<BR>())
        .route("/books/{id}/", member::<BR>())
}

fn collection<BR>() -> MethodRouter<AppState<BR>>
where
    BR: BookRepository + Send + Sync + 'static,
{
    get(books::list::<BR>)
        .post(books::create::<BR>)
        .fallback(method_not_allowed)
}

fn member<BR>() -> MethodRouter<AppState<BR>>
where
    BR: BookRepository + Send + Sync + 'static,
{
    get(books::get::<BR>)
        .put(books::update::<BR>)
        .patch(books::patch::<BR>)
        .delete(books::delete::<BR>)
        .fallback(method_not_allowed)
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}
