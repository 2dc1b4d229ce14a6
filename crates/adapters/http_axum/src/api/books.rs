//! JSON REST handlers for books.

use std::str::FromStr;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use bookshelf_app::ports::BookRepository;
use bookshelf_domain::book::{self, Book, BookChanges};
use bookshelf_domain::error::{NotFoundError, ValidationError};
use bookshelf_domain::id::BookId;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body shared by create, update and patch.
///
/// Every field is optional here; which ones are required depends on the verb
/// and is enforced by the service.
#[derive(Debug, Default, Deserialize)]
pub struct BookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub isbn: Option<String>,
    pub available: Option<bool>,
}

impl TryFrom<BookRequest> for BookChanges {
    type Error = ValidationError;

    fn try_from(req: BookRequest) -> Result<Self, Self::Error> {
        let published_date = req
            .published_date
            .as_deref()
            .map(book::parse_published_date)
            .transpose()?;

        Ok(Self {
            title: req.title,
            author: req.author,
            published_date,
            isbn: req.isbn,
            available: req.available,
        })
    }
}

/// Body returned by the create endpoint.
#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub id: BookId,
    pub message: String,
}

/// Body returned by the update and patch endpoints.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Book>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Book>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<CreatedBody>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the update and patch endpoints.
pub enum UpdateResponse {
    Ok(Json<MessageBody>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Only the canonical decimal form of an id names a book.
fn parse_id(raw: &str) -> Result<BookId, ApiError> {
    BookId::from_str(raw)
        .ok()
        .filter(|id| id.to_string() == raw)
        .ok_or_else(|| {
            ApiError::from(NotFoundError {
                entity: book::ENTITY,
                id: raw.to_string(),
            })
        })
}

fn parse_body(payload: Result<Json<BookRequest>, JsonRejection>) -> Result<BookChanges, ApiError> {
    let Json(req) =
        payload.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;
    Ok(BookChanges::try_from(req)?)
}

/// `GET /books/`
pub async fn list<BR>(State(state): State<AppState<BR>>) -> Result<ListResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
{
    let books = state.book_service.list_books().await?;
    Ok(ListResponse::Ok(Json(books)))
}

/// `GET /books/{id}/`
pub async fn get<BR>(
    State(state): State<AppState<BR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
{
    let book_id = parse_id(&id)?;
    let book = state.book_service.get_book(book_id).await?;
    Ok(GetResponse::Ok(Json(book)))
}

/// `POST /books/`
pub async fn create<BR>(
    State(state): State<AppState<BR>>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
{
    let changes = parse_body(payload)?;
    let created = state.book_service.create_book(changes).await?;
    Ok(CreateResponse::Created(Json(CreatedBody {
        id: created.id,
        message: "Book created successfully".to_string(),
    })))
}

/// `PUT /books/{id}/`
pub async fn update<BR>(
    State(state): State<AppState<BR>>,
    Path(id): Path<String>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<UpdateResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
{
    let book_id = parse_id(&id)?;
    let changes = parse_body(payload)?;
    state.book_service.update_book(book_id, changes).await?;
    Ok(UpdateResponse::Ok(Json(MessageBody {
        message: "Book updated successfully".to_string(),
    })))
}

/// `PATCH /books/{id}/`
pub async fn patch<BR>(
    State(state): State<AppState<BR>>,
    Path(id): Path<String>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<UpdateResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
{
    let book_id = parse_id(&id)?;
    let changes = parse_body(payload)?;
    state.book_service.patch_book(book_id, changes).await?;
    Ok(UpdateResponse::Ok(Json(MessageBody {
        message: "Book partially updated successfully".to_string(),
    })))
}

/// `DELETE /books/{id}/`
pub async fn delete<BR>(
    State(state): State<AppState<BR>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    BR: BookRepository + Send + Sync + 'static,
{
    let book_id = parse_id(&id)?;
    state.book_service.delete_book(book_id).await?;
    Ok(DeleteResponse::NoContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_request_with_valid_date() {
        let req = BookRequest {
            published_date: Some("1925-04-10".to_string()),
            ..BookRequest::default()
        };
        let changes = BookChanges::try_from(req).unwrap();
        assert_eq!(
            changes.published_date,
            chrono::NaiveDate::from_ymd_opt(1925, 4, 10)
        );
        assert!(changes.title.is_none());
    }

    #[test]
    fn should_reject_request_with_malformed_date() {
        let req = BookRequest {
            published_date: Some("10/04/1925".to_string()),
            ..BookRequest::default()
        };
        assert_eq!(
            BookChanges::try_from(req),
            Err(ValidationError::InvalidDate("10/04/1925".to_string()))
        );
    }

    #[test]
    fn should_treat_null_fields_as_absent() {
        let req: BookRequest =
            serde_json::from_str(r#"{"title": null, "available": false}"#).unwrap();
        let changes = BookChanges::try_from(req).unwrap();
        assert!(changes.title.is_none());
        assert_eq!(changes.available, Some(false));
    }

    #[test]
    fn should_reject_non_integer_id() {
        assert!(parse_id("abc").is_err());
        assert_eq!(parse_id("12").unwrap(), BookId::new(12));
    }

    #[test]
    fn should_reject_non_canonical_id() {
        assert!(parse_id("+1").is_err());
        assert!(parse_id("01").is_err());
        assert!(parse_id(" 1").is_err());
    }
}
