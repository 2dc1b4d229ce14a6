//! `SQLite` implementation of [`BookRepository`].

use std::future::Future;

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use bookshelf_app::ports::{BookRepository, BookUpdate};
use bookshelf_domain::book::{self, Book, NewBook};
use bookshelf_domain::error::{BookshelfError, ConflictError, NotFoundError};
use bookshelf_domain::id::BookId;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Book`].
struct Wrapper(Book);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Book> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let author: String = row.try_get("author")?;
        let published_date: String = row.try_get("published_date")?;
        let isbn: String = row.try_get("isbn")?;
        let available: bool = row.try_get("available")?;

        let published_date = NaiveDate::parse_from_str(&published_date, book::DATE_FORMAT)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Book {
            id: BookId::new(id),
            title,
            author,
            published_date,
            isbn,
            available,
        }))
    }
}

const INSERT: &str =
    "INSERT INTO books (title, author, published_date, isbn, available) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM books WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM books ORDER BY id";
const REPLACE: &str = "UPDATE books SET title = ?, author = ?, published_date = ?, isbn = ?, available = ? WHERE id = ? RETURNING *";
const MERGE: &str = "UPDATE books SET title = COALESCE(?, title), author = COALESCE(?, author), published_date = COALESCE(?, published_date), isbn = COALESCE(?, isbn), available = COALESCE(?, available) WHERE id = ? RETURNING *";
const DELETE_BY_ID: &str = "DELETE FROM books WHERE id = ?";

fn format_date(date: NaiveDate) -> String {
    date.format(book::DATE_FORMAT).to_string()
}

fn not_found(id: BookId) -> BookshelfError {
    NotFoundError {
        entity: book::ENTITY,
        id: id.to_string(),
    }
    .into()
}

/// Translate a failed write, surfacing the isbn `UNIQUE` constraint as a conflict.
fn write_error(err: sqlx::Error, isbn: &str) -> BookshelfError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return ConflictError {
            entity: book::ENTITY,
            field: "isbn",
            value: isbn.to_string(),
        }
        .into();
    }
    StorageError::from(err).into()
}

/// `SQLite`-backed book repository.
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl BookRepository for SqliteBookRepository {
    fn create(&self, book: NewBook) -> impl Future<Output = Result<Book, BookshelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(&book.title)
                .bind(&book.author)
                .bind(format_date(book.published_date))
                .bind(&book.isbn)
                .bind(book.available)
                .execute(&pool)
                .await
                .map_err(|err| write_error(err, &book.isbn))?;

            Ok(Book::from_parts(
                BookId::new(result.last_insert_rowid()),
                book,
            ))
        }
    }

    fn get_by_id(
        &self,
        id: BookId,
    ) -> impl Future<Output = Result<Option<Book>, BookshelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.as_i64())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Book>, BookshelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        id: BookId,
        update: BookUpdate,
    ) -> impl Future<Output = Result<Book, BookshelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            // Each update mode is a single statement; merges resolve in SQL.
            let (query, isbn) = match update {
                BookUpdate::Replace(fields) => {
                    let isbn = fields.isbn.clone();
                    let query = sqlx::query_as::<_, Wrapper>(REPLACE)
                        .bind(fields.title)
                        .bind(fields.author)
                        .bind(format_date(fields.published_date))
                        .bind(fields.isbn)
                        .bind(fields.available);
                    (query, isbn)
                }
                BookUpdate::Merge(changes) => {
                    let isbn = changes.isbn.clone().unwrap_or_default();
                    let query = sqlx::query_as::<_, Wrapper>(MERGE)
                        .bind(changes.title)
                        .bind(changes.author)
                        .bind(changes.published_date.map(format_date))
                        .bind(changes.isbn)
                        .bind(changes.available);
                    (query, isbn)
                }
            };

            let row = query
                .bind(id.as_i64())
                .fetch_optional(&pool)
                .await
                .map_err(|err| write_error(err, &isbn))?;

            Wrapper::maybe(row).ok_or_else(|| not_found(id))
        }
    }

    fn delete(&self, id: BookId) -> impl Future<Output = Result<(), BookshelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.as_i64())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(not_found(id));
            }
            Ok(())
        }
    }
}
