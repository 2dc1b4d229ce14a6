//! Storage port — repository trait for book persistence.

use std::future::Future;

use bookshelf_domain::book::{Book, BookChanges, NewBook};
use bookshelf_domain::error::BookshelfError;
use bookshelf_domain::id::BookId;

/// How [`BookRepository::update`] writes the new field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookUpdate {
    /// Overwrite every field.
    Replace(NewBook),
    /// Overwrite only the fields that are present, keeping the rest.
    Merge(BookChanges),
}

/// Repository for persisting and querying [`Book`]s.
///
/// Each call must be atomic with respect to concurrent calls; in particular
/// the isbn uniqueness check and the write that follows it.
pub trait BookRepository {
    /// Insert a new book and return it with its assigned id.
    ///
    /// Fails with [`BookshelfError::Conflict`] when the isbn is already taken.
    fn create(&self, book: NewBook) -> impl Future<Output = Result<Book, BookshelfError>> + Send;

    /// Get a book by its unique identifier.
    fn get_by_id(
        &self,
        id: BookId,
    ) -> impl Future<Output = Result<Option<Book>, BookshelfError>> + Send;

    /// Snapshot of all books, in insertion order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Book>, BookshelfError>> + Send;

    /// Apply `update` to an existing book and return the stored result.
    ///
    /// Fails with [`BookshelfError::NotFound`] when `id` does not exist and
    /// with [`BookshelfError::Conflict`] when the new isbn belongs to another book.
    fn update(
        &self,
        id: BookId,
        update: BookUpdate,
    ) -> impl Future<Output = Result<Book, BookshelfError>> + Send;

    /// Remove a book permanently.
    ///
    /// Fails with [`BookshelfError::NotFound`] when `id` does not exist.
    fn delete(&self, id: BookId) -> impl Future<Output = Result<(), BookshelfError>> + Send;
}
