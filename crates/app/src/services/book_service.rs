//! Book service — one use-case per verb of the books resource.

use bookshelf_domain::book::{self, Book, BookChanges};
use bookshelf_domain::error::{BookshelfError, NotFoundError};
use bookshelf_domain::id::BookId;

use crate::ports::{BookRepository, BookUpdate};

/// How a full update (`PUT`) treats fields missing from the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Missing fields keep their stored value, making a full update behave
    /// like a partial one.
    #[default]
    Lenient,
    /// Every required field must be present; `available` falls back to `true`.
    Strict,
}

/// Application service for book CRUD operations.
pub struct BookService<R> {
    repo: R,
    update_policy: UpdatePolicy,
}

impl<R: BookRepository> BookService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            update_policy: UpdatePolicy::default(),
        }
    }

    /// Select how [`BookService::update_book`] handles missing fields.
    #[must_use]
    pub fn with_update_policy(mut self, update_policy: UpdatePolicy) -> Self {
        self.update_policy = update_policy;
        self
    }

    /// List all books in creation order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_books(&self) -> Result<Vec<Book>, BookshelfError> {
        self.repo.get_all().await
    }

    /// Create a new book from a payload that must carry every required field.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::Validation`] if a required field is missing
    /// or blank, [`BookshelfError::Conflict`] if the isbn is taken, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, changes), fields(isbn = ?changes.isbn))]
    pub async fn create_book(&self, changes: BookChanges) -> Result<Book, BookshelfError> {
        let fields = changes.into_new_book()?;
        let created = self.repo.create(fields).await?;
        tracing::info!(id = %created.id, "book created");
        Ok(created)
    }

    /// Look up a book by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::NotFound`] when no book with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_book(&self, id: BookId) -> Result<Book, BookshelfError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: book::ENTITY,
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Replace the fields of an existing book.
    ///
    /// Under [`UpdatePolicy::Lenient`] absent fields keep their stored value
    /// and the merge happens inside the repository, in the same write.
    /// Under [`UpdatePolicy::Strict`] they are a validation error.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::Validation`], [`BookshelfError::NotFound`],
    /// [`BookshelfError::Conflict`] or a storage error.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_book(
        &self,
        id: BookId,
        changes: BookChanges,
    ) -> Result<Book, BookshelfError> {
        changes.validate()?;
        let update = match self.update_policy {
            UpdatePolicy::Lenient => BookUpdate::Merge(changes),
            UpdatePolicy::Strict => {
                // Unknown ids answer not-found before missing fields are reported.
                self.get_book(id).await?;
                BookUpdate::Replace(changes.into_new_book()?)
            }
        };
        let updated = self.repo.update(id, update).await?;
        tracing::info!(%id, "book updated");
        Ok(updated)
    }

    /// Change only the fields present in `changes`.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::Validation`], [`BookshelfError::NotFound`],
    /// [`BookshelfError::Conflict`] or a storage error.
    #[tracing::instrument(skip(self, changes))]
    pub async fn patch_book(
        &self,
        id: BookId,
        changes: BookChanges,
    ) -> Result<Book, BookshelfError> {
        changes.validate()?;
        let updated = self.repo.update(id, BookUpdate::Merge(changes)).await?;
        tracing::info!(%id, "book patched");
        Ok(updated)
    }

    /// Delete a book by id.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::NotFound`] when no book with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_book(&self, id: BookId) -> Result<(), BookshelfError> {
        self.repo.delete(id).await?;
        tracing::info!(%id, "book deleted");
        Ok(())
    }
}
