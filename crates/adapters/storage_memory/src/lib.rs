//! # bookshelf-adapter-storage-memory
//!
//! Volatile [`BookRepository`] kept entirely in process memory. Contents are
//! lost when the process exits.
//!
//! Every operation runs under a single async mutex, which makes the isbn
//! uniqueness check and the write that follows it atomic.
//!
//! ## Dependency rule
//!
//! Depends on `bookshelf-app` (port traits) and `bookshelf-domain` only.

use std::collections::BTreeMap;

use tokio::sync::Mutex;

use bookshelf_app::ports::{BookRepository, BookUpdate};
use bookshelf_domain::book::{self, Book, NewBook};
use bookshelf_domain::error::{BookshelfError, ConflictError, NotFoundError};
use bookshelf_domain::id::BookId;

#[derive(Default)]
struct Shelf {
    last_id: i64,
    // Ids only grow, so key order is insertion order.
    books: BTreeMap<BookId, Book>,
}

impl Shelf {
    fn ensure_isbn_free(&self, isbn: &str, owner: Option<BookId>) -> Result<(), BookshelfError> {
        let taken = self
            .books
            .values()
            .any(|b| b.isbn == isbn && Some(b.id) != owner);
        if taken {
            return Err(ConflictError {
                entity: book::ENTITY,
                field: "isbn",
                value: isbn.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn not_found(id: BookId) -> BookshelfError {
    NotFoundError {
        entity: book::ENTITY,
        id: id.to_string(),
    }
    .into()
}

/// In-memory book repository.
#[derive(Default)]
pub struct InMemoryBookRepository {
    shelf: Mutex<Shelf>,
}

impl InMemoryBookRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookRepository for InMemoryBookRepository {
    async fn create(&self, book: NewBook) -> Result<Book, BookshelfError> {
        let mut shelf = self.shelf.lock().await;
        shelf.ensure_isbn_free(&book.isbn, None)?;

        shelf.last_id += 1;
        let created = Book::from_parts(BookId::new(shelf.last_id), book);
        shelf.books.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: BookId) -> Result<Option<Book>, BookshelfError> {
        let shelf = self.shelf.lock().await;
        Ok(shelf.books.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Book>, BookshelfError> {
        let shelf = self.shelf.lock().await;
        Ok(shelf.books.values().cloned().collect())
    }

    async fn update(&self, id: BookId, update: BookUpdate) -> Result<Book, BookshelfError> {
        let mut shelf = self.shelf.lock().await;
        let existing = shelf.books.get(&id).ok_or_else(|| not_found(id))?;

        let fields = match update {
            BookUpdate::Replace(fields) => fields,
            BookUpdate::Merge(changes) => changes.apply_to(existing),
        };
        shelf.ensure_isbn_free(&fields.isbn, Some(id))?;

        let updated = Book::from_parts(id, fields);
        shelf.books.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: BookId) -> Result<(), BookshelfError> {
        let mut shelf = self.shelf.lock().await;
        shelf.books.remove(&id).map(|_| ()).ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use bookshelf_domain::book::BookChanges;
    use chrono::NaiveDate;

    fn gatsby() -> NewBook {
        NewBook::builder()
            .title("The Great Gatsby")
            .author("F. Scott Fitzgerald")
            .published_date(NaiveDate::from_ymd_opt(1925, 4, 10).unwrap())
            .isbn("9780743273565")
            .build()
            .unwrap()
    }

    fn dune() -> NewBook {
        NewBook::builder()
            .title("Dune")
            .author("Frank Herbert")
            .published_date(NaiveDate::from_ymd_opt(1965, 8, 1).unwrap())
            .isbn("9780441013593")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_assign_sequential_ids_starting_at_one() {
        let repo = InMemoryBookRepository::new();
        let first = repo.create(gatsby()).await.unwrap();
        let second = repo.create(dune()).await.unwrap();
        assert_eq!(first.id, BookId::new(1));
        assert_eq!(second.id, BookId::new(2));
    }

    #[tokio::test]
    async fn should_not_reuse_id_after_delete() {
        let repo = InMemoryBookRepository::new();
        let first = repo.create(gatsby()).await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.create(gatsby()).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn should_return_conflict_when_isbn_exists() {
        let repo = InMemoryBookRepository::new();
        repo.create(gatsby()).await.unwrap();

        let result = repo.create(gatsby()).await;
        assert!(matches!(result, Err(BookshelfError::Conflict(_))));
    }

    #[tokio::test]
    async fn should_list_in_insertion_order() {
        let repo = InMemoryBookRepository::new();
        let first = repo.create(gatsby()).await.unwrap();
        let second = repo.create(dune()).await.unwrap();
        assert_eq!(repo.get_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn should_merge_changes_over_existing_book() {
        let repo = InMemoryBookRepository::new();
        let created = repo.create(gatsby()).await.unwrap();

        let changes = BookChanges {
            available: Some(false),
            ..BookChanges::default()
        };
        let updated = repo
            .update(created.id, BookUpdate::Merge(changes))
            .await
            .unwrap();

        assert!(!updated.available);
        assert_eq!(updated.title, created.title);
    }

    #[tokio::test]
    async fn should_return_conflict_when_update_reuses_isbn() {
        let repo = InMemoryBookRepository::new();
        repo.create(gatsby()).await.unwrap();
        let second = repo.create(dune()).await.unwrap();

        let mut fields = dune();
        fields.isbn = "9780743273565".to_string();
        let result = repo.update(second.id, BookUpdate::Replace(fields)).await;

        assert!(matches!(result, Err(BookshelfError::Conflict(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_for_missing_book() {
        let repo = InMemoryBookRepository::new();
        let id = BookId::new(5);
        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert!(matches!(
            repo.update(id, BookUpdate::Replace(gatsby())).await,
            Err(BookshelfError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete(id).await,
            Err(BookshelfError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn should_accept_exactly_one_concurrent_create_per_isbn() {
        let repo = Arc::new(InMemoryBookRepository::new());

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.create(gatsby()).await })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(BookshelfError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!((created, conflicts), (1, 19));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_keep_every_concurrent_merge() {
        let repo = Arc::new(InMemoryBookRepository::new());
        let id = repo.create(gatsby()).await.unwrap().id;

        let handles: Vec<_> = (0..50)
            .map(|n| {
                let repo = Arc::clone(&repo);
                let changes = if n % 2 == 0 {
                    BookChanges {
                        title: Some(format!("Revision {n}")),
                        ..BookChanges::default()
                    }
                } else {
                    BookChanges {
                        available: Some(false),
                        ..BookChanges::default()
                    }
                };
                tokio::spawn(async move { repo.update(id, BookUpdate::Merge(changes)).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let book = repo.get_by_id(id).await.unwrap().unwrap();
        assert!(book.title.starts_with("Revision "));
        assert!(!book.available);
        assert_eq!(book.author, "F. Scott Fitzgerald");
    }
}
