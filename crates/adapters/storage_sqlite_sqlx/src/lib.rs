//! # bookshelf-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port trait defined in `bookshelf-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `bookshelf-app` (for port traits) and `bookshelf-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod book_repo;
mod error;
mod pool;

pub use book_repo::SqliteBookRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
