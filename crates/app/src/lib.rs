//! # bookshelf-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `BookRepository` — create, read, list, update, delete books
//! - Define **driving/inbound ports** as use-case structs:
//!   - `BookService` — one operation per verb, mapped onto the repository
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `bookshelf-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
