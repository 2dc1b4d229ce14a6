//! # bookshelf-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **books JSON API** (`/books/`, `/books/{id}/`)
//! - Bind each HTTP method to one application service call (driving adapter)
//! - Map application results and errors into HTTP status codes and JSON bodies
//! - Answer `405 Method Not Allowed` for verbs a path does not support
//!
//! ## Dependency rule
//! Depends on `bookshelf-app` (for port traits and services) and `bookshelf-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
