//! # bookshelf-domain
//!
//! Pure domain model for the bookshelf resource service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and error conventions
//! - Define the **Book** resource and its write models (`NewBook`, `BookChanges`)
//! - Contain all invariant enforcement (non-empty text, date parsing)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod book;
