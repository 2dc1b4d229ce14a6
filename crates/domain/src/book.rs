//! Book — the single resource exposed by the service.
//!
//! Three shapes of the same record live here:
//! - [`Book`]: a stored record, always carrying its storage-assigned [`BookId`]
//! - [`NewBook`]: the complete field set written on create or full replacement
//! - [`BookChanges`]: a sparse set of field updates, merged over an existing book

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BookshelfError, ValidationError};
use crate::id::BookId;

/// Entity name used in error messages.
pub const ENTITY: &str = "Book";

/// Wire and input format of `published_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub published_date: NaiveDate,
    pub isbn: String,
    pub available: bool,
}

impl Book {
    /// Attach a storage-assigned id to a complete field set.
    #[must_use]
    pub fn from_parts(id: BookId, fields: NewBook) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            published_date: fields.published_date,
            isbn: fields.isbn,
            available: fields.available,
        }
    }
}

/// The complete, id-less field set of a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_date: NaiveDate,
    pub isbn: String,
    pub available: bool,
}

impl NewBook {
    /// Create a builder for constructing a [`NewBook`].
    #[must_use]
    pub fn builder() -> NewBookBuilder {
        NewBookBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::Validation`] when `title`, `author` or
    /// `isbn` is blank.
    pub fn validate(&self) -> Result<(), BookshelfError> {
        require_text("title", &self.title)?;
        require_text("author", &self.author)?;
        require_text("isbn", &self.isbn)?;
        Ok(())
    }
}

/// Step-by-step builder for [`NewBook`].
///
/// `available` defaults to `true`.
#[derive(Debug, Default)]
pub struct NewBookBuilder {
    title: Option<String>,
    author: Option<String>,
    published_date: Option<NaiveDate>,
    isbn: Option<String>,
    available: Option<bool>,
}

impl NewBookBuilder {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn published_date(mut self, published_date: NaiveDate) -> Self {
        self.published_date = Some(published_date);
        self
    }

    #[must_use]
    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    #[must_use]
    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    /// Consume the builder, validate, and return a [`NewBook`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for the first required field
    /// left unset, or [`ValidationError::EmptyField`] for a blank one.
    pub fn build(self) -> Result<NewBook, BookshelfError> {
        let book = NewBook {
            title: self.title.ok_or(ValidationError::MissingField("title"))?,
            author: self.author.ok_or(ValidationError::MissingField("author"))?,
            published_date: self
                .published_date
                .ok_or(ValidationError::MissingField("published_date"))?,
            isbn: self.isbn.ok_or(ValidationError::MissingField("isbn"))?,
            available: self.available.unwrap_or(true),
        };
        book.validate()?;
        Ok(book)
    }
}

/// A sparse update: `None` means "keep what is stored".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub isbn: Option<String>,
    pub available: Option<bool>,
}

impl BookChanges {
    /// Check the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when a present text field is blank.
    pub fn validate(&self) -> Result<(), BookshelfError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(author) = &self.author {
            require_text("author", author)?;
        }
        if let Some(isbn) = &self.isbn {
            require_text("isbn", isbn)?;
        }
        Ok(())
    }

    /// Merge over `existing`, keeping its value for every absent field.
    #[must_use]
    pub fn apply_to(self, existing: &Book) -> NewBook {
        NewBook {
            title: self.title.unwrap_or_else(|| existing.title.clone()),
            author: self.author.unwrap_or_else(|| existing.author.clone()),
            published_date: self.published_date.unwrap_or(existing.published_date),
            isbn: self.isbn.unwrap_or_else(|| existing.isbn.clone()),
            available: self.available.unwrap_or(existing.available),
        }
    }

    /// Turn into a complete field set, requiring every mandatory field.
    ///
    /// # Errors
    ///
    /// Returns [`BookshelfError::Validation`] when a required field is
    /// missing or blank.
    pub fn into_new_book(self) -> Result<NewBook, BookshelfError> {
        let mut builder = NewBook::builder();
        if let Some(title) = self.title {
            builder = builder.title(title);
        }
        if let Some(author) = self.author {
            builder = builder.author(author);
        }
        if let Some(published_date) = self.published_date {
            builder = builder.published_date(published_date);
        }
        if let Some(isbn) = self.isbn {
            builder = builder.isbn(isbn);
        }
        if let Some(available) = self.available {
            builder = builder.available(available);
        }
        builder.build()
    }
}

/// Parse a `published_date` input string.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDate`] when `value` is not `YYYY-MM-DD`.
pub fn parse_published_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
