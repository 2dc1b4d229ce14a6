//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`BookshelfError`] via `#[from]`.

/// Top-level error returned by application services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum BookshelfError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// The backing store failed or is unreachable.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Malformed or missing client input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field `{0}` is required")]
    MissingField(&'static str),

    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("field `published_date` must be a date formatted as YYYY-MM-DD, got `{0}`")]
    InvalidDate(String),

    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// No record exists for the requested identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A uniqueness constraint would be violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} with {field} `{value}` already exists")]
pub struct ConflictError {
    pub entity: &'static str,
    pub field: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_not_found_message() {
        let err = BookshelfError::from(NotFoundError {
            entity: "Book",
            id: "42".to_string(),
        });
        assert_eq!(err.to_string(), "Book `42` not found");
    }

    #[test]
    fn should_render_conflict_message() {
        let err = BookshelfError::from(ConflictError {
            entity: "Book",
            field: "isbn",
            value: "9780743273565".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Book with isbn `9780743273565` already exists"
        );
    }

    #[test]
    fn should_keep_storage_source() {
        let io = std::io::Error::other("disk on fire");
        let err = BookshelfError::Storage(Box::new(io));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "disk on fire");
    }
}
