use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by snapgraph stores.
///
/// Every variant is locally recoverable by the caller; none is fatal to the
/// process. Constraint violations raised by concurrent duplicate inserts are
/// converted to the matching domain outcome (idempotent success or toggle)
/// before they reach this type.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation failed for one or more fields.
    #[error("invalid input")]
    InvalidInput(#[from] ValidationError),

    /// An identity with this email already exists.
    #[error("email `{email}` is already registered")]
    DuplicateEmail { email: String },

    /// An identity with this username already exists.
    #[error("username `{username}` is already taken")]
    DuplicateUsername { username: String },

    /// Authentication failed. Deliberately does not say whether the email or
    /// the credential was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An identity attempted to follow itself.
    #[error("an identity cannot follow itself")]
    SelfFollow,

    /// The requester is not allowed to perform this operation on the target.
    #[error("operation not permitted for the current identity")]
    Forbidden,

    /// A referenced entity is absent.
    #[error("{entity} not found")]
    NotFound {
        entity: &'static str,
        id: Option<String>,
    },

    /// Missing or invalid session token.
    #[error("missing or invalid session")]
    Unauthenticated,

    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Anything the taxonomy above does not cover (codec failures, corrupt
    /// documents).
    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl CoreError {
    /// Convenience constructor for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: Some(id.to_string()),
        }
    }

    pub(crate) fn other(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Collection of validation issues encountered while preparing a mutation.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}
