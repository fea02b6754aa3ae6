use thiserror::Error;

use crate::models::user::UserRole;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid login credentials")]
    BadCredentials,
    #[error("not signed in")]
    NotAuthenticated,
    #[error("backend is unavailable")]
    Unavailable,
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("sqlx error: {0}")]
    Sqlx(sqlx::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("input value is invalid: `{value}`, reason: {reason}")]
    InvalidInput { value: String, reason: String },
    #[error("{field} is required")]
    MissingField { field: String },
    #[error(
        "insufficient permissions for action, required role: {required}, current role: {current}"
    )]
    InsufficientPermissions {
        required: UserRole,
        current: UserRole,
    },
    #[error("requested object already exists")]
    AlreadyExists,
    #[error("requested object doesn't exist or the caller doesn't have access")]
    NotFound,
}

impl From<sqlx::Error> for BackendError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ValidationError::NotFound.into(),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ValidationError::AlreadyExists.into()
            }
            // a favorite or resource row pointing at a missing parent
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                ValidationError::NotFound.into()
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable
            }
            e => Self::Sqlx(e),
        }
    }
}
