use crate::error::{BackendError, ValidationError};
use crate::models::user::{Identity, UserRole};

pub fn map_not_found_as_none<T>(result: Result<T, sqlx::Error>) -> Result<Option<T>, sqlx::Error> {
    match result {
        Ok(ok) => Ok(Some(ok)),
        Err(e) => {
            if matches!(e, sqlx::Error::RowNotFound) {
                Ok(None)
            } else {
                Err(e)
            }
        }
    }
}

/// Checks a role as stored by the backend, never the one claimed by the caller.
pub fn require_admin(stored_role: UserRole) -> Result<(), BackendError> {
    if stored_role.is_admin() {
        Ok(())
    } else {
        Err(ValidationError::InsufficientPermissions {
            required: UserRole::Admin,
            current: stored_role,
        }
        .into())
    }
}

pub fn require_self(actor: &Identity, user_id: &uuid::Uuid) -> Result<(), BackendError> {
    if &actor.id == user_id {
        Ok(())
    } else {
        Err(ValidationError::InvalidInput {
            value: user_id.to_string(),
            reason: "records can only be written on behalf of the signed-in user".to_string(),
        }
        .into())
    }
}
