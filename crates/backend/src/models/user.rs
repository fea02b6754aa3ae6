use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::error::ValidationError;

pub type UserId = Uuid;
const USER_ALIAS_LENGTH_LIMIT: usize = 30;
const USER_PASSWORD_MIN_LENGTH: usize = 8;
const USER_PASSWORD_MAX_LENGTH: usize = 80;

#[derive(
    Clone, Debug, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserRole {
    Admin,
    Regular,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

/// The signed-in user as resolved by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub alias: String,
    pub role: UserRole,
}

#[derive(Clone, Debug)]
pub struct Credentials {
    pub alias: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct SignUpRequest {
    pub alias: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct CreateUserRequest {
    pub alias: String,
    pub role: UserRole,
    pub password_salt: [u8; 16],
    pub password_hash: [u8; 32],
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct GetUserRoleResponse {
    pub role: UserRole,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct GetUserCredentialsByAliasResponse {
    pub id: UserId,
    pub alias: String,
    pub role: UserRole,
    pub password_salt: Vec<u8>,
    pub password_hash: Vec<u8>,
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_user_alias(&self.alias)?;
        validate_user_password(&self.password)
    }
}

pub fn validate_user_alias(alias: &str) -> Result<(), ValidationError> {
    for ch in alias.chars() {
        if !(ch.is_alphanumeric() || ch == '_') {
            return Err(ValidationError::InvalidInput {
                value: alias.to_string(),
                reason: "alias can only contain letters, numbers and underscores".to_string(),
            });
        }
    }
    if alias.is_empty() {
        return Err(ValidationError::InvalidInput {
            value: alias.to_string(),
            reason: "user alias cannot be empty".to_string(),
        });
    }
    if alias.chars().count() > USER_ALIAS_LENGTH_LIMIT {
        return Err(ValidationError::InvalidInput {
            value: alias.to_string(),
            reason: format!(
                "user alias cannot be longer than {} chars",
                USER_ALIAS_LENGTH_LIMIT
            ),
        });
    }
    Ok(())
}

pub fn validate_user_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < USER_PASSWORD_MIN_LENGTH || password.len() > USER_PASSWORD_MAX_LENGTH {
        return Err(ValidationError::InvalidInput {
            value: "<password>".to_string(),
            reason: format!(
                "password should be at least {} and at most {} characters long",
                USER_PASSWORD_MIN_LENGTH, USER_PASSWORD_MAX_LENGTH
            ),
        });
    }
    Ok(())
}
