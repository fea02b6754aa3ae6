use sqlx::{Error as SqlxError, Postgres, Transaction};
use tracing::instrument;

use crate::auth::utils::{generate_salt, hash_password_sha256};
use crate::database::commands::create_user;
use crate::database::connection::DbConnection;
use crate::models::user::{CreateUserRequest, UserRole};

pub const ORIGIN_ALIAS: &str = "origin";
pub const ORIGIN_PASSWORD: &str = "changepassword";

pub fn default_origin_user() -> CreateUserRequest {
    let salt = generate_salt();
    let hash = hash_password_sha256(ORIGIN_PASSWORD, salt);
    CreateUserRequest {
        alias: ORIGIN_ALIAS.to_string(),
        role: UserRole::Admin,
        password_hash: hash,
        password_salt: salt,
    }
}

impl DbConnection {
    pub async fn create_all(&self) -> Result<(), SqlxError> {
        let mut transaction = self.pool().begin().await?;
        create_all_types(&mut transaction).await?;
        create_all_tables(&mut transaction).await?;
        create_origin_user(&mut transaction).await?;
        transaction.commit().await?;
        Ok(())
    }

    pub async fn drop_all(&self) -> Result<(), SqlxError> {
        let mut transaction = self.pool().begin().await?;
        drop_all_tables(&mut transaction).await?;
        drop_all_types(&mut transaction).await?;
        transaction.commit().await?;
        Ok(())
    }
}

#[instrument(skip_all)]
pub async fn create_all_types(
    transaction: &mut Transaction<'_, Postgres>,
) -> Result<(), SqlxError> {
    sqlx::query("CREATE TYPE user_role AS ENUM ('admin', 'regular');")
        .execute(transaction.as_mut())
        .await?;
    sqlx::query("CREATE TYPE resource_category AS ENUM ('code', 'definition', 'formula');")
        .execute(transaction.as_mut())
        .await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn drop_all_types(transaction: &mut Transaction<'_, Postgres>) -> Result<(), SqlxError> {
    let statements = [
        "DROP TYPE IF EXISTS resource_category;",
        "DROP TYPE IF EXISTS user_role;",
    ];
    for statement in &statements {
        sqlx::query(statement).execute(transaction.as_mut()).await?;
    }
    Ok(())
}

#[instrument(skip_all)]
pub async fn create_all_tables(
    transaction: &mut Transaction<'_, Postgres>,
) -> Result<(), SqlxError> {
    sqlx::query(
        "
            CREATE TABLE users (
                id              uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                alias           VARCHAR(30) NOT NULL UNIQUE,
                password_salt   BYTEA NOT NULL,
                password_hash   BYTEA NOT NULL,
                role            user_role NOT NULL,
                created_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT current_timestamp
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE pdf_resources (
                id              uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                title           TEXT NOT NULL,
                description     TEXT NOT NULL DEFAULT '',
                drive_link      TEXT,
                category        resource_category NOT NULL,
                user_id         uuid NOT NULL REFERENCES users(id),
                created_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT current_timestamp,
                CONSTRAINT code_has_drive_link CHECK (category <> 'code' OR drive_link IS NOT NULL)
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE user_favorites (
                id          bigint PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                user_id     uuid NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
                pdf_id      uuid NOT NULL REFERENCES pdf_resources(id) ON UPDATE CASCADE ON DELETE CASCADE,
                CONSTRAINT user_favorites_unique_pair UNIQUE (user_id, pdf_id)
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query("CREATE INDEX pdf_resources_category_created_at ON pdf_resources (category, created_at DESC);")
        .execute(transaction.as_mut())
        .await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn drop_all_tables(transaction: &mut Transaction<'_, Postgres>) -> Result<(), SqlxError> {
    let statements = [
        "DROP TABLE IF EXISTS user_favorites;",
        "DROP TABLE IF EXISTS pdf_resources;",
        "DROP TABLE IF EXISTS users;",
    ];
    for statement in &statements {
        sqlx::query(statement).execute(transaction.as_mut()).await?;
    }
    Ok(())
}

#[instrument(skip_all)]
pub async fn create_origin_user(
    transaction: &mut Transaction<'_, Postgres>,
) -> Result<(), SqlxError> {
    create_user(transaction.as_mut(), &default_origin_user())
        .await
        .map(|_| ())
}
