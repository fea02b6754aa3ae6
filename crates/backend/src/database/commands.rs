use sqlx::{Error as SqlxError, PgExecutor, Row};
use tracing::{info, instrument};

use crate::models::favorite::Favorite;
use crate::models::resource::{NewResource, Resource, ResourceId, ResourcePatch};
use crate::models::user::{CreateUserRequest, UserId};

#[instrument(skip_all, fields(alias = %user.alias))]
pub async fn create_user<'a, E: PgExecutor<'a>>(
    executor: E,
    user: &CreateUserRequest,
) -> Result<UserId, SqlxError> {
    let result: UserId = sqlx::query(
        "
            INSERT INTO users (alias, password_salt, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, current_timestamp) RETURNING id;
        ",
    )
    .bind(&user.alias)
    .bind(&user.password_salt[..])
    .bind(&user.password_hash[..])
    .bind(user.role)
    .fetch_one(executor)
    .await?
    .try_get("id")?;
    info!("created user with id: {}", result);
    Ok(result)
}

#[instrument(skip_all, fields(category = %resource.category))]
pub async fn insert_resource<'a, E: PgExecutor<'a>>(
    executor: E,
    resource: &NewResource,
) -> Result<Resource, SqlxError> {
    let created: Resource = sqlx::query_as(
        "
            INSERT INTO pdf_resources (title, description, drive_link, category, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, current_timestamp)
            RETURNING id, title, description, drive_link, category, user_id, created_at;
        ",
    )
    .bind(&resource.title)
    .bind(&resource.description)
    .bind(resource.drive_link.as_deref())
    .bind(resource.category)
    .bind(resource.user_id)
    .fetch_one(executor)
    .await?;
    info!("created resource with id: {}", created.id);
    Ok(created)
}

/// Touches only the mutable columns; a missing row surfaces as `RowNotFound`.
#[instrument(skip(executor, patch))]
pub async fn update_resource<'a, E: PgExecutor<'a>>(
    executor: E,
    id: ResourceId,
    patch: &ResourcePatch,
) -> Result<Resource, SqlxError> {
    sqlx::query_as(
        "
            UPDATE pdf_resources
            SET title = $2, description = $3, drive_link = $4
            WHERE id = $1
            RETURNING id, title, description, drive_link, category, user_id, created_at;
        ",
    )
    .bind(id)
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(patch.drive_link.as_deref())
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn delete_resource<'a, E: PgExecutor<'a>>(
    executor: E,
    id: ResourceId,
) -> Result<(), SqlxError> {
    let result = sqlx::query("DELETE FROM pdf_resources WHERE id = $1;")
        .bind(id)
        .execute(executor)
        .await?;
    if result.rows_affected() == 0 {
        return Err(SqlxError::RowNotFound);
    }
    info!("deleted resource with id: {}", id);
    Ok(())
}

#[instrument(skip(executor))]
pub async fn insert_favorite<'a, E: PgExecutor<'a>>(
    executor: E,
    favorite: &Favorite,
) -> Result<(), SqlxError> {
    sqlx::query("INSERT INTO user_favorites (user_id, pdf_id) VALUES ($1, $2);")
        .bind(favorite.user_id)
        .bind(favorite.pdf_id)
        .execute(executor)
        .await?;
    Ok(())
}

#[instrument(skip(executor))]
pub async fn delete_favorite<'a, E: PgExecutor<'a>>(
    executor: E,
    favorite: &Favorite,
) -> Result<(), SqlxError> {
    sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND pdf_id = $2;")
        .bind(favorite.user_id)
        .bind(favorite.pdf_id)
        .execute(executor)
        .await?;
    Ok(())
}
