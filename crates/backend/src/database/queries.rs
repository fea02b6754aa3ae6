use sqlx::{Error as SqlxError, PgExecutor};
use tracing::instrument;

use crate::models::resource::{ListedResource, Resource, ResourceFilter, ResourceId};
use crate::models::user::{GetUserCredentialsByAliasResponse, GetUserRoleResponse, UserId};

#[instrument(skip(executor))]
pub async fn list_resources_for_viewer<'a, E: PgExecutor<'a>>(
    executor: E,
    viewer: Option<UserId>,
    filter: &ResourceFilter,
) -> Result<Vec<ListedResource>, SqlxError> {
    // without a viewer the join matches nothing and the favorites constraint is dropped
    let favorites_only = filter.favorites_only && viewer.is_some();
    sqlx::query_as(
        "
    SELECT
        r.id, r.title, r.description, r.drive_link, r.category, r.user_id, r.created_at,
        (f.pdf_id IS NOT NULL) AS is_favorite
    FROM
        pdf_resources r
        LEFT JOIN user_favorites f ON f.pdf_id = r.id AND f.user_id = $2
    WHERE
        r.category = $1
        AND (NOT $3 OR f.pdf_id IS NOT NULL)
    ORDER BY
        r.created_at DESC, r.id;
    ",
    )
    .bind(filter.category)
    .bind(viewer)
    .bind(favorites_only)
    .fetch_all(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn get_user_credentials_by_alias<'a, E: PgExecutor<'a>>(
    executor: E,
    alias: &str,
) -> Result<GetUserCredentialsByAliasResponse, SqlxError> {
    sqlx::query_as(
        "SELECT id, alias, role, password_salt, password_hash FROM users WHERE alias = $1;",
    )
    .bind(alias)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn get_user_role<'a, E: PgExecutor<'a>>(
    executor: E,
    user_id: UserId,
) -> Result<GetUserRoleResponse, SqlxError> {
    sqlx::query_as("SELECT role FROM users WHERE id = $1;")
        .bind(user_id)
        .fetch_one(executor)
        .await
}

#[instrument(skip(executor))]
pub async fn get_resource<'a, E: PgExecutor<'a>>(
    executor: E,
    id: ResourceId,
) -> Result<Resource, SqlxError> {
    sqlx::query_as(
        "
    SELECT id, title, description, drive_link, category, user_id, created_at
    FROM pdf_resources
    WHERE id = $1;
    ",
    )
    .bind(id)
    .fetch_one(executor)
    .await
}
