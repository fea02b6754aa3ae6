use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::api::CatalogApi;
use crate::auth::utils::{generate_salt, hash_password_sha256, verify_password};
use crate::database::commands::{
    create_user, delete_favorite, delete_resource, insert_favorite, insert_resource,
    update_resource,
};
use crate::database::connection::DbConnection;
use crate::database::queries::{
    get_resource, get_user_credentials_by_alias, get_user_role, list_resources_for_viewer,
};
use crate::database::utils::{map_not_found_as_none, require_admin, require_self};
use crate::error::BackendError;
use crate::models::favorite::Favorite;
use crate::models::resource::{
    ListedResource, NewResource, Resource, ResourceFilter, ResourceId, ResourcePatch,
};
use crate::models::user::{CreateUserRequest, Credentials, Identity, SignUpRequest, UserRole};

#[async_trait]
impl CatalogApi for DbConnection {
    #[instrument(skip_all, fields(alias = %credentials.alias))]
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, BackendError> {
        let stored = map_not_found_as_none(
            get_user_credentials_by_alias(self.pool(), &credentials.alias).await,
        )?
        .ok_or(BackendError::BadCredentials)?;
        if !verify_password(
            &credentials.password,
            &stored.password_salt,
            &stored.password_hash,
        ) {
            warn!("rejected sign in attempt");
            return Err(BackendError::BadCredentials);
        }
        Ok(Identity {
            id: stored.id,
            alias: stored.alias,
            role: stored.role,
        })
    }

    #[instrument(skip_all, fields(alias = %request.alias))]
    async fn register(&self, request: &SignUpRequest) -> Result<Identity, BackendError> {
        request.validate()?;
        let salt = generate_salt();
        let user = CreateUserRequest {
            alias: request.alias.clone(),
            role: UserRole::Regular,
            password_salt: salt,
            password_hash: hash_password_sha256(&request.password, salt),
        };
        let id = create_user(self.pool(), &user).await?;
        Ok(Identity {
            id,
            alias: user.alias,
            role: user.role,
        })
    }

    async fn list_resources(
        &self,
        viewer: Option<&Identity>,
        filter: &ResourceFilter,
    ) -> Result<Vec<ListedResource>, BackendError> {
        Ok(list_resources_for_viewer(self.pool(), viewer.map(|v| v.id), filter).await?)
    }

    async fn insert_resources(
        &self,
        actor: &Identity,
        resources: &[NewResource],
    ) -> Result<Vec<Resource>, BackendError> {
        for resource in resources {
            require_self(actor, &resource.user_id)?;
            resource.validate()?;
        }
        let mut transaction = self.pool().begin().await?;
        let mut created = Vec::with_capacity(resources.len());
        for resource in resources {
            created.push(insert_resource(transaction.as_mut(), resource).await?);
        }
        transaction.commit().await?;
        Ok(created)
    }

    async fn update_resource(
        &self,
        actor: &Identity,
        id: ResourceId,
        patch: &ResourcePatch,
    ) -> Result<Resource, BackendError> {
        let mut transaction = self.pool().begin().await?;
        require_admin(get_user_role(transaction.as_mut(), actor.id).await?.role)?;
        let current = get_resource(transaction.as_mut(), id).await?;
        patch.validate(current.category)?;
        let updated = update_resource(transaction.as_mut(), id, patch).await?;
        transaction.commit().await?;
        info!("updated resource with id: {}", id);
        Ok(updated)
    }

    async fn delete_resource(&self, actor: &Identity, id: ResourceId) -> Result<(), BackendError> {
        let mut transaction = self.pool().begin().await?;
        require_admin(get_user_role(transaction.as_mut(), actor.id).await?.role)?;
        delete_resource(transaction.as_mut(), id).await?;
        transaction.commit().await?;
        Ok(())
    }

    async fn insert_favorite(
        &self,
        actor: &Identity,
        favorite: &Favorite,
    ) -> Result<(), BackendError> {
        require_self(actor, &favorite.user_id)?;
        Ok(insert_favorite(self.pool(), favorite).await?)
    }

    async fn delete_favorite(
        &self,
        actor: &Identity,
        favorite: &Favorite,
    ) -> Result<(), BackendError> {
        require_self(actor, &favorite.user_id)?;
        Ok(delete_favorite(self.pool(), favorite).await?)
    }
}
