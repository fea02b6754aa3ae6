use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::favorite::Favorite;
use crate::models::resource::{
    ListedResource, NewResource, Resource, ResourceFilter, ResourceId, ResourcePatch,
};
use crate::models::user::{Credentials, Identity, SignUpRequest};

/// The hosted data/auth service as seen by the catalog.
///
/// Implementations enforce the access rules themselves: resources are inserted on behalf of
/// the actor only, updates and deletes need the actor's stored role to be admin, and favorites
/// can only be written for the actor's own id. Callers must not rely on client-side gating.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, BackendError>;

    async fn register(&self, request: &SignUpRequest) -> Result<Identity, BackendError>;

    /// Resources of `filter.category`, newest first, annotated with the viewer's favorites.
    async fn list_resources(
        &self,
        viewer: Option<&Identity>,
        filter: &ResourceFilter,
    ) -> Result<Vec<ListedResource>, BackendError>;

    async fn insert_resources(
        &self,
        actor: &Identity,
        resources: &[NewResource],
    ) -> Result<Vec<Resource>, BackendError>;

    async fn update_resource(
        &self,
        actor: &Identity,
        id: ResourceId,
        patch: &ResourcePatch,
    ) -> Result<Resource, BackendError>;

    async fn delete_resource(&self, actor: &Identity, id: ResourceId) -> Result<(), BackendError>;

    async fn insert_favorite(
        &self,
        actor: &Identity,
        favorite: &Favorite,
    ) -> Result<(), BackendError>;

    async fn delete_favorite(
        &self,
        actor: &Identity,
        favorite: &Favorite,
    ) -> Result<(), BackendError>;
}
