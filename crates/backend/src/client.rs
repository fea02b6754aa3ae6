use std::sync::Arc;

use tracing::{info, instrument};

use crate::api::CatalogApi;
use crate::auth::session::{SessionStore, SessionSubscription};
use crate::error::BackendError;
use crate::models::favorite::Favorite;
use crate::models::resource::{
    ListedResource, NewResource, Resource, ResourceFilter, ResourceId, ResourcePatch,
};
use crate::models::user::{Credentials, Identity, SignUpRequest};

/// The one long-lived handle to the hosted service. Clones share the connection and the session.
#[derive(Clone)]
pub struct BackendClient {
    api: Arc<dyn CatalogApi>,
    session: Arc<SessionStore>,
}

impl BackendClient {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            session: Arc::new(SessionStore::new()),
        }
    }

    pub async fn get_session(&self) -> Result<Option<Identity>, BackendError> {
        Ok(self.session.current())
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.session.current()
    }

    pub fn on_auth_state_change(&self) -> SessionSubscription {
        self.session.subscribe()
    }

    #[instrument(skip_all, fields(alias = %credentials.alias))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, BackendError> {
        let identity = self.api.authenticate(credentials).await?;
        info!(user_id = %identity.id, "signed in");
        self.session.set(Some(identity.clone()));
        Ok(identity)
    }

    #[instrument(skip_all, fields(alias = %request.alias))]
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<Identity, BackendError> {
        let identity = self.api.register(request).await?;
        info!(user_id = %identity.id, "signed up");
        self.session.set(Some(identity.clone()));
        Ok(identity)
    }

    #[instrument(skip_all)]
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        self.session.set(None);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_resources(
        &self,
        filter: &ResourceFilter,
    ) -> Result<Vec<ListedResource>, BackendError> {
        let viewer = self.session.current();
        self.api.list_resources(viewer.as_ref(), filter).await
    }

    #[instrument(skip_all, fields(count = resources.len()))]
    pub async fn insert_resources(
        &self,
        resources: &[NewResource],
    ) -> Result<Vec<Resource>, BackendError> {
        let actor = self.require_identity()?;
        self.api.insert_resources(&actor, resources).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update_resource(
        &self,
        id: ResourceId,
        patch: &ResourcePatch,
    ) -> Result<Resource, BackendError> {
        let actor = self.require_identity()?;
        self.api.update_resource(&actor, id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete_resource(&self, id: ResourceId) -> Result<(), BackendError> {
        let actor = self.require_identity()?;
        self.api.delete_resource(&actor, id).await
    }

    #[instrument(skip(self))]
    pub async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), BackendError> {
        let actor = self.require_identity()?;
        self.api.insert_favorite(&actor, favorite).await
    }

    #[instrument(skip(self))]
    pub async fn delete_favorite(&self, favorite: &Favorite) -> Result<(), BackendError> {
        let actor = self.require_identity()?;
        self.api.delete_favorite(&actor, favorite).await
    }

    fn require_identity(&self) -> Result<Identity, BackendError> {
        self.session.current().ok_or(BackendError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::models::user::UserRole;

    #[tokio::test]
    async fn sign_in_and_out_notify_subscribers() {
        let backend = Arc::new(MemoryBackend::new());
        backend.add_user("surveyor", "levelling", UserRole::Regular);
        let client = BackendClient::new(backend);
        let mut subscription = client.on_auth_state_change();

        let identity = client
            .sign_in(&Credentials {
                alias: "surveyor".to_string(),
                password: "levelling".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(subscription.try_next(), Some(Some(identity.clone())));
        assert_eq!(client.get_session().await.unwrap(), Some(identity));

        client.sign_out().await.unwrap();
        assert_eq!(subscription.try_next(), Some(None));
    }

    #[tokio::test]
    async fn mutations_without_session_never_reach_the_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let client = BackendClient::new(backend.clone());
        let err = client.delete_resource(uuid::Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, BackendError::NotAuthenticated));
        assert_eq!(backend.calls().delete_resource, 0);
    }

    #[tokio::test]
    async fn bad_password_keeps_session_empty() {
        let backend = Arc::new(MemoryBackend::with_origin_user());
        let client = BackendClient::new(backend);
        let err = client
            .sign_in(&Credentials {
                alias: "origin".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::BadCredentials));
        assert_eq!(client.current_identity(), None);
    }
}
