use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::api::CatalogApi;
use crate::auth::utils::{generate_salt, hash_password_sha256, verify_password};
use crate::database::schema::{ORIGIN_ALIAS, ORIGIN_PASSWORD};
use crate::database::utils::{require_admin, require_self};
use crate::error::{BackendError, ValidationError};
use crate::models::favorite::Favorite;
use crate::models::resource::{
    ListedResource, NewResource, Resource, ResourceFilter, ResourceId, ResourcePatch,
};
use crate::models::user::{Credentials, Identity, SignUpRequest, UserId, UserRole};

struct StoredUser {
    identity: Identity,
    password_salt: [u8; 16],
    password_hash: [u8; 32],
}

struct StoredResource {
    seq: u64,
    resource: Resource,
}

/// Number of calls that reached each operation, failed ones included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallLog {
    pub authenticate: usize,
    pub register: usize,
    pub list_resources: usize,
    pub insert_resources: usize,
    pub update_resource: usize,
    pub delete_resource: usize,
    pub insert_favorite: usize,
    pub delete_favorite: usize,
}

#[derive(Default)]
struct Counters {
    authenticate: AtomicUsize,
    register: AtomicUsize,
    list_resources: AtomicUsize,
    insert_resources: AtomicUsize,
    update_resource: AtomicUsize,
    delete_resource: AtomicUsize,
    insert_favorite: AtomicUsize,
    delete_favorite: AtomicUsize,
}

/// In-process stand-in for the hosted service, applying the same access rules as Postgres.
#[derive(Default)]
pub struct MemoryBackend {
    users: DashMap<String, StoredUser>,
    resources: DashMap<ResourceId, StoredResource>,
    favorites: DashMap<Favorite, ()>,
    seq: AtomicU64,
    offline: AtomicBool,
    counters: Counters,
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend holding the origin admin, as created by the Postgres schema setup.
    pub fn with_origin_user() -> Self {
        let backend = Self::new();
        backend.add_user(ORIGIN_ALIAS, ORIGIN_PASSWORD, UserRole::Admin);
        backend
    }

    pub fn add_user(&self, alias: &str, password: &str, role: UserRole) -> Identity {
        let salt = generate_salt();
        let identity = Identity {
            id: Uuid::new_v4(),
            alias: alias.to_string(),
            role,
        };
        self.users.insert(
            alias.to_string(),
            StoredUser {
                identity: identity.clone(),
                password_salt: salt,
                password_hash: hash_password_sha256(password, salt),
            },
        );
        identity
    }

    /// Inserts a resource directly, bypassing access rules.
    pub fn seed_resource(&self, resource: NewResource) -> Resource {
        self.store(resource)
    }

    pub fn resource(&self, id: ResourceId) -> Option<Resource> {
        self.resources.get(&id).map(|r| r.resource.clone())
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    /// While offline every call fails with [`BackendError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> CallLog {
        let c = &self.counters;
        CallLog {
            authenticate: c.authenticate.load(Ordering::Relaxed),
            register: c.register.load(Ordering::Relaxed),
            list_resources: c.list_resources.load(Ordering::Relaxed),
            insert_resources: c.insert_resources.load(Ordering::Relaxed),
            update_resource: c.update_resource.load(Ordering::Relaxed),
            delete_resource: c.delete_resource.load(Ordering::Relaxed),
            insert_favorite: c.insert_favorite.load(Ordering::Relaxed),
            delete_favorite: c.delete_favorite.load(Ordering::Relaxed),
        }
    }

    fn ensure_online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn stored_role(&self, user_id: UserId) -> Result<UserRole, BackendError> {
        self.users
            .iter()
            .find(|u| u.identity.id == user_id)
            .map(|u| u.identity.role)
            .ok_or_else(|| ValidationError::NotFound.into())
    }

    fn store(&self, new: NewResource) -> Resource {
        let resource = Resource {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            drive_link: new.drive_link,
            category: new.category,
            user_id: new.user_id,
            created_at: Utc::now(),
        };
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        self.resources.insert(
            resource.id,
            StoredResource {
                seq,
                resource: resource.clone(),
            },
        );
        resource
    }
}

#[async_trait]
impl CatalogApi for MemoryBackend {
    #[instrument(skip_all, fields(alias = %credentials.alias))]
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, BackendError> {
        bump(&self.counters.authenticate);
        self.ensure_online()?;
        let user = self
            .users
            .get(&credentials.alias)
            .ok_or(BackendError::BadCredentials)?;
        if verify_password(
            &credentials.password,
            &user.password_salt,
            &user.password_hash,
        ) {
            Ok(user.identity.clone())
        } else {
            Err(BackendError::BadCredentials)
        }
    }

    async fn register(&self, request: &SignUpRequest) -> Result<Identity, BackendError> {
        bump(&self.counters.register);
        self.ensure_online()?;
        request.validate()?;
        if self.users.contains_key(&request.alias) {
            return Err(ValidationError::AlreadyExists.into());
        }
        Ok(self.add_user(&request.alias, &request.password, UserRole::Regular))
    }

    async fn list_resources(
        &self,
        viewer: Option<&Identity>,
        filter: &ResourceFilter,
    ) -> Result<Vec<ListedResource>, BackendError> {
        bump(&self.counters.list_resources);
        self.ensure_online()?;
        let mut rows: Vec<(u64, ListedResource)> = self
            .resources
            .iter()
            .filter(|r| r.resource.category == filter.category)
            .map(|r| {
                let is_favorite = viewer.is_some_and(|v| {
                    self.favorites.contains_key(&Favorite {
                        user_id: v.id,
                        pdf_id: r.resource.id,
                    })
                });
                (
                    r.seq,
                    ListedResource {
                        resource: r.resource.clone(),
                        is_favorite,
                    },
                )
            })
            .filter(|(_, r)| !(filter.favorites_only && viewer.is_some()) || r.is_favorite)
            .collect();
        rows.sort_by(|(a_seq, a), (b_seq, b)| {
            b.resource
                .created_at
                .cmp(&a.resource.created_at)
                .then(b_seq.cmp(a_seq))
        });
        debug!("listed {} resources", rows.len());
        Ok(rows.into_iter().map(|(_, r)| r).collect())
    }

    async fn insert_resources(
        &self,
        actor: &Identity,
        resources: &[NewResource],
    ) -> Result<Vec<Resource>, BackendError> {
        bump(&self.counters.insert_resources);
        self.ensure_online()?;
        for resource in resources {
            require_self(actor, &resource.user_id)?;
            resource.validate()?;
        }
        Ok(resources.iter().cloned().map(|r| self.store(r)).collect())
    }

    async fn update_resource(
        &self,
        actor: &Identity,
        id: ResourceId,
        patch: &ResourcePatch,
    ) -> Result<Resource, BackendError> {
        bump(&self.counters.update_resource);
        self.ensure_online()?;
        require_admin(self.stored_role(actor.id)?)?;
        let mut stored = self
            .resources
            .get_mut(&id)
            .ok_or(ValidationError::NotFound)?;
        patch.validate(stored.resource.category)?;
        stored.resource.title = patch.title.clone();
        stored.resource.description = patch.description.clone();
        stored.resource.drive_link = patch.drive_link.clone();
        Ok(stored.resource.clone())
    }

    async fn delete_resource(&self, actor: &Identity, id: ResourceId) -> Result<(), BackendError> {
        bump(&self.counters.delete_resource);
        self.ensure_online()?;
        require_admin(self.stored_role(actor.id)?)?;
        self.resources
            .remove(&id)
            .ok_or(ValidationError::NotFound)?;
        self.favorites.retain(|f, _| f.pdf_id != id);
        Ok(())
    }

    async fn insert_favorite(
        &self,
        actor: &Identity,
        favorite: &Favorite,
    ) -> Result<(), BackendError> {
        bump(&self.counters.insert_favorite);
        self.ensure_online()?;
        require_self(actor, &favorite.user_id)?;
        if !self.resources.contains_key(&favorite.pdf_id) {
            return Err(ValidationError::NotFound.into());
        }
        if self.favorites.insert(*favorite, ()).is_some() {
            return Err(ValidationError::AlreadyExists.into());
        }
        Ok(())
    }

    async fn delete_favorite(
        &self,
        actor: &Identity,
        favorite: &Favorite,
    ) -> Result<(), BackendError> {
        bump(&self.counters.delete_favorite);
        self.ensure_online()?;
        require_self(actor, &favorite.user_id)?;
        self.favorites.remove(favorite);
        Ok(())
    }
}
