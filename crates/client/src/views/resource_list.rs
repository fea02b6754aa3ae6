use civil_codes_backend::models::favorite::Favorite;
use civil_codes_backend::models::resource::{
    normalize_drive_link, validate_resource_fields, Category, ListedResource, ResourceFilter,
    ResourceId, ResourcePatch,
};
use civil_codes_backend::models::user::Identity;
use civil_codes_backend::{BackendClient, BackendError, ValidationError};
use tracing::{debug, error};

use crate::access::AccessPolicy;
use crate::category::category_icon;
use crate::notify::Toaster;
use crate::views::search::{filter_resources, SearchBox};

pub const DELETE_PHRASE: &str = "delete";

/// How a destructive delete gets confirmed.
pub trait DeleteConfirmation {
    fn confirm(&self, resource: &ListedResource) -> bool;

    /// Reported when confirmation fails; `None` means a silent cancel.
    fn rejection(&self) -> Option<&str> {
        None
    }
}

/// Yes/no dialog answered by a callback.
pub struct ConfirmDialog<F>(pub F);

impl<F> DeleteConfirmation for ConfirmDialog<F>
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, resource: &ListedResource) -> bool {
        (self.0)(&format!(
            "Are you sure you want to delete \"{}\"?",
            resource.resource.title
        ))
    }
}

/// The user must type the delete phrase, in any case.
pub struct TypedPhrase(pub String);

impl DeleteConfirmation for TypedPhrase {
    fn confirm(&self, _resource: &ListedResource) -> bool {
        self.0.trim().eq_ignore_ascii_case(DELETE_PHRASE)
    }

    fn rejection(&self) -> Option<&str> {
        Some("Please type \"delete\" to confirm.")
    }
}

/// Which controls a row offers to the current identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowActions {
    pub favorite: bool,
    pub edit: bool,
    pub delete: bool,
}

/// Local edits of one row; discarded on cancel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditDraft {
    pub id: ResourceId,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub drive_link: String,
}

impl EditDraft {
    fn patch(&self) -> Result<ResourcePatch, ValidationError> {
        let drive_link = normalize_drive_link(&self.drive_link);
        validate_resource_fields(self.category, &self.title, drive_link.as_deref())?;
        Ok(ResourcePatch {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            drive_link,
        })
    }
}

/// A fetch in flight. Applying it is a no-op once a newer fetch has been issued.
#[derive(Clone, Debug)]
pub struct FetchTicket {
    generation: u64,
    filter: ResourceFilter,
}

pub struct FetchOutcome {
    generation: u64,
    result: Result<Vec<ListedResource>, BackendError>,
}

impl FetchTicket {
    pub async fn run(self, client: &BackendClient) -> FetchOutcome {
        FetchOutcome {
            generation: self.generation,
            result: client.list_resources(&self.filter).await,
        }
    }
}

pub struct ResourceList {
    client: BackendClient,
    toaster: Toaster,
    access: AccessPolicy,
    category: Category,
    show_favorites: bool,
    identity: Option<Identity>,
    search: SearchBox,
    resources: Vec<ListedResource>,
    editing: Option<EditDraft>,
    generation: u64,
}

impl ResourceList {
    pub fn new(client: BackendClient, toaster: Toaster, access: AccessPolicy) -> Self {
        Self {
            client,
            toaster,
            access,
            category: Category::default(),
            show_favorites: false,
            identity: None,
            search: SearchBox::default(),
            resources: Vec::new(),
            editing: None,
            generation: 0,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn show_favorites(&self) -> bool {
        self.show_favorites
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn resources(&self) -> &[ListedResource] {
        &self.resources
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut EditDraft> {
        self.editing.as_mut()
    }

    pub fn search(&self) -> &str {
        self.search.value()
    }

    /// Client-side filter only, no fetch.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search.on_change(query);
    }

    /// Resources after the search filter, in fetch order.
    pub fn visible(&self) -> Vec<&ListedResource> {
        filter_resources(&self.resources, self.search.value())
    }

    /// Looks up a visible row by its 1-based position.
    pub fn visible_at(&self, position: usize) -> Option<&ListedResource> {
        position
            .checked_sub(1)
            .and_then(|index| self.visible().get(index).copied())
    }

    pub fn row_actions(&self) -> RowActions {
        let manage = self.access.can_manage(self.identity.as_ref());
        RowActions {
            favorite: self.identity.is_some(),
            edit: manage,
            delete: manage,
        }
    }

    pub async fn set_category(&mut self, category: Category) {
        if self.category == category {
            return;
        }
        self.category = category;
        self.editing = None;
        self.fetch().await;
    }

    pub async fn toggle_show_favorites(&mut self) {
        self.show_favorites = !self.show_favorites;
        self.fetch().await;
    }

    pub async fn set_identity(&mut self, identity: Option<Identity>) {
        if self.identity == identity {
            return;
        }
        self.identity = identity;
        if !self.access.can_manage(self.identity.as_ref()) {
            self.editing = None;
        }
        self.fetch().await;
    }

    /// Issues a new fetch, superseding any earlier ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            filter: ResourceFilter {
                category: self.category,
                favorites_only: self.show_favorites,
            },
        }
    }

    /// Returns whether the outcome replaced the list. Failures and stale outcomes keep it.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                latest = self.generation,
                "discarding stale fetch"
            );
            return false;
        }
        match outcome.result {
            Ok(resources) => {
                self.resources = resources;
                true
            }
            Err(e) => {
                error!("error fetching resources: {e}");
                false
            }
        }
    }

    pub async fn fetch(&mut self) -> bool {
        let ticket = self.begin_fetch();
        let outcome = ticket.run(&self.client).await;
        self.apply(outcome)
    }

    pub async fn toggle_favorite(&mut self, id: ResourceId) {
        let Some(identity) = self.identity.clone() else {
            self.toaster.error("Please sign in to add favorites");
            return;
        };
        let Some(current) = self.find(id).map(|r| r.is_favorite) else {
            self.toaster.error(ValidationError::NotFound.to_string());
            return;
        };
        let favorite = Favorite {
            user_id: identity.id,
            pdf_id: id,
        };
        let result = if current {
            self.client.delete_favorite(&favorite).await
        } else {
            self.client.insert_favorite(&favorite).await
        };
        match result {
            Ok(()) => {
                self.fetch().await;
                self.toaster.success(if current {
                    "Removed from favorites"
                } else {
                    "Added to favorites"
                });
            }
            Err(e) => self.toaster.error(e.to_string()),
        }
    }

    /// Reports the missing permission, so callers can skip asking for confirmation.
    pub fn ensure_can_delete(&self) -> bool {
        let allowed = self.row_actions().delete;
        if !allowed {
            self.toaster.error("Only the administrator can delete resources");
        }
        allowed
    }

    pub async fn delete(&mut self, id: ResourceId, confirmation: &dyn DeleteConfirmation) {
        if !self.ensure_can_delete() {
            return;
        }
        let Some(resource) = self.find(id) else {
            self.toaster.error(ValidationError::NotFound.to_string());
            return;
        };
        if !confirmation.confirm(resource) {
            if let Some(message) = confirmation.rejection() {
                self.toaster.error(message);
            }
            return;
        }
        match self.client.delete_resource(id).await {
            Ok(()) => {
                if self.editing.as_ref().is_some_and(|draft| draft.id == id) {
                    self.editing = None;
                }
                self.resources.retain(|r| r.resource.id != id);
                self.fetch().await;
                self.toaster.success("Resource deleted successfully");
            }
            Err(e) => {
                error!("error deleting resource: {e}");
                self.toaster.error(format!("Error deleting resource: {e}"));
            }
        }
    }

    /// Opens the inline form for one row, replacing any other open draft.
    pub fn begin_edit(&mut self, id: ResourceId) -> bool {
        if !self.row_actions().edit {
            self.toaster.error("Only the administrator can edit resources");
            return false;
        }
        let Some(listed) = self.find(id) else {
            self.toaster.error(ValidationError::NotFound.to_string());
            return false;
        };
        let resource = &listed.resource;
        self.editing = Some(EditDraft {
            id,
            category: resource.category,
            title: resource.title.clone(),
            description: resource.description.clone(),
            drive_link: resource.drive_link.clone().unwrap_or_default(),
        });
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub async fn save_edit(&mut self) -> bool {
        let Some(draft) = self.editing.as_ref() else {
            return false;
        };
        let patch = match draft.patch() {
            Ok(patch) => patch,
            Err(e) => {
                self.toaster.error(e.to_string());
                return false;
            }
        };
        match self.client.update_resource(draft.id, &patch).await {
            Ok(_) => {
                self.editing = None;
                self.fetch().await;
                self.toaster.success("Resource updated successfully");
                true
            }
            Err(e) => {
                self.toaster.error(e.to_string());
                false
            }
        }
    }

    fn find(&self, id: ResourceId) -> Option<&ListedResource> {
        self.resources.iter().find(|r| r.resource.id == id)
    }

    pub fn render(&self) -> String {
        let actions = self.row_actions();
        let mut lines = vec![self.search.render()];
        if self.identity.is_some() {
            lines.push(if self.show_favorites {
                "♥ Show All (favorites)".to_string()
            } else {
                "♡ Show Favorites".to_string()
            });
        }
        let visible = self.visible();
        for (index, listed) in visible.iter().enumerate() {
            let resource = &listed.resource;
            let mut controls = Vec::new();
            if actions.favorite {
                controls.push(if listed.is_favorite { "♥" } else { "♡" });
            }
            if actions.edit {
                controls.push("✎");
            }
            if actions.delete {
                controls.push("🗑");
            }
            lines.push(format!(
                "{:>2}. {} {}  {}",
                index + 1,
                category_icon(resource.category),
                resource.title,
                controls.join(" ")
            ));
            match self.editing.as_ref().filter(|draft| draft.id == resource.id) {
                Some(draft) => {
                    lines.push(format!("    title: {}", draft.title));
                    lines.push(format!("    description: {}", draft.description));
                    lines.push(format!("    link: {}", draft.drive_link));
                    lines.push("    (save | cancel)".to_string());
                }
                None => {
                    if !resource.description.is_empty() {
                        lines.push(format!("    {}", resource.description));
                    }
                    lines.push(format!(
                        "    Added on {}",
                        resource.created_at.format("%Y-%m-%d")
                    ));
                }
            }
        }
        if visible.is_empty() {
            lines.push(if self.show_favorites {
                "No favorite resources found.".to_string()
            } else {
                "No resources found matching your search.".to_string()
            });
        }
        lines.join("\n")
    }
}
