use civil_codes_backend::auth::session::SessionSubscription;
use civil_codes_backend::models::resource::Category;
use civil_codes_backend::models::user::Identity;
use civil_codes_backend::BackendClient;
use tracing::{error, info};

use crate::access::AccessPolicy;
use crate::notify::Toaster;
use crate::views::auth::{AuthMode, AuthView};
use crate::views::footer;
use crate::views::resource_list::ResourceList;
use crate::views::tabs::CategoryTabs;
use crate::views::upload_form::UploadForm;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellState {
    Loading,
    SignedOut,
    SignedIn(Identity),
}

/// Owns the session state and composes the auth view or the catalog.
pub struct AppShell {
    client: BackendClient,
    toaster: Toaster,
    access: AccessPolicy,
    state: ShellState,
    active_category: Category,
    subscription: Option<SessionSubscription>,
    auth: AuthView,
    list: ResourceList,
    form: UploadForm,
}

impl AppShell {
    pub fn new(client: BackendClient, access: AccessPolicy, toaster: Toaster) -> Self {
        Self {
            auth: AuthView::new(client.clone(), toaster.clone()),
            list: ResourceList::new(client.clone(), toaster.clone(), access.clone()),
            form: UploadForm::new(client.clone(), toaster.clone()),
            client,
            toaster,
            access,
            state: ShellState::Loading,
            active_category: Category::default(),
            subscription: None,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            ShellState::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn active_category(&self) -> Category {
        self.active_category
    }

    pub fn list(&self) -> &ResourceList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ResourceList {
        &mut self.list
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UploadForm {
        &mut self.form
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Reads the session once, then follows session changes until [`AppShell::unmount`].
    pub async fn mount(&mut self) {
        self.state = ShellState::Loading;
        self.subscription = Some(self.client.on_auth_state_change());
        let session = match self.client.get_session().await {
            Ok(session) => session,
            Err(e) => {
                error!("error fetching session: {e}");
                None
            }
        };
        self.apply_identity(session).await;
    }

    pub fn unmount(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Applies every session change published since the last call.
    pub async fn sync_session(&mut self) -> bool {
        let mut changed = false;
        while let Some(identity) = self.subscription.as_mut().and_then(|s| s.try_next()) {
            self.apply_identity(identity).await;
            changed = true;
        }
        changed
    }

    /// Waits for the next session change and applies it. `None` once unmounted.
    pub async fn next_session_change(&mut self) -> Option<()> {
        let identity = self.subscription.as_mut()?.changed().await?;
        self.apply_identity(identity).await;
        Some(())
    }

    async fn apply_identity(&mut self, identity: Option<Identity>) {
        info!(user = ?identity.as_ref().map(|i| &i.alias), "session state updated");
        self.state = match &identity {
            Some(identity) => ShellState::SignedIn(identity.clone()),
            None => ShellState::SignedOut,
        };
        self.list.set_identity(identity).await;
    }

    pub async fn select_category(&mut self, category: Category) {
        self.active_category = category;
        self.form.set_category(category);
        self.list.set_category(category).await;
    }

    pub async fn sign_in(&mut self, mode: AuthMode, alias: &str, password: &str) -> bool {
        self.auth.submit(mode, alias, password).await
    }

    /// The session subscription clears the identity; nothing is reset here.
    pub async fn sign_out(&mut self) {
        if let Err(e) = self.client.sign_out().await {
            self.toaster.error(e.to_string());
        }
    }

    pub fn can_manage(&self) -> bool {
        self.access.can_manage(self.identity())
    }

    pub fn render(&self) -> String {
        match &self.state {
            ShellState::Loading => "Loading...".to_string(),
            ShellState::SignedOut => {
                format!("CIVIL CODES\n\n{}", self.auth.render())
            }
            ShellState::SignedIn(identity) => {
                let mut sections = vec![
                    format!("CIVIL CODES{:>40}", format!("{} · logout", identity.alias)),
                    CategoryTabs::render(self.active_category),
                    self.list.render(),
                ];
                if self.can_manage() {
                    sections.push(self.form.render());
                } else {
                    sections.push(footer::render());
                }
                sections.join("\n\n")
            }
        }
    }
}
