use civil_codes_backend::models::resource::{
    normalize_drive_link, validate_resource_fields, Category, NewResource,
};
use civil_codes_backend::BackendClient;

use crate::category::category_title;
use crate::notify::Toaster;

/// Fields of a new resource for the active category.
pub struct UploadForm {
    client: BackendClient,
    toaster: Toaster,
    category: Category,
    pub title: String,
    pub description: String,
    pub drive_link: String,
}

impl UploadForm {
    pub fn new(client: BackendClient, toaster: Toaster) -> Self {
        Self {
            client,
            toaster,
            category: Category::default(),
            title: String::new(),
            description: String::new(),
            drive_link: String::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn drive_link_required(&self) -> bool {
        self.category.requires_drive_link()
    }

    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.drive_link.is_empty()
    }

    /// Checks the session, validates, then inserts on behalf of the signed-in identity.
    /// Fields are cleared on success and kept for a retry on failure.
    pub async fn submit(&mut self) -> bool {
        let Some(identity) = self.client.current_identity() else {
            self.toaster
                .error("You must be logged in to upload resources");
            return false;
        };
        let drive_link = normalize_drive_link(&self.drive_link);
        if let Err(e) = validate_resource_fields(self.category, &self.title, drive_link.as_deref())
        {
            self.toaster.error(e.to_string());
            return false;
        }
        let resource = NewResource {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            drive_link,
            category: self.category,
            user_id: identity.id,
        };
        match self.client.insert_resources(&[resource]).await {
            Ok(_) => {
                self.toaster.success("Resource added successfully!");
                self.title.clear();
                self.description.clear();
                self.drive_link.clear();
                true
            }
            Err(e) => {
                self.toaster.error(e.to_string());
                false
            }
        }
    }

    pub fn render(&self) -> String {
        let title = category_title(self.category);
        let marker = if self.drive_link_required() { " *" } else { "" };
        [
            format!("── Upload New {title} ──"),
            format!("Title *: {}", self.title),
            format!("Description: {}", self.description),
            format!("Google Drive Link{marker}: {}", self.drive_link),
            format!("(upload) Upload {title}"),
        ]
        .join("\n")
    }
}
