use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::user::UserId;

pub type ResourceId = Uuid;

#[derive(
    Clone,
    Debug,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "resource_category")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Category {
    #[default]
    Code,
    Definition,
    Formula,
}

impl Category {
    /// Only codes must point at a document.
    pub fn requires_drive_link(self) -> bool {
        self == Self::Code
    }
}

/// A row of `pdf_resources`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub description: String,
    pub drive_link: Option<String>,
    pub category: Category,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A resource as seen by one viewer, annotated with that viewer's favorite flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ListedResource {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub resource: Resource,
    pub is_favorite: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceFilter {
    pub category: Category,
    /// Ignored when there is no viewer.
    pub favorites_only: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewResource {
    pub title: String,
    pub description: String,
    pub drive_link: Option<String>,
    pub category: Category,
    pub user_id: UserId,
}

/// The mutable fields of a resource. Category, owner and timestamps are fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResourcePatch {
    pub title: String,
    pub description: String,
    pub drive_link: Option<String>,
}

impl NewResource {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_resource_fields(self.category, &self.title, self.drive_link.as_deref())
    }
}

impl ResourcePatch {
    pub fn validate(&self, category: Category) -> Result<(), ValidationError> {
        validate_resource_fields(category, &self.title, self.drive_link.as_deref())
    }
}

pub fn validate_resource_fields(
    category: Category,
    title: &str,
    drive_link: Option<&str>,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "Title".to_string(),
        });
    }
    let has_link = drive_link.is_some_and(|link| !link.trim().is_empty());
    if category.requires_drive_link() && !has_link {
        return Err(ValidationError::MissingField {
            field: "Google Drive Link".to_string(),
        });
    }
    Ok(())
}

/// Empty form input means "no link".
pub fn normalize_drive_link(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn categories_iterate_in_display_order() {
        let all: Vec<_> = Category::iter().collect();
        assert_eq!(
            all,
            vec![Category::Code, Category::Definition, Category::Formula]
        );
        assert_eq!("Formula".parse::<Category>().unwrap(), Category::Formula);
        assert_eq!(Category::Definition.to_string(), "definition");
    }

    #[test]
    fn code_requires_a_drive_link() {
        let err = validate_resource_fields(Category::Code, "Eurocode 2", Some("  ")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "Google Drive Link".to_string()
            }
        );
        assert!(validate_resource_fields(Category::Definition, "Shear", None).is_ok());
    }

    #[test]
    fn blank_title_is_rejected_for_every_category() {
        for category in [Category::Code, Category::Definition, Category::Formula] {
            assert!(validate_resource_fields(category, " ", Some("https://x")).is_err());
        }
    }

    #[test]
    fn normalize_drive_link_drops_blank_input() {
        assert_eq!(normalize_drive_link("   "), None);
        assert_eq!(
            normalize_drive_link(" https://drive.google.com/x "),
            Some("https://drive.google.com/x".to_string())
        );
    }
}
