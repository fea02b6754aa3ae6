use civil_codes_backend::models::resource::ListedResource;

/// Controlled query input. Holds nothing but the current text.
#[derive(Clone, Debug, Default)]
pub struct SearchBox {
    value: String,
}

impl SearchBox {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn on_change(&mut self, value: impl Into<String>) -> &str {
        self.value = value.into();
        &self.value
    }

    pub fn render(&self) -> String {
        if self.value.is_empty() {
            "🔍 Search resources...".to_string()
        } else {
            format!("🔍 {}", self.value)
        }
    }
}

/// Case-insensitive substring match on title or description. An empty query matches all.
pub fn matches_query(resource: &ListedResource, query: &str) -> bool {
    let query = query.to_lowercase();
    resource.resource.title.to_lowercase().contains(&query)
        || resource.resource.description.to_lowercase().contains(&query)
}

pub fn filter_resources<'a>(
    resources: &'a [ListedResource],
    query: &str,
) -> Vec<&'a ListedResource> {
    resources
        .iter()
        .filter(|resource| matches_query(resource, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use civil_codes_backend::models::resource::{Category, Resource};
    use uuid::Uuid;

    use super::*;

    fn listed(title: &str, description: &str) -> ListedResource {
        ListedResource {
            resource: Resource {
                id: Uuid::new_v4(),
                title: title.to_string(),
                description: description.to_string(),
                drive_link: None,
                category: Category::Definition,
                user_id: Uuid::new_v4(),
                created_at: Utc::now(),
            },
            is_favorite: false,
        }
    }

    #[test]
    fn matches_title_or_description_ignoring_case() {
        let resources = vec![
            listed("Bending Moment", "internal reaction"),
            listed("Shear force", "Acts parallel to the SECTION"),
            listed("Modulus", "elasticity"),
        ];
        let titles = |query: &str| -> Vec<String> {
            filter_resources(&resources, query)
                .into_iter()
                .map(|r| r.resource.title.clone())
                .collect()
        };
        assert_eq!(titles("moment"), vec!["Bending Moment"]);
        assert_eq!(titles("section"), vec!["Shear force"]);
        assert_eq!(titles("").len(), 3);
        assert!(titles("torsion").is_empty());
    }

    #[test]
    fn on_change_replaces_value() {
        let mut search = SearchBox::default();
        assert_eq!(search.on_change("be"), "be");
        assert_eq!(search.on_change("bea"), "bea");
        assert_eq!(search.value(), "bea");
        assert_eq!(search.render(), "🔍 bea");
    }
}
