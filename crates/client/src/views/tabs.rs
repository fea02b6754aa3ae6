use civil_codes_backend::models::resource::Category;

use crate::category::CATEGORY_TABS;

/// Controlled category selector; the owner keeps the active category.
pub struct CategoryTabs;

impl CategoryTabs {
    /// Resolves a user choice, either a 1-based tab position or a category or label name.
    pub fn choose(input: &str) -> Option<Category> {
        let input = input.trim();
        if let Ok(position) = input.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|index| CATEGORY_TABS.get(index))
                .map(|tab| tab.id);
        }
        if let Ok(category) = input.parse::<Category>() {
            return Some(category);
        }
        CATEGORY_TABS
            .iter()
            .find(|tab| tab.label.eq_ignore_ascii_case(input))
            .map(|tab| tab.id)
    }

    pub fn render(active: Category) -> String {
        CATEGORY_TABS
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                let label = format!("{} {} {}", index + 1, tab.icon, tab.label);
                if tab.id == active {
                    format!("[{label}]")
                } else {
                    format!(" {label} ")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}
