use civil_codes_backend::models::resource::Category;

pub struct CategoryTab {
    pub id: Category,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Tab order as shown in the navigation.
pub static CATEGORY_TABS: [CategoryTab; 3] = [
    CategoryTab {
        id: Category::Code,
        label: "Codes",
        icon: "📄",
    },
    CategoryTab {
        id: Category::Definition,
        label: "Definitions",
        icon: "📖",
    },
    CategoryTab {
        id: Category::Formula,
        label: "Contribute PDF",
        icon: "🤝",
    },
];

pub fn category_title(category: Category) -> &'static str {
    match category {
        Category::Code => "Code",
        Category::Definition => "Definition",
        Category::Formula => "Formula",
    }
}

pub fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Code => "📄",
        Category::Definition => "📖",
        Category::Formula => "🧮",
    }
}
