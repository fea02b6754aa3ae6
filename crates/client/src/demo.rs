use civil_codes_backend::database::schema::ORIGIN_ALIAS;
use civil_codes_backend::models::resource::{Category, NewResource};
use civil_codes_backend::models::user::UserRole;
use civil_codes_backend::MemoryBackend;

/// In-memory backend with the origin admin, one reader account and a few resources.
pub fn seeded_backend() -> MemoryBackend {
    let backend = MemoryBackend::with_origin_user();
    backend.add_user("reader", "readerpass", UserRole::Regular);
    let owner = backend
        .add_user("librarian", "librarianpass", UserRole::Admin)
        .id;
    let samples = [
        (
            "IS 456:2000",
            "Plain and reinforced concrete, code of practice",
            Some("https://drive.google.com/file/d/is456"),
            Category::Code,
        ),
        (
            "IS 800:2007",
            "General construction in steel",
            Some("https://drive.google.com/file/d/is800"),
            Category::Code,
        ),
        (
            "Bending moment",
            "Reaction induced in a structural element when an external force or moment is applied",
            None,
            Category::Definition,
        ),
        (
            "Euler buckling load",
            "P = π²EI / (KL)²",
            None,
            Category::Formula,
        ),
    ];
    for (title, description, link, category) in samples {
        backend.seed_resource(NewResource {
            title: title.to_string(),
            description: description.to_string(),
            drive_link: link.map(str::to_string),
            category,
            user_id: owner,
        });
    }
    tracing::debug!("seeded demo backend, admin alias: {ORIGIN_ALIAS}");
    backend
}
