use once_cell::sync::Lazy;
use tokio::sync::Mutex;

use crate::api::CatalogApi;
use crate::database::connection::{DbConfig, DbConnection};
use crate::database::schema::{ORIGIN_ALIAS, ORIGIN_PASSWORD};
use crate::error::{BackendError, ValidationError};
use crate::models::favorite::Favorite;
use crate::models::resource::{Category, NewResource, ResourceFilter, ResourcePatch};
use crate::models::user::{Credentials, Identity, SignUpRequest, UserRole};

/// Some tests can't run in parallel, prevent them from breaking each other's state
static SERIAL_LOCK: Lazy<Mutex<()>> = Lazy::new(Mutex::default);

async fn init_and_get_db() -> DbConnection {
    let _ = tracing_subscriber::fmt::try_init();

    let config = DbConfig::development("civil_codes_db", "civil_codes_guest", "civilpass");
    let db = DbConnection::connect(&config).await.unwrap();
    db.drop_all().await.unwrap();
    db.create_all().await.unwrap();
    db
}

async fn sign_in_origin(db: &DbConnection) -> Identity {
    db.authenticate(&Credentials {
        alias: ORIGIN_ALIAS.to_string(),
        password: ORIGIN_PASSWORD.to_string(),
    })
    .await
    .unwrap()
}

fn code(owner: &Identity, title: &str) -> NewResource {
    NewResource {
        title: title.to_string(),
        description: format!("{title} description"),
        drive_link: Some("https://drive.google.com/file/d/abc".to_string()),
        category: Category::Code,
        user_id: owner.id,
    }
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn favorites_join_per_viewer() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let origin = sign_in_origin(&db).await;
    assert_eq!(origin.role, UserRole::Admin);
    let reader = db
        .register(&SignUpRequest {
            alias: "reader".to_string(),
            password: "readerpass".to_string(),
        })
        .await
        .unwrap();

    let created = db
        .insert_resources(&origin, &[code(&origin, "IS 456"), code(&origin, "IS 800")])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);

    let favorite = Favorite {
        user_id: reader.id,
        pdf_id: created[0].id,
    };
    db.insert_favorite(&reader, &favorite).await.unwrap();
    let err = db.insert_favorite(&reader, &favorite).await.unwrap_err();
    assert!(matches!(
        err,
        BackendError::Validation(ValidationError::AlreadyExists)
    ));

    let all = ResourceFilter {
        category: Category::Code,
        favorites_only: false,
    };
    let listed = db.list_resources(Some(&reader), &all).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed.iter().filter(|r| r.is_favorite).count(), 1);
    let listed = db.list_resources(Some(&origin), &all).await.unwrap();
    assert!(listed.iter().all(|r| !r.is_favorite));

    let favorites = ResourceFilter {
        favorites_only: true,
        ..all.clone()
    };
    let listed = db.list_resources(Some(&reader), &favorites).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].resource.title, "IS 456");

    db.delete_favorite(&reader, &favorite).await.unwrap();
    assert!(db
        .list_resources(Some(&reader), &favorites)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn only_admin_edits_and_deletes() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let origin = sign_in_origin(&db).await;
    let reader = db
        .register(&SignUpRequest {
            alias: "reader".to_string(),
            password: "readerpass".to_string(),
        })
        .await
        .unwrap();
    let created = db
        .insert_resources(&reader, &[code(&reader, "Eurocode 7")])
        .await
        .unwrap()
        .remove(0);

    let patch = ResourcePatch {
        title: "Eurocode 7: Geotechnical design".to_string(),
        description: "Part 1".to_string(),
        drive_link: Some("https://drive.google.com/file/d/new".to_string()),
    };
    db.update_resource(&reader, created.id, &patch)
        .await
        .unwrap_err();
    let updated = db.update_resource(&origin, created.id, &patch).await.unwrap();
    assert_eq!(updated.title, patch.title);
    assert_eq!(updated.category, created.category);
    assert_eq!(updated.user_id, created.user_id);
    assert_eq!(updated.created_at, created.created_at);

    db.delete_resource(&reader, created.id).await.unwrap_err();
    db.delete_resource(&origin, created.id).await.unwrap();
    let err = db.delete_resource(&origin, created.id).await.unwrap_err();
    assert!(matches!(err, BackendError::Validation(ValidationError::NotFound)));
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn dangling_favorite_and_long_title_match_memory_backend() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let origin = sign_in_origin(&db).await;
    let err = db
        .insert_favorite(
            &origin,
            &Favorite {
                user_id: origin.id,
                pdf_id: uuid::Uuid::new_v4(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BackendError::Validation(ValidationError::NotFound)
    ));

    let long_title = "Eurocode ".repeat(40);
    let created = db
        .insert_resources(&origin, &[code(&origin, &long_title)])
        .await
        .unwrap();
    assert_eq!(created[0].title, long_title);
}
