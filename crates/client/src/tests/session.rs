use std::sync::Arc;

use civil_codes_backend::models::resource::{Category, NewResource};
use civil_codes_backend::models::user::UserRole;
use civil_codes_backend::{BackendClient, MemoryBackend};

use crate::access::AccessPolicy;
use crate::notify::Toaster;
use crate::repl::Repl;
use crate::views::auth::AuthMode;
use crate::views::shell::{AppShell, ShellState};

fn shell_with(backend: Arc<MemoryBackend>) -> (AppShell, BackendClient, Toaster) {
    let client = BackendClient::new(backend);
    let toaster = Toaster::default();
    let shell = AppShell::new(client.clone(), AccessPolicy::default(), toaster.clone());
    (shell, client, toaster)
}

fn backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::with_origin_user());
    backend.add_user("reader", "readerpass", UserRole::Regular);
    backend
}

#[tokio::test]
async fn shell_starts_loading_then_follows_the_session() {
    let (mut shell, _client, _toaster) = shell_with(backend());
    assert_eq!(shell.state(), &ShellState::Loading);
    assert_eq!(shell.render(), "Loading...");

    shell.mount().await;
    assert_eq!(shell.state(), &ShellState::SignedOut);
    assert!(shell.render().contains("login <alias> <password>"));

    assert!(shell.sign_in(AuthMode::SignIn, "reader", "readerpass").await);
    // nothing changes until the subscription delivers
    assert_eq!(shell.state(), &ShellState::SignedOut);
    assert!(shell.sync_session().await);
    assert_eq!(shell.identity().map(|i| i.alias.as_str()), Some("reader"));
    assert_eq!(shell.list().identity().map(|i| i.alias.as_str()), Some("reader"));

    shell.sign_out().await;
    assert!(shell.sync_session().await);
    assert_eq!(shell.state(), &ShellState::SignedOut);
    assert!(shell.list().identity().is_none());
}

#[tokio::test]
async fn mount_picks_up_an_existing_session() {
    let (mut shell, client, _toaster) = shell_with(backend());
    client
        .sign_in(&civil_codes_backend::models::user::Credentials {
            alias: "origin".to_string(),
            password: "changepassword".to_string(),
        })
        .await
        .unwrap();
    shell.mount().await;
    assert!(matches!(shell.state(), ShellState::SignedIn(identity) if identity.alias == "origin"));
    assert!(!shell.sync_session().await);
}

#[tokio::test]
async fn unmount_stops_following_the_session() {
    let (mut shell, client, _toaster) = shell_with(backend());
    shell.mount().await;
    assert!(shell.is_mounted());
    shell.unmount();
    assert!(!shell.is_mounted());

    shell.sign_in(AuthMode::SignIn, "reader", "readerpass").await;
    assert!(client.current_identity().is_some());
    assert!(!shell.sync_session().await);
    assert_eq!(shell.state(), &ShellState::SignedOut);
    assert_eq!(shell.next_session_change().await, None);
}

#[tokio::test]
async fn admin_sees_upload_form_and_reader_sees_footer() {
    let (mut shell, _client, _toaster) = shell_with(backend());
    shell.mount().await;

    shell.sign_in(AuthMode::SignIn, "origin", "changepassword").await;
    shell.sync_session().await;
    let screen = shell.render();
    assert!(screen.contains("Upload New Code"));
    assert!(!screen.contains("Contribute to Our Community"));

    shell.sign_out().await;
    shell.sync_session().await;
    shell.sign_in(AuthMode::SignIn, "reader", "readerpass").await;
    shell.sync_session().await;
    let screen = shell.render();
    assert!(!screen.contains("Upload New"));
    assert!(screen.contains("Contribute to Our Community"));
}

#[tokio::test]
async fn selecting_a_category_updates_tabs_list_and_form() {
    let backend = backend();
    backend.seed_resource(NewResource {
        title: "Euler buckling load".to_string(),
        description: String::new(),
        drive_link: None,
        category: Category::Formula,
        user_id: uuid::Uuid::new_v4(),
    });
    let (mut shell, _client, _toaster) = shell_with(backend);
    shell.mount().await;
    shell.sign_in(AuthMode::SignIn, "origin", "changepassword").await;
    shell.sync_session().await;

    shell.select_category(Category::Formula).await;
    assert_eq!(shell.active_category(), Category::Formula);
    assert_eq!(shell.form().category(), Category::Formula);
    assert_eq!(shell.list().resources().len(), 1);
    let screen = shell.render();
    assert!(screen.contains("[3 🤝 Contribute PDF]"));
    assert!(screen.contains("Upload New Formula"));
}

#[tokio::test]
async fn scripted_session_signs_in_favorites_and_signs_out() {
    let backend = backend();
    backend.seed_resource(NewResource {
        title: "IS 456".to_string(),
        description: "Reinforced concrete".to_string(),
        drive_link: Some("https://drive.google.com/file/d/is456".to_string()),
        category: Category::Code,
        user_id: uuid::Uuid::new_v4(),
    });
    let (mut shell, _client, toaster) = shell_with(backend.clone());
    let script = "login reader readerpass\nfav 1\nopen 1\nbogus\nlogout\nquit\n";
    let mut repl = Repl::new(script.as_bytes(), Vec::new(), toaster);
    repl.run(&mut shell).await.unwrap();

    let output = String::from_utf8(repl.into_output()).unwrap();
    assert!(output.contains("✔ Welcome back, reader!"), "{output}");
    assert!(output.contains("✔ Added to favorites"), "{output}");
    assert!(output.contains("https://drive.google.com/file/d/is456"));
    assert!(output.contains("unknown command `bogus`"));
    assert_eq!(backend.calls().insert_favorite, 1);
    assert_eq!(shell.state(), &ShellState::SignedOut);
    assert!(!shell.is_mounted());
}

#[tokio::test]
async fn scripted_delete_asks_for_confirmation() {
    let backend = backend();
    let resource = backend.seed_resource(NewResource {
        title: "Withdrawn code".to_string(),
        description: String::new(),
        drive_link: Some("https://drive.google.com/file/d/old".to_string()),
        category: Category::Code,
        user_id: uuid::Uuid::new_v4(),
    });
    let (mut shell, _client, toaster) = shell_with(backend.clone());
    let script = "login origin changepassword\ndelete 1\nn\ndelete 1\ny\nquit\n";
    let mut repl = Repl::new(script.as_bytes(), Vec::new(), toaster);
    repl.run(&mut shell).await.unwrap();

    let output = String::from_utf8(repl.into_output()).unwrap();
    assert!(output.contains("Are you sure you want to delete \"Withdrawn code\"? [y/N]"));
    assert_eq!(backend.calls().delete_resource, 1);
    assert!(backend.resource(resource.id).is_none());
    assert!(output.contains("✔ Resource deleted successfully"));
}

#[tokio::test]
async fn scripted_typed_delete_requires_the_phrase() {
    let backend = backend();
    let resource = backend.seed_resource(NewResource {
        title: "Superseded code".to_string(),
        description: String::new(),
        drive_link: Some("https://drive.google.com/file/d/superseded".to_string()),
        category: Category::Code,
        user_id: uuid::Uuid::new_v4(),
    });
    let (mut shell, _client, toaster) = shell_with(backend.clone());
    let script = "login origin changepassword\ndelete 1\nyes\ndelete 1\nDELETE\nquit\n";
    let mut repl = Repl::new(script.as_bytes(), Vec::new(), toaster).typed_delete(true);
    repl.run(&mut shell).await.unwrap();

    let output = String::from_utf8(repl.into_output()).unwrap();
    assert!(output.contains("Type 'delete' to remove \"Superseded code\":"), "{output}");
    assert!(output.contains("✖ Please type \"delete\" to confirm."), "{output}");
    assert_eq!(backend.calls().delete_resource, 1);
    assert!(backend.resource(resource.id).is_none());
}

#[tokio::test]
async fn scripted_delete_by_reader_is_refused_without_prompting() {
    let backend = backend();
    let resource = backend.seed_resource(NewResource {
        title: "Current code".to_string(),
        description: String::new(),
        drive_link: Some("https://drive.google.com/file/d/current".to_string()),
        category: Category::Code,
        user_id: uuid::Uuid::new_v4(),
    });
    let (mut shell, _client, toaster) = shell_with(backend.clone());
    let script = "login reader readerpass\ndelete 1\nquit\n";
    let mut repl = Repl::new(script.as_bytes(), Vec::new(), toaster);
    repl.run(&mut shell).await.unwrap();

    let output = String::from_utf8(repl.into_output()).unwrap();
    assert!(output.contains("✖ Only the administrator can delete resources"), "{output}");
    assert!(!output.contains("Are you sure"), "{output}");
    assert_eq!(backend.calls().delete_resource, 0);
    assert!(backend.resource(resource.id).is_some());
}
