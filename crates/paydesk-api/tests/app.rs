//! End-to-end flows over the assembled router, driven through the browser
//! surface: forms in, rendered views and redirects out. Cookies are saved
//! across requests so user and admin sessions behave as in one browser.

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestServer, TestServerConfig};
use chrono::Duration;
use serde_json::json;

use paydesk_api::auth;
use paydesk_api::render::HtmlShell;
use paydesk_api::routes::router;
use paydesk_api::session::Sessions;
use paydesk_api::state::{AppConfig, AppState};
use paydesk_api::uploads::Storage;
use paydesk_store::Store;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "891994";

struct Harness {
    server: TestServer,
    // Kept alive so the upload directory survives the test.
    _upload_dir: tempfile::TempDir,
}

async fn harness() -> Harness {
    let store = Arc::new(Store::new());
    let admin_hash = auth::hash_password(ADMIN_PASSWORD).unwrap();
    store.seed_admin(ADMIN_EMAIL, &admin_hash, "Admin");

    let upload_dir = tempfile::tempdir().unwrap();
    let state = AppState {
        store,
        sessions: Arc::new(Sessions::new(Duration::hours(24))),
        renderer: Arc::new(HtmlShell),
        uploads: Arc::new(
            Storage::new(upload_dir.path().to_path_buf())
                .await
                .unwrap(),
        ),
        config: Arc::new(AppConfig {
            production: false,
            receive_number: "01846735445".into(),
            admin_email: ADMIN_EMAIL.into(),
            admin_password: ADMIN_PASSWORD.into(),
            admin_name: "Admin".into(),
        }),
    };

    let config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    Harness {
        server: TestServer::new_with_config(router(state), config).unwrap(),
        _upload_dir: upload_dir,
    }
}

impl Harness {
    async fn register(&self, name: &str, email: &str, password: &str) {
        let response = self
            .server
            .post("/register")
            .form(&json!({
                "name": name,
                "phone": "01712345678",
                "email": email,
                "password": password,
            }))
            .await;
        assert_eq!(response.header("location"), "/login");
    }

    async fn login(&self, email: &str, password: &str) {
        let response = self
            .server
            .post("/login")
            .form(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.header("location"), "/dashboard");
    }

    async fn admin_login(&self) {
        let response = self
            .server
            .post("/admin_login")
            .form(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .await;
        assert_eq!(response.header("location"), "/admin_panel");
    }

    async fn dashboard(&self) -> String {
        let response = self.server.get("/dashboard").await;
        response.assert_status_ok();
        response.text()
    }
}

/// Pull the display id out of a rendered data bag.
fn display_id_in(page: &str) -> String {
    let needle = "&quot;user_id&quot;: &quot;";
    let start = page.find(needle).expect("page carries a user_id") + needle.len();
    let rest = &page[start..];
    rest[..rest.find('&').unwrap()].to_string()
}

#[tokio::test]
async fn guarded_routes_redirect_to_the_matching_login() {
    let h = harness().await;

    let response = h.server.get("/dashboard").await;
    assert_eq!(response.header("location"), "/login");

    let response = h.server.get("/admin_panel").await;
    assert_eq!(response.header("location"), "/admin_login");
}

#[tokio::test]
async fn duplicate_registration_rerenders_with_message() {
    let h = harness().await;
    h.register("Alice", "alice@x.com", "pw1").await;

    let response = h
        .server
        .post("/register")
        .form(&json!({
            "name": "Imposter",
            "phone": "018",
            "email": "alice@x.com",
            "password": "pw2",
        }))
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("already exists"));
}

#[tokio::test]
async fn login_failure_is_generic() {
    let h = harness().await;
    h.register("Alice", "alice@x.com", "pw1").await;

    let wrong_password = h
        .server
        .post("/login")
        .form(&json!({ "email": "alice@x.com", "password": "nope" }))
        .await;
    let unknown_email = h
        .server
        .post("/login")
        .form(&json!({ "email": "nobody@x.com", "password": "pw1" }))
        .await;

    // Same message either way: account existence is not leaked.
    assert!(wrong_password.text().contains("Wrong email or password"));
    assert!(unknown_email.text().contains("Wrong email or password"));
}

#[tokio::test]
async fn payment_approval_scenario() {
    let h = harness().await;
    h.register("Alice", "alice@x.com", "pw1").await;
    h.login("alice@x.com", "pw1").await;

    // Submit a claim for 100. No credit yet.
    let response = h
        .server
        .post("/payment")
        .form(&json!({ "senderNumber": "01711111111", "amount": "100" }))
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("within 5 minutes"));

    let page = h.dashboard().await;
    assert!(page.contains("&quot;balance&quot;: 0"));
    assert!(page.contains("&quot;status&quot;: &quot;pending&quot;"));

    // Admin approves: exactly one credit.
    h.admin_login().await;
    let response = h.server.post("/admin/approve_payment/1").await;
    assert_eq!(response.header("location"), "/admin_panel");

    let page = h.dashboard().await;
    assert!(page.contains("&quot;balance&quot;: 100"));
    assert!(page.contains("&quot;status&quot;: &quot;approved&quot;"));

    // Re-approving is a no-op, never a double credit.
    let response = h.server.post("/admin/approve_payment/1").await;
    assert_eq!(response.header("location"), "/admin_panel");
    assert!(h.dashboard().await.contains("&quot;balance&quot;: 100"));
}

#[tokio::test]
async fn invalid_amount_rerenders_payment_form() {
    let h = harness().await;
    h.register("Alice", "alice@x.com", "pw1").await;
    h.login("alice@x.com", "pw1").await;

    for amount in ["0", "-5", "lots"] {
        let response = h
            .server
            .post("/payment")
            .form(&json!({ "senderNumber": "01711", "amount": amount }))
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("valid amount"));
    }
}

#[tokio::test]
async fn admin_logout_leaves_user_session_alive() {
    let h = harness().await;
    h.register("Alice", "alice@x.com", "pw1").await;
    h.login("alice@x.com", "pw1").await;
    h.admin_login().await;

    let response = h.server.get("/admin_logout").await;
    assert_eq!(response.header("location"), "/admin_login");

    // The admin slot is gone, the user slot on the same cookie is not.
    let response = h.server.get("/admin_panel").await;
    assert_eq!(response.header("location"), "/admin_login");
    h.server.get("/dashboard").await.assert_status_ok();
}

#[tokio::test]
async fn messaging_flow() {
    let h = harness().await;

    // Bob first (id 1), then his display id from his own dashboard.
    h.register("Bob", "bob@x.com", "pwb").await;
    h.login("bob@x.com", "pwb").await;
    let bob_display = display_id_in(&h.dashboard().await);
    h.server.get("/logout").await;

    h.register("Alice", "alice@x.com", "pwa").await;
    h.login("alice@x.com", "pwa").await;

    let response = h
        .server
        .post("/search_user")
        .form(&json!({ "searchUserId": &bob_display }))
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("foundUser"));

    let response = h
        .server
        .post("/send_message")
        .form(&json!({ "receiverId": "1", "messageText": "hi" }))
        .await;
    assert_eq!(
        response.header("location"),
        format!("/search_user_redirect/{bob_display}").as_str()
    );

    // Whitespace-only text is dropped.
    h.server
        .post("/send_message")
        .form(&json!({ "receiverId": "1", "messageText": "   " }))
        .await;

    let response = h
        .server
        .get(&format!("/search_user_redirect/{bob_display}"))
        .await;
    response.assert_status_ok();
    let page = response.text();
    assert_eq!(page.matches("&quot;text&quot;: &quot;hi&quot;").count(), 1);

    // Bob sees the same conversation from his side.
    h.server.get("/logout").await;
    h.login("bob@x.com", "pwb").await;
    let alice_display = display_id_in(&h.dashboard().await);
    let response = h
        .server
        .get(&format!("/search_user_redirect/{alice_display}"))
        .await;
    assert!(response.text().contains("&quot;text&quot;: &quot;hi&quot;"));
}

#[tokio::test]
async fn search_for_unknown_or_self_misses() {
    let h = harness().await;
    h.register("Alice", "alice@x.com", "pw1").await;
    h.login("alice@x.com", "pw1").await;
    let own_display = display_id_in(&h.dashboard().await);

    for search in ["U000000000", own_display.as_str()] {
        let response = h
            .server
            .post("/search_user")
            .form(&json!({ "searchUserId": search }))
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("No user was found"));
    }
}

#[tokio::test]
async fn review_with_screenshot_is_stored() {
    let h = harness().await;
    h.register("Alice", "alice@x.com", "pw1").await;
    h.login("alice@x.com", "pw1").await;

    let form = MultipartForm::new()
        .add_text("returnNumber", "01712345678")
        .add_text("message", "money not returned")
        .add_part("screenshot", Part::bytes(b"png-bytes".to_vec()).file_name("proof.png"));

    let response = h.server.post("/write_review").multipart(form).await;
    response.assert_status_ok();
    assert!(response.text().contains("within 30 minutes"));

    // Admin sees the review with its stored file reference.
    h.admin_login().await;
    let panel = h.server.get("/admin_panel").await.text();
    assert!(panel.contains("money not returned"));
    assert!(panel.contains("-proof.png"));
}

#[tokio::test]
async fn cascade_delete_removes_user_and_their_records() {
    let h = harness().await;
    h.register("Alice", "alice@x.com", "pw1").await;
    h.login("alice@x.com", "pw1").await;
    h.server
        .post("/payment")
        .form(&json!({ "senderNumber": "01711", "amount": "100" }))
        .await;

    h.admin_login().await;
    let response = h.server.post("/admin/delete_user/1").await;
    assert_eq!(response.header("location"), "/admin/user_information");

    let panel = h.server.get("/admin_panel").await.text();
    assert!(!panel.contains("alice@x.com"));
    assert!(!panel.contains("&quot;status&quot;: &quot;pending&quot;"));

    // The deleted user's live session no longer grants access.
    let response = h.server.get("/dashboard").await;
    assert_eq!(response.header("location"), "/login");
}
