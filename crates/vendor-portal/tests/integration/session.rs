//! Integration tests for the session gate.

use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;

use vendor_auth::PasswordHasher;
use vendor_sheets::MemoryStore;

use crate::common::{CONFIG, TestPortal, body_text, session_cookie, set_cookie_header};

#[tokio::test]
async fn test_index_without_session_shows_login() {
    let portal = TestPortal::new();
    let resp = portal.get("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_text(resp).await;
    assert!(html.contains("action=\"/login\""));
    assert!(!html.contains("action=\"/vendors\""));
    assert!(!html.contains("action=\"/register\""));
}

#[tokio::test]
async fn test_plaintext_password_hashed_on_start() {
    let portal = TestPortal::new();
    let saved = portal.saved_config();
    let hash = &saved.credentials.user("jsmith").unwrap().password;
    assert!(PasswordHasher::is_hash(hash));
}

#[tokio::test]
async fn test_login_success_opens_session() {
    let portal = TestPortal::new();
    let resp = portal
        .post_form("/login", "username=jsmith&password=secret", None)
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[http::header::LOCATION], "/");

    let set_cookie = set_cookie_header(&resp).unwrap();
    assert!(set_cookie.starts_with("vendor_portal="));
    assert!(set_cookie.contains("HttpOnly"));

    let cookie = session_cookie(&resp).unwrap();
    let html = body_text(portal.get("/", Some(&cookie)).await).await;
    assert!(html.contains("Welcome <strong>John Smith</strong>"));
    assert!(html.contains("Enter the details of the new vendor below."));

    let user = portal.saved_user("jsmith");
    assert!(user.logged_in);
    assert_eq!(user.failed_login_attempts, 0);
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let portal = TestPortal::new();
    let resp = portal
        .post_form("/login", "username=jsmith&password=wrong", None)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&resp).is_none());

    let html = body_text(resp).await;
    assert!(html.contains("password is incorrect"));
    assert!(html.contains("class=\"notice error\""));

    let user = portal.saved_user("jsmith");
    assert_eq!(user.failed_login_attempts, 1);
    assert!(!user.logged_in);
}

#[tokio::test]
async fn test_unknown_user_rejected() {
    let portal = TestPortal::new();
    let resp = portal
        .post_form("/login", "username=nobody&password=secret", None)
        .await;
    assert!(session_cookie(&resp).is_none());
    assert!(body_text(resp).await.contains("password is incorrect"));
}

#[tokio::test]
async fn test_empty_login_is_login_error() {
    let portal = TestPortal::new();
    let resp = portal
        .post_form("/login", "username=&password=", None)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Username is empty"));

    let user = portal.saved_user("jsmith");
    assert_eq!(user.failed_login_attempts, 0);
}

#[tokio::test]
async fn test_tampered_cookie_shows_login() {
    let portal = TestPortal::new();
    let cookie = portal.login().await;
    let tampered = format!("{cookie}x");

    let html = body_text(portal.get("/", Some(&tampered)).await).await;
    assert!(html.contains("action=\"/login\""));
    assert!(!html.contains("Welcome"));
}

#[tokio::test]
async fn test_cookie_signed_with_other_key_rejected() {
    let portal = TestPortal::new();
    let yaml = CONFIG.replace("some_signature_key", "another_key");
    let other = TestPortal::with_store(Arc::new(MemoryStore::new()), &yaml);
    let cookie = other.login().await;

    let html = body_text(portal.get("/", Some(&cookie)).await).await;
    assert!(html.contains("action=\"/login\""));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let portal = TestPortal::new();
    let cookie = portal.login().await;

    let resp = portal.post_form("/logout", "", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let set_cookie = set_cookie_header(&resp).unwrap();
    assert!(set_cookie.starts_with("vendor_portal=;"));
    assert!(set_cookie.contains("Max-Age=0"));

    let user = portal.saved_user("jsmith");
    assert!(!user.logged_in);
}

// ============================================================
// Password reset
// ============================================================

#[tokio::test]
async fn test_reset_requires_session() {
    let portal = TestPortal::new();
    let resp = portal
        .post_form(
            "/reset-password",
            "current_password=secret&new_password=n3w&new_password_repeat=n3w",
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(resp).await.contains("authentication required"));
}

#[tokio::test]
async fn test_reset_mismatch_leaves_password() {
    let portal = TestPortal::new();
    let cookie = portal.login().await;
    let before = portal.saved_user("jsmith").password;

    let resp = portal
        .post_form(
            "/reset-password",
            "current_password=secret&new_password=one&new_password_repeat=two",
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Passwords do not match"));

    let after = portal.saved_user("jsmith").password;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_reset_wrong_current_password() {
    let portal = TestPortal::new();
    let cookie = portal.login().await;

    let resp = portal
        .post_form(
            "/reset-password",
            "current_password=nope&new_password=n3w&new_password_repeat=n3w",
            Some(&cookie),
        )
        .await;
    assert!(body_text(resp).await.contains("Password is incorrect"));
}

#[tokio::test]
async fn test_reset_success_changes_password() {
    let portal = TestPortal::new();
    let cookie = portal.login().await;

    let resp = portal
        .post_form(
            "/reset-password",
            "current_password=secret&new_password=n3w&new_password_repeat=n3w",
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Password modified successfully"));
    assert!(html.contains("class=\"notice success\""));

    let resp = portal
        .post_form("/login", "username=jsmith&password=secret", None)
        .await;
    assert!(session_cookie(&resp).is_none());
    portal.login_as("jsmith", "n3w").await;
}

#[tokio::test]
async fn test_cookie_for_removed_user_shows_login() {
    let portal = TestPortal::new();
    let cookie = portal.cookie_for("ghost");
    let html = body_text(portal.get("/", Some(&cookie)).await).await;
    assert!(html.contains("action=\"/login\""));

    let cookie = portal.cookie_for("jsmith");
    let html = body_text(portal.get("/", Some(&cookie)).await).await;
    assert!(html.contains("action=\"/vendors\""));
}

#[tokio::test]
async fn test_login_hashing_leaves_runtime_free() {
    let portal = Arc::new(TestPortal::with_cost(12));
    let login = tokio::spawn({
        let portal = portal.clone();
        async move {
            portal
                .post_form("/login", "username=jsmith&password=secret", None)
                .await
                .status()
        }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    let resp = portal.get("/", Some(&portal.cookie_for("jsmith"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!login.is_finished());

    assert_eq!(login.await.unwrap(), StatusCode::SEE_OTHER);
}

// ============================================================
// Registration
// ============================================================

#[tokio::test]
async fn test_register_not_mounted_by_default() {
    let portal = TestPortal::new();
    let resp = portal
        .post_form(
            "/register",
            "email=new%40example.com&username=newbie&name=New&password=pw&password_repeat=pw",
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_when_enabled() {
    let portal = TestPortal::with_registration(false);
    let html = body_text(portal.get("/", None).await).await;
    assert!(html.contains("action=\"/register\""));

    let resp = portal
        .post_form(
            "/register",
            "email=new%40example.com&username=newbie&name=New+User&password=pw&password_repeat=pw",
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("User registered successfully"));

    let saved = portal.saved_config();
    let user = saved.credentials.user("newbie").unwrap();
    assert_eq!(user.email, "new@example.com");
    assert_eq!(user.name, "New User");
    assert!(PasswordHasher::is_hash(&user.password));

    portal.login_as("newbie", "pw").await;
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let portal = TestPortal::with_registration(false);
    let resp = portal
        .post_form(
            "/register",
            "email=other%40example.com&username=jsmith&name=Other&password=pw&password_repeat=pw",
            None,
        )
        .await;
    assert!(body_text(resp).await.contains("Username already taken"));
}

#[tokio::test]
async fn test_register_pre_authorization() {
    let portal = TestPortal::with_registration(true);

    let resp = portal
        .post_form(
            "/register",
            "email=stranger%40example.com&username=stranger&name=S&password=pw&password_repeat=pw",
            None,
        )
        .await;
    let html = body_text(resp).await;
    assert!(html.contains("User not pre-authorized to register"));

    let resp = portal
        .post_form(
            "/register",
            "email=invited%40example.com&username=invited&name=I&password=pw&password_repeat=pw",
            None,
        )
        .await;
    let html = body_text(resp).await;
    assert!(html.contains("User registered successfully"));

    let saved = portal.saved_config();
    assert!(saved.credentials.user("invited").is_some());
    assert!(saved.pre_authorized.unwrap().emails.is_empty());
}
