//! Sign-up, login, logout and the login gate.

use axum::http::StatusCode;
use grocer_integration_tests::TestContext;
use grocer_web::services::auth::verify_password;

async fn user_rows(ctx: &TestContext, username: &str) -> Vec<(i64, String)> {
    sqlx::query_as("SELECT id, password_hash FROM user WHERE username = ?")
        .bind(username)
        .fetch_all(&ctx.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_sign_up_stores_verifiable_hash() {
    let mut ctx = TestContext::new().await;

    let resp = ctx
        .post_form("/signup", &[("username", "alice"), ("password", "pw1")])
        .await;
    assert!(resp.redirects_to("/login"));

    let rows = user_rows(&ctx, "alice").await;
    assert_eq!(rows.len(), 1);
    let (_, hash) = &rows[0];
    assert_ne!(hash, "pw1");
    assert!(verify_password("pw1", hash).is_ok());
    assert!(verify_password("pw2", hash).is_err());

    let login = ctx.get("/login").await;
    assert!(login.body.contains("New user created!"));
}

#[tokio::test]
async fn test_duplicate_sign_up_is_rejected() {
    let mut ctx = TestContext::new().await;
    ctx.sign_up("alice", "pw1").await;

    let resp = ctx
        .post_form("/signup", &[("username", "alice"), ("password", "other")])
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Username already taken! Please choose a different one."));
    assert_eq!(user_rows(&ctx, "alice").await.len(), 1);
}

#[tokio::test]
async fn test_sign_up_validates_username_length() {
    let mut ctx = TestContext::new().await;

    let resp = ctx
        .post_form("/signup", &[("username", "al"), ("password", "pw1")])
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Field must be between 3 and 20 characters long."));
    assert!(user_rows(&ctx, "al").await.is_empty());
}

#[tokio::test]
async fn test_login_success_and_failure() {
    let mut ctx = TestContext::new().await;
    ctx.sign_up("alice", "pw1").await;

    // Viewing a page consumes the sign-up flash.
    ctx.get("/").await;
    let had_session = ctx.has_session();

    let bad = ctx
        .post_form("/login", &[("username", "alice"), ("password", "wrongpw")])
        .await;
    assert_eq!(bad.status, StatusCode::OK);
    assert!(bad.body.contains("Invalid username or password."));
    assert_eq!(ctx.has_session(), had_session);
    assert!(ctx.get("/shopping_list").await.status.is_redirection());

    let good = ctx
        .post_form("/login", &[("username", "alice"), ("password", "pw1")])
        .await;
    assert!(good.redirects_to("/"));
    assert!(ctx.has_session());

    let home = ctx.get("/").await;
    assert!(home.body.contains("Logged in as alice"));
    assert_eq!(ctx.get("/shopping_list").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_user_gets_generic_error() {
    let mut ctx = TestContext::new().await;

    let resp = ctx
        .post_form("/login", &[("username", "nobody"), ("password", "pw1")])
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Invalid username or password."));
    assert!(resp.body.contains("value=\"nobody\""));
    assert!(!ctx.has_session());
}

#[tokio::test]
async fn test_gated_routes_redirect_to_login() {
    let mut ctx = TestContext::new().await;

    for path in ["/new_store", "/new_item", "/shopping_list", "/store/1", "/item/1", "/logout"] {
        let resp = ctx.get(path).await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER, "{path}");
        let expected = format!("/login?next={}", urlencoding::encode(path));
        assert_eq!(resp.location.as_deref(), Some(expected.as_str()), "{path}");
    }

    let resp = ctx.post_form("/add_to_shopping_list/1", &[]).await;
    assert!(resp.status.is_redirection());
    assert!(resp.location.unwrap().starts_with("/login?next="));
}

#[tokio::test]
async fn test_login_follows_next() {
    let mut ctx = TestContext::new().await;
    ctx.sign_up("alice", "pw1").await;

    let gate = ctx.get("/shopping_list").await;
    let login_url = gate.location.unwrap();

    let page = ctx.get(&login_url).await;
    assert_eq!(page.status, StatusCode::OK);

    let resp = ctx
        .post_form(&login_url, &[("username", "alice"), ("password", "pw1")])
        .await;
    assert!(resp.redirects_to("/shopping_list"));
}

#[tokio::test]
async fn test_login_after_gated_add_lands_on_list() {
    let mut ctx = TestContext::new().await;
    ctx.sign_up("alice", "pw1").await;

    let gate = ctx.post_form("/add_to_shopping_list/1", &[]).await;
    let login_url = gate.location.unwrap();
    assert_eq!(login_url, "/login?next=%2Fadd_to_shopping_list%2F1");

    let resp = ctx
        .post_form(&login_url, &[("username", "alice"), ("password", "pw1")])
        .await;
    assert!(resp.redirects_to("/shopping_list"));
    assert_eq!(ctx.get("/shopping_list").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_ignores_offsite_next() {
    let mut ctx = TestContext::new().await;
    ctx.sign_up("alice", "pw1").await;

    let resp = ctx
        .post_form(
            "/login?next=%2F%2Fevil.example",
            &[("username", "alice"), ("password", "pw1")],
        )
        .await;
    assert!(resp.redirects_to("/"));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let mut ctx = TestContext::new().await;
    ctx.logged_in_as("alice").await;

    let resp = ctx.get("/logout").await;
    assert!(resp.redirects_to("/"));

    let home = ctx.get("/").await;
    assert!(!home.body.contains("Logged in as"));
    assert!(ctx.get("/new_store").await.status.is_redirection());
}
