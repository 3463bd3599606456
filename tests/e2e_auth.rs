//! E2E tests for admin login and session handling

mod common;

use common::{TEST_ADMIN_EMAIL, TestServer, extract_session_cookie};

#[tokio::test]
async fn test_whoami_without_cookie_is_anonymous_not_error() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/admin/session"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["authenticated"], false);
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/admin/login"))
        .json(&serde_json::json!({
            "email": TEST_ADMIN_EMAIL,
            "password": "wrong-password",
        }))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 401);
    assert!(response.headers().get("set-cookie").is_none());
}

#[tokio::test]
async fn test_login_rejects_unknown_email() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/admin/login"))
        .json(&serde_json::json!({
            "email": "stranger@test.example.com",
            "password": common::TEST_ADMIN_PASSWORD,
        }))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_login_sets_httponly_session_cookie() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/admin/login"))
        .json(&serde_json::json!({
            "email": TEST_ADMIN_EMAIL,
            "password": common::TEST_ADMIN_PASSWORD,
        }))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie header");
    assert!(extract_session_cookie(set_cookie).is_some());
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age="));

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["email"], TEST_ADMIN_EMAIL);
}

#[tokio::test]
async fn test_whoami_with_valid_cookie_returns_identity() {
    let server = TestServer::new().await;
    let cookie = server.login().await;

    let response = server
        .client
        .get(server.url("/admin/session"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["id"], "admin");
    assert_eq!(body["user"]["email"], TEST_ADMIN_EMAIL);
}

#[tokio::test]
async fn test_issued_token_round_trips_through_cookie() {
    let server = TestServer::new().await;

    // Token issued directly by the codec behaves identically to one
    // set by the login flow.
    let user = brickworks::auth::SessionUser {
        id: "u1".to_string(),
        email: "a@b.com".to_string(),
    };
    let token = brickworks::auth::issue_session_token(
        &user,
        &server.state.config.auth.session_secret,
        server.state.config.auth.session_max_age,
    )
    .expect("token issues");

    let response = server
        .client
        .get(server.url("/admin/session"))
        .header("Cookie", TestServer::session_cookie(&token))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["user"]["id"], "u1");
    assert_eq!(body["user"]["email"], "a@b.com");
}

#[tokio::test]
async fn test_protected_route_without_cookie_is_401() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/admin/api/projects"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_protected_route_with_garbage_cookie_is_401() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/admin/api/projects"))
        .header("Cookie", "session=not-a-token")
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_protected_route_with_valid_cookie_succeeds() {
    let server = TestServer::new().await;
    let cookie = server.login().await;

    let response = server
        .client
        .get(server.url("/admin/api/projects"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_logout_removes_session_cookie() {
    let server = TestServer::new().await;
    let cookie = server.login().await;

    let response = server
        .client
        .post(server.url("/admin/logout"))
        .header("Cookie", &cookie)
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie header");
    assert!(set_cookie.starts_with("session="));
    assert!(
        set_cookie.contains("Max-Age=0") || set_cookie.contains("Expires="),
        "expected cookie removal attributes, got: {set_cookie}"
    );
}
