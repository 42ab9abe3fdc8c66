
use reqwest::StatusCode;
use showcase_backend::entities::user::Role;
use test_utils::{register_request, TestApp};

#[actix_rt::test]
async fn register_twice_with_same_email_conflicts() {
    let app = TestApp::spawn().await;
    let request = register_request("Ada Lovelace", "ada@example.com");

    let first = app.register_user(&request).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let original = app.stored_user("ada@example.com").await.unwrap();

    let second = app.register_user(&request).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = second.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("already registered"));

    // The existing record is untouched
    let after = app.stored_user("ada@example.com").await.unwrap();
    assert_eq!(after.id, original.id);
    assert_eq!(after.password_hash, original.password_hash);
    assert_eq!(after.created_at, original.created_at);
}

#[actix_rt::test]
async fn register_stores_no_plaintext_password() {
    let app = TestApp::spawn().await;
    let request = register_request("Ada Lovelace", "ada@example.com");

    app.register_user(&request).await;

    let stored = app.stored_user("ada@example.com").await.unwrap();
    assert_ne!(stored.password_hash, request.password);
    assert!(stored.password_hash.starts_with("$argon2"));
    assert_eq!(stored.name, "Ada Lovelace");
    assert_eq!(stored.fullname, "Ada Lovelace");
    assert_eq!(stored.role, Role::User);
}

#[actix_rt::test]
async fn login_sets_cookie_and_status_round_trips() {
    let app = TestApp::spawn().await;
    app.register_user(&register_request("Grace Hopper", "grace@example.com"))
        .await;

    let response = app.login("grace@example.com", "k3P!xqTav9&wz").await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("login must set a cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("sessionId="));
    assert!(set_cookie.contains("HttpOnly"));

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["fullname"], "Grace Hopper");
    assert_eq!(body["user"]["email"], "grace@example.com");
    assert_eq!(body["user"]["role"], "user");

    // The cookie store carries the session to the status probe
    let status = app.status().await;
    assert_eq!(status.status(), StatusCode::OK);
    let body: serde_json::Value = status.json().await.unwrap();
    assert_eq!(body["user"]["fullname"], "Grace Hopper");
    assert_eq!(body["user"]["email"], "grace@example.com");
    assert_eq!(body["user"]["role"], "user");
}

#[actix_rt::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    app.register_user(&register_request("Grace Hopper", "grace@example.com"))
        .await;

    let response = app.login("grace@example.com", "Wr0ng!password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // No session was opened for the cookie jar
    assert_eq!(app.status().await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn login_with_unknown_email_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app.login("nobody@example.com", "k3P!xqTav9&wz").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn status_without_cookie_is_unauthorized() {
    let app = TestApp::spawn().await;
    assert_eq!(app.status().await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn status_with_unknown_cookie_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/auth/status", app.address))
        .header("Cookie", "sessionId=abcdef0123456789abcdef0123456789")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn logout_invalidates_session_and_is_idempotent() {
    let app = TestApp::spawn().await;
    app.register_user(&register_request("Grace Hopper", "grace@example.com"))
        .await;
    app.login("grace@example.com", "k3P!xqTav9&wz").await;
    assert_eq!(app.status().await.status(), StatusCode::OK);

    let first = app.logout().await;
    assert_eq!(first.status(), StatusCode::OK);

    assert_eq!(app.status().await.status(), StatusCode::UNAUTHORIZED);

    let second = app.logout().await;
    assert_eq!(second.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn stale_cookie_after_logout_is_rejected() {
    let app = TestApp::spawn().await;
    app.register_user(&register_request("Grace Hopper", "grace@example.com"))
        .await;

    let login = app.login("grace@example.com", "k3P!xqTav9&wz").await;
    let cookie = login
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    app.logout().await;

    // Replay the captured cookie directly
    let response = app
        .client
        .get(format!("{}/auth/status", app.address))
        .header("Cookie", cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn admin_health_requires_an_admin_session() {
    let app = TestApp::spawn().await;
    app.insert_user("Site Admin", "admin@example.com", "Adm1n!pass#x", Role::Admin)
        .await;
    app.register_user(&register_request("Plain User", "plain@example.com"))
        .await;

    let health_url = format!("{}/admin/health", app.address);

    // Anonymous
    let response = app.client.get(&health_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Authenticated non-admin
    app.login("plain@example.com", "k3P!xqTav9&wz").await;
    let response = app.client.get(&health_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    app.logout().await;

    // Admin
    app.login("admin@example.com", "Adm1n!pass#x").await;
    let response = app.client.get(&health_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[actix_rt::test]
async fn register_rejects_weak_password_with_details() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/auth/register", app.address))
        .json(&serde_json::json!({
            "fullname": "Weak User",
            "email": "weak@example.com",
            "password": "password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.stored_user("weak@example.com").await.is_none());
}
