use std::time::Duration;

use pizzeria_admin_core::api::endpoints::{LOGIN_PATH, LOGOUT_PATH, REFRESH_PATH, SELF_PATH};
use pizzeria_admin_core::api::{ApiClient, ApiError};
use pizzeria_admin_core::auth::{BootstrapGuard, BootstrapState, Route, RouteAccess};
use pizzeria_admin_core::models::{LoginCredentials, Role};
use pizzeria_admin_core::{Session, SessionStore};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> (ApiClient, SessionStore) {
    let store = SessionStore::new();
    let api = ApiClient::new(server.uri(), store.clone()).expect("client should build");
    (api, store)
}

#[tokio::test]
async fn test_bootstrap_with_active_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SELF_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "role": "admin"})))
        .expect(1)
        .mount(&server)
        .await;

    let (api, store) = client(&server);
    let mut guard = BootstrapGuard::new(store.clone());
    assert_eq!(guard.access(Route::Home), RouteAccess::Pending);

    let session = guard.run(&api).await.expect("bootstrap should succeed");
    assert_eq!(session, Some(Session::new(1, Role::Admin)));
    assert_eq!(store.get_session(), Some(Session::new(1, Role::Admin)));
    assert_eq!(guard.state(), &BootstrapState::Resolved);
    assert_eq!(guard.access(Route::Users), RouteAccess::Allow);
    assert_eq!(guard.access(Route::Login), RouteAccess::RedirectToHome);
}

#[tokio::test]
async fn test_bootstrap_without_session_allows_public_routes_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SELF_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let (api, store) = client(&server);
    let mut guard = BootstrapGuard::new(store.clone());

    let session = guard.run(&api).await.expect("401 is not a load error");
    assert!(session.is_none());
    assert!(store.get_session().is_none());
    assert_eq!(guard.access(Route::Login), RouteAccess::Allow);
    assert_eq!(guard.access(Route::Home), RouteAccess::RedirectToLogin);
    assert_eq!(guard.access(Route::Products), RouteAccess::RedirectToLogin);
}

#[tokio::test]
async fn test_bootstrap_server_failure_is_a_load_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SELF_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let (api, store) = client(&server);
    let mut guard =
        BootstrapGuard::new(store.clone()).with_retry_policy(4, Duration::from_millis(1));

    let result = guard.run(&api).await;
    assert!(matches!(result, Err(ApiError::ServerError { status: 503, .. })));
    assert!(matches!(guard.state(), BootstrapState::Failed(_)));
    assert!(matches!(guard.access(Route::Home), RouteAccess::LoadError(_)));
    // Not treated as logged out
    assert!(matches!(guard.access(Route::Login), RouteAccess::LoadError(_)));
    assert!(store.get_session().is_none());
}

#[tokio::test]
async fn test_bootstrap_recovers_after_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SELF_PATH))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SELF_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2, "role": "manager"})))
        .expect(1)
        .mount(&server)
        .await;

    let (api, store) = client(&server);
    let mut guard =
        BootstrapGuard::new(store.clone()).with_retry_policy(3, Duration::from_millis(1));

    guard.run(&api).await.expect("second attempt should succeed");
    assert_eq!(store.get_session().map(|s| s.role), Some(Role::Manager));
    assert_eq!(guard.access(Route::Users), RouteAccess::Forbidden);
}

#[tokio::test]
async fn test_login_stores_session_and_logout_clears_it() {
    let server = MockServer::start().await;
    let profile = json!({
        "id": 1,
        "firstName": "Asha",
        "lastName": "Rao",
        "email": "a@b.com",
        "role": "admin"
    });

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_json(json!({"email": "a@b.com", "password": "Admin1@pizzeria"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SELF_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (api, store) = client(&server);
    let session = api
        .login(&LoginCredentials::new("a@b.com", "Admin1@pizzeria"))
        .await
        .expect("login should succeed");

    let expected: Session = serde_json::from_value(profile).unwrap();
    assert_eq!(session, expected);
    assert_eq!(store.get_session(), Some(expected));

    api.logout().await.expect("logout should succeed");
    assert!(store.get_session().is_none());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_already_expired() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let (api, store) = client(&server);
    store.set_session(Session::new(3, Role::Customer));

    api.logout().await.expect("expired session still logs out");
    assert!(store.get_session().is_none());
}

#[tokio::test]
async fn test_failed_login_leaves_store_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"msg": "Email or password does not match."}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, store) = client(&server);
    let err = api
        .login(&LoginCredentials::new("a@b.com", "wrong"))
        .await
        .expect_err("login should fail");
    assert_eq!(err.user_message(), "Email or password does not match.");
    assert!(store.get_session().is_none());
}
