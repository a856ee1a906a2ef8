use pizzeria_admin_core::api::endpoints::REFRESH_PATH;
use pizzeria_admin_core::api::{ApiClient, ApiError, RequestBody};
use pizzeria_admin_core::models::{ListQuery, Role};
use pizzeria_admin_core::{Session, SessionStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> (ApiClient, SessionStore) {
    let store = SessionStore::new();
    let api = ApiClient::new(server.uri(), store.clone()).expect("client should build");
    (api, store)
}

fn users_page() -> serde_json::Value {
    json!({
        "data": [{"id": 1, "firstName": "Asha", "lastName": "Rao", "email": "admin@pizza.com", "role": "admin"}],
        "total": 1,
        "currentPage": 1,
        "perPage": 6
    })
}

#[tokio::test]
async fn test_401_refreshes_once_and_retries_with_new_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/users"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "accessToken=fresh; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/users"))
        .and(header("cookie", "accessToken=fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users_page()))
        .expect(1)
        .mount(&server)
        .await;

    let (api, store) = client(&server);
    store.set_session(Session::new(1, Role::Admin));

    let page = api.list_users(&ListQuery::new()).await.expect("retry should succeed");
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].email, "admin@pizza.com");
    // A successful refresh leaves the session alone
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_retry_resends_identical_method_and_body() {
    let server = MockServer::start().await;
    let body = json!({
        "firstName": "Rakesh",
        "lastName": "K",
        "email": "manager@pizza.com",
        "password": "secret123",
        "role": "manager",
        "tenantId": 4
    });

    Mock::given(method("POST"))
        .and(path("/api/auth/users"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/users"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 12})))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _store) = client(&server);
    let response = api
        .post("/api/auth/users", RequestBody::Json(body.clone()))
        .await
        .expect("retry should succeed");
    assert_eq!(response.status().as_u16(), 201);

    let received = server.received_requests().await.expect("recording enabled");
    let user_calls: Vec<_> = received
        .iter()
        .filter(|r| r.url.path() == "/api/auth/users")
        .collect();
    assert_eq!(user_calls.len(), 2);
    assert_eq!(user_calls[0].method, user_calls[1].method);
    assert_eq!(user_calls[0].body, user_calls[1].body);
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&user_calls[1].body).unwrap(),
        body
    );

    // Refresh carries no body and sits between the two attempts
    let refresh_index = received
        .iter()
        .position(|r| r.url.path() == REFRESH_PATH)
        .unwrap();
    assert!(received[refresh_index].body.is_empty());
    assert_eq!(received[0].url.path(), "/api/auth/users");
    assert_eq!(refresh_index, 1);
}

#[tokio::test]
async fn test_second_401_after_refresh_is_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/tenants"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (api, store) = client(&server);
    store.set_session(Session::new(1, Role::Admin));

    let result = api.list_tenants(&ListQuery::new()).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_failed_refresh_clears_session_and_returns_refresh_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/catalog/categories"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("refresh token store down"))
        .expect(1)
        .mount(&server)
        .await;

    let (api, store) = client(&server);
    store.set_session(Session::new(7, Role::Manager));
    let mut rx = store.subscribe();

    let result = api.list_categories(&ListQuery::new()).await;
    match result {
        Err(ApiError::ServerError { body, .. }) => assert!(body.contains("refresh token store down")),
        other => panic!("expected the refresh error, got {:?}", other.map(|p| p.total)),
    }

    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_none());
    // Exactly one transition
    assert!(!rx.has_changed().unwrap());
    assert!(store.get_session().is_none());
}

#[tokio::test]
async fn test_other_failures_are_not_intercepted() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/auth/users/3"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/users"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"type": "field", "msg": "Email already exists!", "path": "email"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _store) = client(&server);

    let deleted = api.delete_user(3).await;
    assert!(matches!(deleted, Err(ApiError::ServerError { .. })));

    let created = api
        .post("/api/auth/users", RequestBody::Json(json!({"email": "a@b.com"})))
        .await;
    let err = created.expect_err("validation should fail");
    assert_eq!(err.user_message(), "Email already exists!");
}

#[tokio::test]
async fn test_requests_carry_json_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/tenants/2"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "Pizza Hub", "address": "Bandra, Mumbai"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _store) = client(&server);
    let tenant = api.get_tenant(2).await.expect("tenant should load");
    assert_eq!(tenant.name, "Pizza Hub");
}
