//! HTTP-level tests for the Docker Hub client against a mock server.

use hubsync_client::{
    ClientConfig, ClientError, Credentials, HubClient, PageCursor, PageRequest, Permission,
    Session,
};
use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HubClient {
    HubClient::new(
        &ClientConfig::default().with_base_url(server.uri()),
        Session::new("test-token", None),
    )
    .unwrap()
}

// ==================== Authentication ====================

#[tokio::test]
async fn test_login_exchanges_credentials_for_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/users/login/"))
        .and(body_json(json!({"username": "alice", "password": "dckr_pat_1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": "jwt-1", "refresh_token": "refresh-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_base_url(server.uri());
    let client = HubClient::login(&config, &Credentials::new("alice", "dckr_pat_1"))
        .await
        .unwrap();

    assert_eq!(client.session().token().expose_secret(), "jwt-1");
    assert_eq!(
        client
            .session()
            .refresh_token()
            .map(|t| t.expose_secret().as_str()),
        Some("refresh-1")
    );
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/users/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect"})))
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_base_url(server.uri());
    let err = HubClient::login(&config, &Credentials::new("alice", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/user/"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "u1", "username": "alice", "full_name": "Alice"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = client_for(&server).current_user().await.unwrap();
    assert_eq!(user.username, "alice");
}

// ==================== Pagination ====================

#[tokio::test]
async fn test_first_page_sends_size_only_and_parses_next() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/orgs/acme/groups/"))
        .and(query_param("page_size", "2"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": format!("{}/v2/orgs/acme/groups/?page=2&page_size=2", server.uri()),
            "results": [
                {"id": 7, "name": "infra", "description": "Infrastructure"},
                {"id": 8, "name": "web"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .list_teams("acme", &PageRequest::first(2))
        .await
        .unwrap();

    assert_eq!(page.count, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, 7);
    assert_eq!(page.next.map(|c| c.page()), Some(2));
}

#[tokio::test]
async fn test_resumed_page_sends_page_param() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/repositories/acme/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "next": null,
            "results": [{"name": "web", "namespace": "acme", "description": "site"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cursor = PageCursor::new(2).unwrap();
    let page = client_for(&server)
        .list_repositories("acme", &PageRequest::resume(Some(cursor), 2))
        .await
        .unwrap();

    assert_eq!(page.items[0].full_name(), "acme/web");
    assert!(page.next.is_none());
}

#[tokio::test]
async fn test_repository_permissions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/repositories/acme/web/groups/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "next": "",
            "results": [
                {"group_name": "infra", "permission": "write"},
                {"group_id": 9, "group_name": "ops", "permission": "admin"}
            ]
        })))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .list_repository_permissions("acme", "web", &PageRequest::first(50))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].permission, Permission::Write);
    assert_eq!(page.items[1].team_id, Some(9));
    assert!(page.next.is_none());
}

#[tokio::test]
async fn test_next_link_without_page_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/orgs/acme/members/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": format!("{}/v2/orgs/acme/members/?page_size=1", server.uri()),
            "results": [{"id": "u1", "username": "alice"}]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_users("acme", &PageRequest::first(1))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidNextLink(_)));
}

// ==================== Failures ====================

#[tokio::test]
async fn test_status_errors_carry_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/orgs/acme/groups/ghosts/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_team("acme", "ghosts")
        .await
        .unwrap_err();

    match err {
        ClientError::Status {
            endpoint,
            status,
            body,
        } => {
            assert_eq!(status, 404);
            assert_eq!(endpoint, "GET /v2/orgs/acme/groups/ghosts/");
            assert_eq!(body, "not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_is_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/user/orgs/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_organizations(&PageRequest::first(1))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_redirect_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/orgs/acme/"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_organization("acme")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(304));
}

#[tokio::test]
async fn test_malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/orgs/acme/groups/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"results\": [1, 2"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_teams("acme", &PageRequest::first(10))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode { .. }));
}
