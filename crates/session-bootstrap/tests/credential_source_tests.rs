//! HTTP credential source tests against a mocked token endpoint.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use common::secret::ExposeSecret;
use session_bootstrap::{BootstrapError, CredentialSource, HttpCredentialSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_returns_jwt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/meetings/token/standup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jwt": "header.payload.signature"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpCredentialSource::new(&server.uri()).unwrap();
    let jwt = source.fetch("standup").await.unwrap();

    assert_eq!(jwt.expose_secret(), "header.payload.signature");
}

#[tokio::test]
async fn test_fetch_encodes_room_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/meetings/token/team%20sync!"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"jwt": "a.b.c"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpCredentialSource::new(&server.uri()).unwrap();

    assert_eq!(source.fetch("team sync!").await.unwrap().expose_secret(), "a.b.c");
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "Missing required Jitsi environment variables: JITSI_APP_ID",
            "code": "CONFIGURATION_ERROR"
        })))
        .mount(&server)
        .await;

    let source = HttpCredentialSource::new(&server.uri()).unwrap();
    let err = source.fetch("standup").await.unwrap_err();

    assert!(matches!(err, BootstrapError::Network(msg) if msg.contains("500")));
}

#[tokio::test]
async fn test_unparsable_body_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let source = HttpCredentialSource::new(&server.uri()).unwrap();

    assert!(matches!(
        source.fetch("standup").await,
        Err(BootstrapError::Network(_))
    ));
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    // Bind then drop to get a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpCredentialSource::new(&format!("http://{addr}")).unwrap();

    assert!(matches!(
        source.fetch("standup").await,
        Err(BootstrapError::Network(_))
    ));
}
