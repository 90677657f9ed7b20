//! Authentication flows: grants feeding the API surfaces.

use std::sync::atomic::{AtomicU32, Ordering};

use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use forcekit::auth::Credentials;
use forcekit::client::ErrorKind;
use forcekit::rest::RestClient;
use forcekit::ForceClient;

use super::common;

fn password_credentials(login_url: String) -> Credentials {
    Credentials::password("key", "secret", "user@example.com", "pw", "sectoken")
        .with_login_url(login_url)
}

#[tokio::test]
async fn test_password_login_carries_token_into_rest_calls() {
    common::init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::token_body(&server.uri(), "GRANTED_TOKEN")),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Every org call after login must present the granted token.
    common::mount_discovery(&server).await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/limits"))
        .and(header("Authorization", "Bearer GRANTED_TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "DailyApiRequests": {"Max": 15000.0, "Remaining": 14998.0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ForceClient::login(password_credentials(server.uri()))
        .await
        .unwrap();
    let rest = RestClient::connect(client).await.unwrap();

    let limits = rest.limits().await.unwrap();
    assert_eq!(limits["DailyApiRequests"].remaining, 14998.0);
}

#[tokio::test]
async fn test_rejected_grant_surfaces_as_oauth_error() {
    common::init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "authentication failure"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = ForceClient::login(password_credentials(server.uri()))
        .await
        .unwrap_err();

    match err.kind {
        ErrorKind::Auth(inner) => {
            assert!(inner.is_oauth());
            assert!(inner.to_string().contains("invalid_grant"));
        }
        other => panic!("unexpected error kind: {:?}", other),
    }
}

#[tokio::test]
async fn test_expired_session_is_reestablished_mid_flow() {
    common::init_tracing();
    let server = MockServer::start().await;
    let instance = server.uri();

    // First grant issues the token that will be refused; the re-login after
    // the expiry answer issues a working one.
    let grants = AtomicU32::new(0);
    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(move |_: &wiremock::Request| {
            let n = grants.fetch_add(1, Ordering::SeqCst);
            let token = if n == 0 { "FIRST_TOKEN" } else { "SECOND_TOKEN" };
            ResponseTemplate::new(200).set_body_json(common::token_body(&instance, token))
        })
        .expect(2)
        .mount(&server)
        .await;

    common::mount_discovery(&server).await;

    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query"))
        .and(header("Authorization", "Bearer FIRST_TOKEN"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!([{
            "message": "Session expired or invalid",
            "errorCode": "INVALID_SESSION_ID"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query"))
        .and(header("Authorization", "Bearer SECOND_TOKEN"))
        .and(query_param("q", "SELECT Id FROM Account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "totalSize": 1,
            "done": true,
            "records": [{"Id": "001xx000003DGb1AAG"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ForceClient::login(password_credentials(server.uri()))
        .await
        .unwrap();
    let rest = RestClient::connect(client).await.unwrap();

    let result = rest
        .query::<serde_json::Value>("SELECT Id FROM Account")
        .await
        .unwrap();

    assert_eq!(result.total_size, 1);
    assert_eq!(rest.client().session().await.access_token(), "SECOND_TOKEN");
}
