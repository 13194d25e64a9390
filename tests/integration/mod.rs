//! Integration tests using WireMock
//!
//! A single mock server stands in for both the IMS host and the Analytics
//! API root, so every test drives the real JWT exchange, tenant resolution
//! and request path over HTTP.

pub mod discovery;
pub mod reports;
pub mod session;

use integrations_adobe_analytics::prelude::*;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PRIVATE_KEY: &str = include_str!("../fixtures/test_private_key.pem");
pub const COMPANY_ID: &str = "acme1";
pub const RSID: &str = "acme.prod";
pub const ACCESS_TOKEN: &str = "ims-access-token";

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Credentials signed with the fixture key.
pub fn test_credentials() -> Credentials {
    Credentials::new(
        "ORG123@AdobeOrg",
        "TECH456@techacct.adobe.com",
        "client-abc",
        "client-secret",
        PRIVATE_KEY,
    )
}

/// Configuration pointing both hosts at the mock server.
pub fn test_config(server: &MockServer) -> AnalyticsConfig {
    AnalyticsConfig::builder()
        .credentials(test_credentials())
        .rsid(RSID)
        .ims_url(server.uri())
        .api_root(server.uri())
        .build()
        .expect("valid test configuration")
}

pub fn discovery_body(company_id: &str) -> Value {
    json!({
        "imsUserId": "TECH456@techacct.adobe.com",
        "imsOrgs": [{
            "imsOrgId": "ORG123@AdobeOrg",
            "companies": [{
                "globalCompanyId": company_id,
                "companyName": "Acme Corp",
                "apiRateLimitPolicy": "aa_api_tier10_tp"
            }]
        }]
    })
}

/// Mounts a successful JWT exchange.
pub async fn mount_exchange(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/ims/exchange/jwt"))
        .and(body_string_contains("jwt_token="))
        .respond_with(success_response(json!({
            "token_type": "bearer",
            "access_token": token,
            "expires_in": 86399999
        })))
        .mount(server)
        .await;
}

/// Mounts the tenant discovery endpoint.
pub async fn mount_discovery(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/discovery/me"))
        .respond_with(success_response(body))
        .mount(server)
        .await;
}

/// Connects a client with the exchange and discovery mounted.
pub async fn connected_client(server: &MockServer) -> AnalyticsClient {
    mount_exchange(server, ACCESS_TOKEN).await;
    mount_discovery(server, discovery_body(COMPANY_ID)).await;

    AnalyticsClient::connect(test_config(server))
        .await
        .expect("Failed to connect client")
}

/// Helper to create error response templates
pub fn error_response(status: u16, error_body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(error_body)
}

/// Helper to create success response templates
pub fn success_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}
