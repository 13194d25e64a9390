//! Integration tests for authentication and tenant resolution

use super::*;
use integrations_adobe_analytics::errors::{AuthenticationError, DiscoveryError};
use integrations_adobe_analytics::client::TENANT_HEADER;
use reqwest::StatusCode;
use wiremock::matchers::{header, query_param};

#[tokio::test]
async fn test_connect_resolves_tenant() {
    let mock_server = setup_mock_server().await;

    mount_exchange(&mock_server, ACCESS_TOKEN).await;
    Mock::given(method("GET"))
        .and(path("/discovery/me"))
        .and(header("authorization", "Bearer ims-access-token"))
        .and(header("x-api-key", "client-abc"))
        .and(query_param("rsid", RSID))
        .respond_with(success_response(discovery_body(COMPANY_ID)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AnalyticsClient::connect(test_config(&mock_server))
        .await
        .expect("Failed to connect client");

    let session = client.session();
    assert_eq!(session.global_company_id(), COMPANY_ID);
    assert_eq!(session.rsid(), RSID);
    assert_eq!(session.access_token().secret(), ACCESS_TOKEN);
    assert_eq!(
        session.base_reporting_url().as_str(),
        format!("{}/api/{}/", mock_server.uri(), COMPANY_ID)
    );
    assert!(session.date_range().is_none());

    let requests = mock_server.received_requests().await.unwrap();
    let discovery = requests
        .iter()
        .find(|r| r.url.path() == "/discovery/me")
        .unwrap();
    assert!(discovery.headers.get(TENANT_HEADER).is_none());
}

#[tokio::test]
async fn test_exchange_sends_form_credentials() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/ims/exchange/jwt"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("client_id=client-abc"))
        .and(body_string_contains("client_secret=client-secret"))
        .and(body_string_contains("jwt_token="))
        .respond_with(success_response(json!({ "access_token": ACCESS_TOKEN })))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_discovery(&mock_server, discovery_body(COMPANY_ID)).await;

    let result = AnalyticsClient::connect(test_config(&mock_server)).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_exchange_rejected() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/ims/exchange/jwt"))
        .respond_with(error_response(
            401,
            json!({ "error": "invalid_client", "error_description": "invalid client_secret" }),
        ))
        .mount(&mock_server)
        .await;

    let result = AnalyticsClient::connect(test_config(&mock_server)).await;

    match result {
        Err(AnalyticsError::Authentication(AuthenticationError::ExchangeFailed { status, body })) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(body.contains("invalid_client"));
        }
        Err(other) => panic!("Expected exchange failure, got {:?}", other),
        Ok(_) => panic!("Expected exchange failure"),
    }
}

#[tokio::test]
async fn test_discovery_without_companies() {
    let mock_server = setup_mock_server().await;

    mount_exchange(&mock_server, ACCESS_TOKEN).await;
    mount_discovery(
        &mock_server,
        json!({ "imsOrgs": [{ "imsOrgId": "ORG123@AdobeOrg", "companies": [] }] }),
    )
    .await;

    let result = AnalyticsClient::connect(test_config(&mock_server)).await;
    assert!(matches!(
        result,
        Err(AnalyticsError::Discovery(DiscoveryError::NoCompanies { .. }))
    ));
}

#[tokio::test]
async fn test_discovery_without_orgs() {
    let mock_server = setup_mock_server().await;

    mount_exchange(&mock_server, ACCESS_TOKEN).await;
    mount_discovery(&mock_server, json!({ "imsOrgs": [] })).await;

    let result = AnalyticsClient::connect(test_config(&mock_server)).await;
    assert!(matches!(
        result,
        Err(AnalyticsError::Discovery(DiscoveryError::NoOrganizations))
    ));
}

#[tokio::test]
async fn test_discovery_rejected() {
    let mock_server = setup_mock_server().await;

    mount_exchange(&mock_server, ACCESS_TOKEN).await;
    Mock::given(method("GET"))
        .and(path("/discovery/me"))
        .respond_with(error_response(403, json!({ "error_code": "403025" })))
        .mount(&mock_server)
        .await;

    let result = AnalyticsClient::connect(test_config(&mock_server)).await;
    let err = result.err().expect("discovery should fail");
    assert_eq!(err.status_code(), Some(StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn test_refresh_token_keeps_tenant() {
    let mock_server = setup_mock_server().await;
    let mut client = connected_client(&mock_server).await;

    client.refresh_token().await.expect("refresh should succeed");

    assert_eq!(client.session().global_company_id(), COMPANY_ID);
    assert!(client.session().token_age() < chrono::Duration::minutes(1));

    let exchanges = mock_server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/ims/exchange/jwt")
        .count();
    assert_eq!(exchanges, 2);
}

#[tokio::test]
async fn test_builder_connects() {
    let mock_server = setup_mock_server().await;
    mount_exchange(&mock_server, ACCESS_TOKEN).await;
    mount_discovery(&mock_server, discovery_body(COMPANY_ID)).await;

    let client = AnalyticsClient::builder()
        .credentials(test_credentials())
        .rsid(RSID)
        .ims_url(mock_server.uri())
        .api_root(mock_server.uri())
        .timeout(std::time::Duration::from_secs(5))
        .connect()
        .await
        .expect("Failed to connect client");

    assert_eq!(client.session().global_company_id(), COMPANY_ID);
    assert_eq!(client.config().timeout, Some(std::time::Duration::from_secs(5)));
}
