//! Integration tests for the discovery listings

use super::*;
use integrations_adobe_analytics::errors::RequestError;
use wiremock::matchers::{header, query_param};

fn tenant_get(endpoint: &str) -> wiremock::MockBuilder {
    Mock::given(method("GET"))
        .and(path(format!("/api/{}/{}", COMPANY_ID, endpoint)))
        .and(header("x-proxy-global-company-id", COMPANY_ID))
        .and(header("x-api-key", "client-abc"))
        .and(header("authorization", "Bearer ims-access-token"))
        .and(query_param("rsid", RSID))
}

#[tokio::test]
async fn test_report_suites_default_page() {
    let mock_server = setup_mock_server().await;
    let client = connected_client(&mock_server).await;

    tenant_get("collections/suites")
        .and(query_param("limit", "10"))
        .and(query_param("page", "0"))
        .respond_with(success_response(json!({
            "content": [{ "rsid": RSID, "name": "Acme Production" }],
            "totalElements": 1,
            "lastPage": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let suites = client.discovery().report_suites(None).await.unwrap();
    assert_eq!(suites["content"][0]["rsid"], RSID);
}

#[tokio::test]
async fn test_segments_paging() {
    let mock_server = setup_mock_server().await;
    let client = connected_client(&mock_server).await;

    tenant_get("segments")
        .and(query_param("limit", "50"))
        .and(query_param("page", "3"))
        .respond_with(success_response(json!({ "content": [], "number": 3 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let segments = client
        .discovery()
        .segments(Some(ListParams::new(50, 3)))
        .await
        .unwrap();
    assert_eq!(segments["number"], 3);
}

#[tokio::test]
async fn test_dimensions_and_metrics() {
    let mock_server = setup_mock_server().await;
    let client = connected_client(&mock_server).await;

    tenant_get("dimensions")
        .and(query_param("limit", "10"))
        .respond_with(success_response(json!([{ "id": "variables/page" }])))
        .expect(1)
        .mount(&mock_server)
        .await;
    tenant_get("metrics")
        .and(query_param("limit", "25"))
        .respond_with(success_response(json!([{ "id": "metrics/visits" }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dimensions = client.discovery().dimensions(None).await.unwrap();
    assert_eq!(dimensions[0]["id"], "variables/page");

    let metrics = client
        .discovery()
        .metrics(Some(LimitParams { limit: 25 }))
        .await
        .unwrap();
    assert_eq!(metrics[0]["id"], "metrics/visits");
}

#[tokio::test]
async fn test_projects() {
    let mock_server = setup_mock_server().await;
    let client = connected_client(&mock_server).await;

    tenant_get("project")
        .and(query_param("limit", "10"))
        .and(query_param("page", "0"))
        .respond_with(success_response(json!({ "content": [{ "id": "p1" }] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let projects = client.discovery().projects(None).await.unwrap();
    assert_eq!(projects["content"][0]["id"], "p1");
}

#[tokio::test]
async fn test_listing_error_carries_status_and_body() {
    let mock_server = setup_mock_server().await;
    let client = connected_client(&mock_server).await;

    tenant_get("segments")
        .respond_with(error_response(
            429,
            json!({ "error_code": "429050", "message": "Too many requests" }),
        ))
        .mount(&mock_server)
        .await;

    let result = client.discovery().segments(None).await;
    match result {
        Err(AnalyticsError::Request(RequestError::Status { method, url, status, body })) => {
            assert_eq!(method, "GET");
            assert!(url.contains("/segments?limit=10&page=0&rsid="));
            assert_eq!(status.as_u16(), 429);
            assert!(body.contains("Too many requests"));
        }
        other => panic!("Expected request error, got {:?}", other),
    }
}
