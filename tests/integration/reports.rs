//! Integration tests for report requests

use super::*;
use chrono::NaiveDate;
use integrations_adobe_analytics::errors::ValidationError;
use wiremock::matchers::{body_partial_json, header, query_param};

fn report_response() -> Value {
    json!({
        "totalPages": 1,
        "firstPage": true,
        "lastPage": true,
        "numberOfElements": 2,
        "columns": {
            "dimension": { "id": "variables/page", "type": "string" },
            "columnIds": ["0", "1"]
        },
        "rows": [
            { "itemId": "101", "value": "home", "data": [120.0, 15.5] },
            { "itemId": "102", "value": "checkout", "data": [30.0, null] }
        ],
        "summaryData": { "totals": [150.0, 15.5] }
    })
}

fn reports_mock() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path(format!("/api/{}/reports", COMPANY_ID)))
        .and(query_param("rsid", RSID))
        .and(header("x-proxy-global-company-id", COMPANY_ID))
        .and(header("content-type", "application/json"))
}

fn january(client: &mut AnalyticsClient) -> String {
    client
        .set_date_range(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        )
        .expect("valid range")
}

#[tokio::test]
async fn test_get_report_posts_built_query() {
    let mock_server = setup_mock_server().await;
    let mut client = connected_client(&mock_server).await;
    let range = january(&mut client);
    assert_eq!(range, "2024-01-01T00:00:00.000/2024-01-31T00:00:00.000");

    reports_mock()
        .and(body_partial_json(json!({
            "rsid": RSID,
            "dimension": "variables/page",
            "globalFilters": [{ "type": "dateRange", "dateRange": range, "segmentId": "s300_abc" }],
            "metricContainer": {
                "metrics": [
                    { "columnId": 0, "id": "metrics/visits" },
                    { "columnId": 1, "id": "metrics/event5" }
                ]
            },
            "settings": { "dimensionSort": "asc", "limit": 50000 }
        })))
        .respond_with(success_response(report_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = client
        .reports()
        .get_report(
            &["metrics/visits", "metrics/event5"],
            "variables/page",
            Some("s300_abc"),
        )
        .await
        .unwrap();

    assert_eq!(report["rows"][0]["value"], "home");
}

#[tokio::test]
async fn test_get_report_table() {
    let mock_server = setup_mock_server().await;
    let mut client = connected_client(&mock_server).await;
    january(&mut client);

    reports_mock()
        .respond_with(success_response(report_response()))
        .mount(&mock_server)
        .await;

    let table = client
        .reports()
        .get_report_table(&["metrics/visits", "cm300_revenue"], "variables/page", None)
        .await
        .unwrap();

    assert_eq!(
        table.columns,
        vec!["variables/page", "visits", "1-cm300_revenue"]
    );
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[1].value, "checkout");
    assert_eq!(table.metric_column("1-cm300_revenue"), Some(vec![Some(15.5), None]));
}

#[tokio::test]
async fn test_report_without_date_range_sends_nothing() {
    let mock_server = setup_mock_server().await;
    let client = connected_client(&mock_server).await;

    reports_mock()
        .respond_with(success_response(report_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = client
        .reports()
        .get_report(&["metrics/visits"], "variables/page", None)
        .await;

    assert!(matches!(
        result,
        Err(AnalyticsError::Validation(ValidationError::MissingDateRange))
    ));
}

#[tokio::test]
async fn test_default_date_range_is_one_week() {
    let mock_server = setup_mock_server().await;
    let mut client = connected_client(&mock_server).await;

    client.set_date_range(None, None).unwrap();

    let range = client.session().date_range().copied().unwrap();
    assert_eq!(range.end() - range.start(), chrono::Duration::days(7));
}

#[tokio::test]
async fn test_from_workspace_file() {
    let mock_server = setup_mock_server().await;
    let client = connected_client(&mock_server).await;

    let workspace = json!({
        "rsid": RSID,
        "globalFilters": [{
            "type": "dateRange",
            "dateRange": "2024-03-01T00:00:00.000/2024-04-01T00:00:00.000"
        }],
        "metricContainer": {
            "metrics": [{ "columnId": "0", "id": "metrics/pageviews", "sort": "desc" }]
        },
        "dimension": "variables/daterangeday",
        "settings": { "countRepeatInstances": true, "limit": 400, "page": 0 },
        "statistics": { "functions": ["col-max", "col-min"] }
    });

    let file = std::env::temp_dir().join(format!(
        "adobe-analytics-workspace-{}.json",
        std::process::id()
    ));
    std::fs::write(&file, serde_json::to_vec_pretty(&workspace).unwrap()).unwrap();

    reports_mock()
        .and(body_partial_json(json!({
            "metricContainer": { "metrics": [{ "columnId": "0", "sort": "desc" }] },
            "settings": { "countRepeatInstances": true, "limit": 400 },
            "statistics": { "functions": ["col-max", "col-min"] }
        })))
        .respond_with(success_response(report_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client.reports().from_workspace(file.as_path()).await;
    let _ = std::fs::remove_file(&file);

    assert_eq!(result.unwrap()["totalPages"], 1);
}

#[tokio::test]
async fn test_from_workspace_malformed() {
    let mock_server = setup_mock_server().await;
    let client = connected_client(&mock_server).await;

    let result = ReportQuery::from_json("{ not json");
    assert!(matches!(result, Err(ValidationError::MalformedWorkspace(_))));

    let missing = std::env::temp_dir().join("adobe-analytics-no-such-workspace.json");
    let result = client.reports().from_workspace(missing).await;
    assert!(matches!(
        result,
        Err(AnalyticsError::Validation(ValidationError::MalformedWorkspace(_)))
    ));
}

#[tokio::test]
async fn test_report_server_error() {
    let mock_server = setup_mock_server().await;
    let mut client = connected_client(&mock_server).await;
    january(&mut client);

    reports_mock()
        .respond_with(error_response(
            400,
            json!({ "errorCode": "invalid_dimension", "errorDescription": "bad dimension" }),
        ))
        .mount(&mock_server)
        .await;

    let err = client
        .reports()
        .get_report(&["metrics/visits"], "variables/nope", None)
        .await
        .unwrap_err();

    assert_eq!(err.status_code().map(|s| s.as_u16()), Some(400));
    assert!(err.to_string().contains("bad dimension"));
}
