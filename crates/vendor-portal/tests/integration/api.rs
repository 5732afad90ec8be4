//! Integration tests for the JSON API and health check.

use std::sync::Arc;

use http::StatusCode;
use serde_json::json;

use vendor_sheets::MemoryStore;

use crate::common::{CONFIG, SHEET, TestPortal, body_json, sheet_with};

fn portal_over(names: &[&str]) -> (Arc<MemoryStore>, TestPortal) {
    let store = Arc::new(MemoryStore::with_sheet(SHEET, sheet_with(names)));
    let portal = TestPortal::with_store(store.clone(), CONFIG);
    (store, portal)
}

#[tokio::test]
async fn test_health() {
    let portal = TestPortal::new();
    let resp = portal.get("/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["server_name"], "vendor-portal");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_paths_are_not_found() {
    let portal = TestPortal::new();
    let cookie = portal.login().await;
    for path in ["/no-such-page", "/api/unknown"] {
        assert_eq!(portal.get(path, None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            portal.get(path, Some(&cookie)).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}

#[tokio::test]
async fn test_list_requires_session() {
    let portal = TestPortal::new();
    let resp = portal.get("/api/vendors", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["category"], "authentication");
}

#[tokio::test]
async fn test_list_vendors() {
    let (_, portal) = portal_over(&["Globex", "Initech"]);
    let cookie = portal.login().await;

    let resp = portal.get("/api/vendors", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["CompanyName"], "Globex");
    assert_eq!(rows[1]["CompanyName"], "Initech");
    assert_eq!(rows[0]["YearsInBusiness"], "7");
}

#[tokio::test]
async fn test_create_vendor() {
    let (store, portal) = portal_over(&[]);
    let cookie = portal.login().await;

    let resp = portal
        .post_json(
            "/api/vendors",
            json!({
                "company_name": "Acme",
                "business_type": "Distributor",
                "products": ["Electronics", "Software"],
                "years_in_business": 5,
                "onboarding_date": "2024-01-01"
            }),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = body_json(resp).await;
    assert_eq!(
        body,
        json!([{
            "CompanyName": "Acme",
            "BusinessType": "Distributor",
            "Products": "Electronics, Software",
            "YearsInBusiness": "5",
            "OnboardingDate": "2024-01-01",
            "AdditionalInfo": ""
        }])
    );
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn test_create_duplicate_is_unprocessable() {
    let (store, portal) = portal_over(&["Acme Corp"]);
    let cookie = portal.login().await;

    let resp = portal
        .post_json(
            "/api/vendors",
            json!({"company_name": "Acme", "business_type": "Retailer"}),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["category"], "validation");
    assert_eq!(
        body["error"]["message"],
        "A vendor with this company name already exists."
    );
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_create_missing_business_type() {
    let (_, portal) = portal_over(&[]);
    let cookie = portal.login().await;

    let payload = json!({"company_name": "Acme"});
    let resp = portal.post_json("/api/vendors", payload, Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(resp).await["error"]["message"],
        "Ensure all mandatory fields are filled."
    );
}

#[tokio::test]
async fn test_create_requires_session() {
    let (store, portal) = portal_over(&[]);
    let resp = portal
        .post_json(
            "/api/vendors",
            json!({"company_name": "Acme", "business_type": "Retailer"}),
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.write_count(), 0);
}
