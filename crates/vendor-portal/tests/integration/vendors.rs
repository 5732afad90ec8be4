//! Integration tests for the vendor form.

use std::sync::Arc;

use http::StatusCode;

use vendor_core::VendorTable;
use vendor_sheets::{MemoryStore, TableStore};

use crate::common::{
    CONFIG, SHEET, TestPortal, UnavailableStore, acme_form, body_text, sheet_with,
};

const MANDATORY: &str = "Ensure all mandatory fields are filled.";

fn portal_over(names: &[&str]) -> (Arc<MemoryStore>, TestPortal) {
    let store = Arc::new(MemoryStore::with_sheet(SHEET, sheet_with(names)));
    let portal = TestPortal::with_store(store.clone(), CONFIG);
    (store, portal)
}

async fn stored(store: &MemoryStore) -> VendorTable {
    VendorTable::from_grid(&store.read(SHEET).await.unwrap())
}

#[tokio::test]
async fn test_portal_page_shows_form() {
    let (_, portal) = portal_over(&["Globex"]);
    let cookie = portal.login().await;

    let html = body_text(portal.get("/", Some(&cookie)).await).await;
    assert!(html.contains("<h1>Vendor Management Portal</h1>"));
    assert!(html.contains("Company Name*"));
    assert!(html.contains("Business Type*"));
    assert!(html.contains("Products Offered"));
    assert!(html.contains("Years in Business"));
    assert!(html.contains("Submit Vendor Details"));
    assert!(html.contains("Vendors on file: 1"));
}

#[tokio::test]
async fn test_submit_new_vendor() {
    let store = Arc::new(MemoryStore::new());
    let portal = TestPortal::with_store(store.clone(), CONFIG);
    let cookie = portal.login().await;

    let resp = portal
        .post_form("/vendors", &acme_form("Acme"), Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Vendor details successfully submitted!"));
    assert!(html.contains("Vendors on file: 1"));

    let table = stored(&store).await;
    assert_eq!(table.len(), 1);
    let row = &table.rows()[0];
    assert_eq!(row.company_name, "Acme");
    assert_eq!(row.business_type, "Distributor");
    assert_eq!(row.products, "Electronics, Software");
    assert_eq!(row.years_in_business, "5");
    assert_eq!(row.onboarding_date, "2024-01-01");
    assert_eq!(row.additional_info, "");
}

#[tokio::test]
async fn test_submit_appends_last() {
    let (store, portal) = portal_over(&["Globex", "Initech"]);
    let cookie = portal.login().await;

    portal
        .post_form("/vendors", &acme_form("Umbrella"), Some(&cookie))
        .await;

    let table = stored(&store).await;
    let names: Vec<_> = table.iter().map(|r| r.company_name.as_str()).collect();
    assert_eq!(names, vec!["Globex", "Initech", "Umbrella"]);
}

#[tokio::test]
async fn test_duplicate_substring_rejected() {
    let (store, portal) = portal_over(&["Acme Corp"]);
    let cookie = portal.login().await;

    let resp = portal
        .post_form("/vendors", &acme_form("Acme"), Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    let warning = "A vendor with this company name already exists.";
    assert!(html.contains(warning));
    assert!(html.contains("class=\"notice warning\""));
    // Entered values survive the warning.
    assert!(html.contains("value=\"Acme\""));

    assert_eq!(store.write_count(), 0);
    assert_eq!(stored(&store).await.len(), 1);
}

#[tokio::test]
async fn test_duplicate_check_is_case_sensitive() {
    let (store, portal) = portal_over(&["Acme Corp"]);
    let cookie = portal.login().await;

    let html = body_text(
        portal
            .post_form("/vendors", &acme_form("acme"), Some(&cookie))
            .await,
    )
    .await;
    assert!(html.contains("Vendor details successfully submitted!"));
    assert_eq!(stored(&store).await.len(), 2);
}

#[tokio::test]
async fn test_missing_required_fields() {
    let (store, portal) = portal_over(&[]);
    let cookie = portal.login().await;

    let resp = portal
        .post_form(
            "/vendors",
            "company_name=&business_type=Retailer&submit=1",
            Some(&cookie),
        )
        .await;
    assert!(body_text(resp).await.contains(MANDATORY));

    let resp = portal
        .post_form(
            "/vendors",
            "company_name=Acme&business_type=&submit=1",
            Some(&cookie),
        )
        .await;
    assert!(body_text(resp).await.contains(MANDATORY));

    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_post_without_submit_button_is_noop() {
    let (store, portal) = portal_over(&[]);
    let cookie = portal.login().await;

    let resp = portal
        .post_form(
            "/vendors",
            "company_name=Acme&business_type=Retailer",
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(!html.contains("role=\"alert\""));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_out_of_range_years_warns() {
    let (store, portal) = portal_over(&[]);
    let cookie = portal.login().await;

    let resp = portal
        .post_form(
            "/vendors",
            "company_name=Acme&business_type=Retailer&years_in_business=99&submit=1",
            Some(&cookie),
        )
        .await;
    let html = body_text(resp).await;
    assert!(html.contains("Invalid value for years_in_business"));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_unknown_product_warns() {
    let (store, portal) = portal_over(&[]);
    let cookie = portal.login().await;

    let resp = portal
        .post_form(
            "/vendors",
            "company_name=Acme&business_type=Retailer&products=Widgets&submit=1",
            Some(&cookie),
        )
        .await;
    assert!(body_text(resp).await.contains("Invalid value for products"));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_submit_requires_session() {
    let (store, portal) = portal_over(&[]);
    let resp = portal.post_form("/vendors", &acme_form("Acme"), None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_store_failure_is_error_page() {
    let portal = TestPortal::with_store(Arc::new(UnavailableStore), CONFIG);
    let cookie = portal.login().await;

    let resp = portal.get("/", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(resp).await;
    assert!(html.contains("Store returned HTTP 503"));

    let resp = portal
        .post_form("/vendors", &acme_form("Acme"), Some(&cookie))
        .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
