//! JSON API. Mounted behind a layer that requires an authenticated session.

use axum::Json;
use axum::extract::State;
use http::StatusCode;

use vendor_core::{FormSubmission, VendorTable};

use crate::error::Result;
use crate::state::AppState;

/// `GET /api/vendors`
pub async fn list_vendors(State(state): State<AppState>) -> Result<Json<VendorTable>> {
    Ok(Json(state.intake.load_existing().await?))
}

/// `POST /api/vendors`
pub async fn create_vendor(
    State(state): State<AppState>,
    Json(submission): Json<FormSubmission>,
) -> Result<(StatusCode, Json<VendorTable>)> {
    let table = state.intake.submit(&submission).await?;
    Ok((StatusCode::CREATED, Json(table)))
}
