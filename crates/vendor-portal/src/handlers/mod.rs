//! HTTP handlers.
//!
//! Page handlers answer with HTML and re-render the page with a notice on
//! user errors. Only store, config and template faults end in the error page.

pub mod api;
pub mod gate;
pub mod vendors;

use axum::response::{Html, IntoResponse, Response};
use chrono::NaiveDate;
use http::StatusCode;
use serde::Serialize;

use vendor_auth::Session;

use crate::error::PortalError;
use crate::pages::{FormValues, LoginView, Notice, PortalView};
use crate::state::AppState;

/// Liveness check body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers
    pub status: &'static str,
    /// Server name
    pub server_name: &'static str,
    /// Server version
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "ok",
        server_name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Render the login page.
pub(crate) fn login_page(state: &AppState, status: StatusCode, notice: Option<Notice>) -> Response {
    let view = LoginView {
        notice,
        registration_enabled: state.authenticator.registration().enabled,
    };
    match state.pages.login(&view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => error_page(state, e.into()),
    }
}

/// Notices and form values for one render of the vendor page.
#[derive(Debug, Default)]
pub(crate) struct PortalRender {
    pub notice: Option<Notice>,
    pub reset_notice: Option<Notice>,
    pub form: Option<FormValues>,
}

/// Render the vendor page for an authenticated session.
///
/// Loads the vendor table; a store failure replaces the page with the error
/// page.
pub(crate) async fn portal_page(
    state: &AppState,
    session: &Session,
    render: PortalRender,
) -> Response {
    let table = match state.intake.load_existing().await {
        Ok(table) => table,
        Err(e) => return error_page(state, e),
    };

    let view = PortalView {
        name: session.name.clone().unwrap_or_default(),
        notice: render.notice,
        reset_notice: render.reset_notice,
        vendor_count: table.len(),
        form: render.form.unwrap_or_else(|| FormValues::blank(today())),
    };
    match state.pages.portal(&view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_page(state, e.into()),
    }
}

/// Render the error page for `err`.
pub(crate) fn error_page(state: &AppState, err: PortalError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(error = %err, "Page failed");
    } else {
        tracing::debug!(error = %err, "Page rejected request");
    }
    match state.pages.error(&err.to_string()) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error page failed to render");
            let body = err.to_string();
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}
