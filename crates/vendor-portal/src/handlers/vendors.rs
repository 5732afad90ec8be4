//! The vendor form.

use axum::extract::{Extension, Form, State};
use axum::response::{IntoResponse, Redirect, Response};

use vendor_auth::Session;
use vendor_core::decode_form;

use super::{PortalRender, error_page, portal_page, today};
use crate::error::PortalError;
use crate::intake::SUBMITTED;
use crate::pages::{FormValues, Notice};
use crate::state::AppState;

/// `POST /vendors`
///
/// Posted as ordered pairs because the products multi-select repeats its key.
pub async fn submit(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    if !session.is_authenticated() {
        return Redirect::to("/").into_response();
    }

    let submission = match decode_form(&pairs, today()) {
        Ok(Some(submission)) => submission,
        Ok(None) => return portal_page(&state, &session, PortalRender::default()).await,
        Err(e) => {
            let render = PortalRender {
                notice: Some(Notice::warning(e.to_string())),
                ..PortalRender::default()
            };
            return portal_page(&state, &session, render).await;
        }
    };

    let render = match state.intake.submit(&submission).await {
        Ok(_) => PortalRender {
            notice: Some(Notice::success(SUBMITTED)),
            ..PortalRender::default()
        },
        Err(PortalError::Validation(v)) => PortalRender {
            notice: Some(Notice::warning(v.to_string())),
            form: Some(FormValues::from(&submission)),
            ..PortalRender::default()
        },
        Err(e) => return error_page(&state, e),
    };
    portal_page(&state, &session, render).await
}
