//! Router assembly.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use vendor_auth::SessionLayer;

use crate::handlers::{self, api, gate, vendors};
use crate::state::AppState;

/// Build the application router.
///
/// Mounts:
/// - `GET /`, `POST /login`, `POST /logout`, `POST /reset-password`,
///   `POST /vendors` (HTML pages, session restored but not required)
/// - `POST /register` when registration is enabled
/// - `GET|POST /api/vendors` (JSON, 401 without a session)
/// - `GET /health`
///
/// Session layers are route layers, so unmatched paths fall through to 404.
pub fn build_router(state: AppState) -> Router {
    let restorer = state.restorer();

    let mut pages = Router::new()
        .route("/", get(gate::index))
        .route("/login", post(gate::login))
        .route("/logout", post(gate::logout))
        .route("/reset-password", post(gate::reset_password))
        .route("/vendors", post(vendors::submit));
    if state.authenticator.registration().enabled {
        pages = pages.route("/register", post(gate::register));
    }
    let pages = pages.route_layer(SessionLayer::new(restorer.clone()));

    let api = Router::new()
        .route(
            "/api/vendors",
            get(api::list_vendors).post(api::create_vendor),
        )
        .route_layer(SessionLayer::required(restorer));

    Router::new()
        .merge(pages)
        .merge(api)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
