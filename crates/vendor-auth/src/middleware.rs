//! Tower session middleware.
//!
//! `SessionLayer` and `SessionService` restore the session from the cookie
//! and insert a [`Session`] into request extensions. By default every request
//! is forwarded; the page controller decides what an unauthenticated user
//! sees. A layer built with [`SessionLayer::required`] answers 401 instead.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::{Request, StatusCode};
use tower::{Layer, Service};

use crate::Session;

/// Turns a cookie token into a session.
///
/// Implemented by whoever owns the credential store, since restoring a
/// session must check that the user still exists.
pub trait SessionRestorer: Send + Sync + 'static {
    /// Name of the session cookie.
    fn cookie_name(&self) -> &str;

    /// Restore the session carried by `token`.
    fn restore(&self, token: &str) -> Pin<Box<dyn Future<Output = Session> + Send + '_>>;
}

/// Tower `Layer` that wraps services with session restoration.
pub struct SessionLayer<R: SessionRestorer> {
    restorer: Arc<R>,
    required: bool,
}

impl<R: SessionRestorer> Clone for SessionLayer<R> {
    fn clone(&self) -> Self {
        Self {
            restorer: self.restorer.clone(),
            required: self.required,
        }
    }
}

impl<R: SessionRestorer> SessionLayer<R> {
    /// A layer that restores the session and always forwards.
    pub fn new(restorer: Arc<R>) -> Self {
        Self {
            restorer,
            required: false,
        }
    }

    /// A layer that rejects requests without an authenticated session.
    pub fn required(restorer: Arc<R>) -> Self {
        Self {
            restorer,
            required: true,
        }
    }
}

impl<R: SessionRestorer, S> Layer<S> for SessionLayer<R> {
    type Service = SessionService<R, S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionService {
            inner,
            restorer: self.restorer.clone(),
            required: self.required,
        }
    }
}

/// Tower `Service` that restores the session before forwarding requests.
pub struct SessionService<R: SessionRestorer, S> {
    inner: S,
    restorer: Arc<R>,
    required: bool,
}

impl<R: SessionRestorer, S: Clone> Clone for SessionService<R, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            restorer: self.restorer.clone(),
            required: self.required,
        }
    }
}

impl<R, S> Service<Request<Body>> for SessionService<R, S>
where
    R: SessionRestorer,
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let restorer = self.restorer.clone();
        let required = self.required;

        Box::pin(async move {
            let token = extract_cookie(&req, restorer.cookie_name())
                .map(str::to_string);
            let session = match token {
                Some(token) => restorer.restore(&token).await,
                None => Session::unknown(),
            };

            if required && !session.is_authenticated() {
                log::debug!("Rejecting unauthenticated request to {}", req.uri().path());
                return Ok(unauthorized_response("authentication required"));
            }

            req.extensions_mut().insert(session);
            let resp = inner
                .call(req)
                .await
                .unwrap_or_else(|infallible| match infallible {});
            Ok(resp.into_response())
        })
    }
}

/// Extract a named cookie from the request's `Cookie` headers.
fn extract_cookie<'a>(req: &'a Request<Body>, name: &str) -> Option<&'a str> {
    req.headers()
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

/// Build a 401 Unauthorized JSON response.
fn unauthorized_response(message: &str) -> axum::response::Response {
    let body = serde_json::json!({
        "error": {
            "category": "authentication",
            "message": message,
        }
    });

    (
        StatusCode::UNAUTHORIZED,
        [(http::header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&body).unwrap_or_default(),
    )
        .into_response()
}
