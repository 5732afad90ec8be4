//! Common test utilities and harness for portal integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::response::Response;
use http::{Request, header};
use tempfile::TempDir;
use tower::ServiceExt;

use vendor_auth::{PasswordHasher, UserRecord};
use vendor_portal::{AppState, ConfigStore, PortalConfig, build_router};
use vendor_sheets::{Grid, MemoryStore, StoreError, TableStore};

/// Worksheet the fixtures use.
pub const SHEET: &str = "Inventario";

/// Configuration with one user, `jsmith` / `secret`.
pub const CONFIG: &str = r#"
credentials:
  usernames:
    jsmith:
      email: jsmith@example.com
      name: John Smith
      password: secret
cookie:
  name: vendor_portal
  key: some_signature_key
  expiry_days: 30
pre-authorized:
  emails:
    - invited@example.com
"#;

/// Test harness: a router over a memory store and a temp config file.
pub struct TestPortal {
    /// Holds the config file alive
    pub dir: TempDir,
    /// Shared state behind the router
    pub state: AppState,
    /// Router under test
    pub router: Router,
}

impl TestPortal {
    /// A portal with an empty worksheet.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), CONFIG)
    }

    /// A portal with self-registration enabled.
    pub fn with_registration(pre_authorization: bool) -> Self {
        let yaml = format!(
            "{CONFIG}registration:\n  enabled: true\n  pre_authorization: {pre_authorization}\n"
        );
        Self::with_store(Arc::new(MemoryStore::new()), &yaml)
    }

    /// A portal whose password hashing uses bcrypt cost `cost`.
    pub fn with_cost(cost: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::build(store, CONFIG, PasswordHasher::new(cost))
    }

    /// A portal over `store` configured by `yaml`.
    pub fn with_store(store: Arc<dyn TableStore>, yaml: &str) -> Self {
        Self::build(store, yaml, PasswordHasher::new(4))
    }

    fn build(store: Arc<dyn TableStore>, yaml: &str, hasher: PasswordHasher) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, yaml).unwrap();

        let config = Arc::new(ConfigStore::load(&path).unwrap());
        let state = AppState::with_hasher(config, store, hasher).unwrap();
        let router = build_router(state.clone());
        Self { dir, state, router }
    }

    /// The configuration as currently saved on disk.
    pub fn saved_config(&self) -> PortalConfig {
        ConfigStore::load(self.dir.path().join("config.yaml"))
            .unwrap()
            .snapshot()
    }

    /// One user's record as currently saved on disk.
    pub fn saved_user(&self, username: &str) -> UserRecord {
        self.saved_config().credentials.usernames[username].clone()
    }

    /// Send one request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// `GET path`, optionally with a session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::get(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// `POST path` with a urlencoded body.
    pub async fn post_form(&self, path: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// `POST path` with a JSON body.
    pub async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
        cookie: Option<&str>,
    ) -> Response {
        let mut builder = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Log in and return the `Cookie` header value for the session.
    pub async fn login_as(&self, username: &str, password: &str) -> String {
        let resp = self
            .post_form(
                "/login",
                &format!("username={username}&password={password}"),
                None,
            )
            .await;
        assert_eq!(resp.status(), http::StatusCode::SEE_OTHER);
        session_cookie(&resp).expect("login should set a session cookie")
    }

    /// Log in as the fixture user.
    pub async fn login(&self) -> String {
        self.login_as("jsmith", "secret").await
    }

    /// A `Cookie` header value signed for `username` without logging in.
    pub fn cookie_for(&self, username: &str) -> String {
        let token = self
            .state
            .authenticator
            .codec()
            .issue(username, username)
            .unwrap();
        format!("vendor_portal={token}")
    }
}

/// The `name=value` part of the response's `Set-Cookie` header.
pub fn session_cookie(resp: &Response) -> Option<String> {
    let raw = resp.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(|pair| pair.trim().to_string())
}

/// Full `Set-Cookie` header value.
pub fn set_cookie_header(resp: &Response) -> Option<String> {
    resp.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Read a response body as text.
pub async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(resp).await).unwrap()
}

/// A worksheet with the header row and one vendor per name.
pub fn sheet_with(names: &[&str]) -> Grid {
    let mut grid = vec![vendor_core::COLUMNS.iter().map(|c| c.to_string()).collect()];
    for name in names {
        grid.push(
            [*name, "Retailer", "Apparel", "7", "2023-03-15", ""]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
    }
    grid
}

/// The urlencoded vendor form for "Acme" as a distributor.
pub fn acme_form(company_name: &str) -> String {
    format!(
        "company_name={company_name}&business_type=Distributor&products=Electronics\
         &products=Software&years_in_business=5&onboarding_date=2024-01-01\
         &additional_info=&submit=1"
    )
}

/// A store whose every call fails as if the API were down.
pub struct UnavailableStore;

#[async_trait]
impl TableStore for UnavailableStore {
    async fn read(&self, _worksheet: &str) -> vendor_sheets::Result<Grid> {
        Err(StoreError::Status {
            status: 503,
            body: "backend unavailable".to_string(),
        })
    }

    async fn write(&self, _worksheet: &str, _grid: &Grid) -> vendor_sheets::Result<()> {
        Err(StoreError::Status {
            status: 503,
            body: "backend unavailable".to_string(),
        })
    }
}
