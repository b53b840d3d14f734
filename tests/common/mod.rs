//! In-process stand-in for the portal, bound to an ephemeral loopback port.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, COOKIE, ORIGIN, REFERER, SET_COOKIE, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use ancpi_scraper::PortalConfig;

pub const TEST_AGENTS: [&str; 2] = ["stub-agent/1.0", "stub-agent/2.0"];

/// One request seen by the stub.
#[derive(Debug, Clone)]
pub struct Hit {
    pub route: String,
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
    pub x_requested_with: Option<String>,
    pub referer: Option<String>,
    pub origin: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

pub struct StubPortal {
    /// Token embedded in the homepage; `None` leaves the field out.
    token: Option<String>,
    /// Append the homepage hit count to the token.
    rotate_tokens: bool,
    home_status: StatusCode,
    home_delay: Duration,
    units_body: String,
    search_status: StatusCode,
    search_body: String,
    hits: Mutex<Vec<Hit>>,
    homepage_hits: AtomicU64,
    sessions: AtomicU64,
}

impl Default for StubPortal {
    fn default() -> Self {
        Self {
            token: Some("abc123".into()),
            rotate_tokens: false,
            home_status: StatusCode::OK,
            home_delay: Duration::ZERO,
            units_body: r#"{"cities":[{"name":"Alba Iulia","value":"42"}]}"#.into(),
            search_status: StatusCode::OK,
            search_body: r#"{"status":"found","cf":"100002"}"#.into(),
            hits: Mutex::new(Vec::new()),
            homepage_hits: AtomicU64::new(0),
            sessions: AtomicU64::new(0),
        }
    }
}

impl StubPortal {
    pub fn without_token() -> Self {
        Self {
            token: None,
            ..Default::default()
        }
    }

    /// Append the homepage hit count to the token (`abc1231`, `abc1232`, ...).
    pub fn with_rotating_tokens(mut self) -> Self {
        self.rotate_tokens = true;
        self
    }

    pub fn with_home_status(mut self, status: StatusCode) -> Self {
        self.home_status = status;
        self
    }

    pub fn with_home_delay(mut self, delay: Duration) -> Self {
        self.home_delay = delay;
        self
    }

    pub fn with_units_body(mut self, body: impl Into<String>) -> Self {
        self.units_body = body.into();
        self
    }

    pub fn with_search_status(mut self, status: StatusCode) -> Self {
        self.search_status = status;
        self
    }

    pub fn with_search_body(mut self, body: impl Into<String>) -> Self {
        self.search_body = body.into();
        self
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn routes(&self) -> Vec<String> {
        self.hits().into_iter().map(|h| h.route).collect()
    }

    /// Number of `Set-Cookie` sessions handed out.
    pub fn sessions_issued(&self) -> u64 {
        self.sessions.load(Ordering::SeqCst)
    }

    fn record(&self, route: String, headers: &HeaderMap, body: String) {
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        self.hits.lock().unwrap().push(Hit {
            route,
            cookie: header(COOKIE),
            user_agent: header(USER_AGENT),
            x_requested_with: header(HeaderName::from_static("x-requested-with")),
            referer: header(REFERER),
            origin: header(ORIGIN),
            content_type: header(CONTENT_TYPE),
            body,
        });
    }
}

async fn homepage(State(stub): State<Arc<StubPortal>>, headers: HeaderMap) -> Response {
    stub.record("GET /".into(), &headers, String::new());
    let n = stub.homepage_hits.fetch_add(1, Ordering::SeqCst) + 1;

    if !stub.home_delay.is_zero() {
        tokio::time::sleep(stub.home_delay).await;
    }
    if stub.home_status != StatusCode::OK {
        return (stub.home_status, "portal error").into_response();
    }

    let field = match &stub.token {
        Some(token) if stub.rotate_tokens => format!(
            r#"<input type="hidden" id="orders-stoken" name="stoken" value="{}{}">"#,
            token, n
        ),
        Some(token) => format!(
            r#"<input type="hidden" id="orders-stoken" name="stoken" value="{}">"#,
            token
        ),
        None => String::new(),
    };
    let html = format!(
        r#"<!DOCTYPE html><html><body><form id="orders-form">{}<input id="orders-cf" name="cf"></form></body></html>"#,
        field
    );

    let mut response = Html(html).into_response();
    if !headers.contains_key(COOKIE) {
        let session = stub.sessions.fetch_add(1, Ordering::SeqCst) + 1;
        let cookie = format!("PHPSESSID=sess{}; Path=/", session);
        response
            .headers_mut()
            .insert(SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    }
    response
}

async fn uats(
    State(stub): State<Arc<StubPortal>>,
    Path((county, token)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    stub.record(
        format!("GET /ajax/uats/{}/{}", county, token),
        &headers,
        String::new(),
    );
    (
        [(CONTENT_TYPE, "application/json")],
        stub.units_body.clone(),
    )
        .into_response()
}

async fn search_cf(
    State(stub): State<Arc<StubPortal>>,
    Path(token): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    stub.record(format!("POST /ajax/searchCF/{}", token), &headers, body);
    (
        stub.search_status,
        [(CONTENT_TYPE, "application/json")],
        stub.search_body.clone(),
    )
        .into_response()
}

/// Serve `stub` on 127.0.0.1 and return a config pointing at it.
pub async fn spawn(stub: StubPortal) -> (Arc<StubPortal>, PortalConfig) {
    let stub = Arc::new(stub);
    let app = Router::new()
        .route("/", get(homepage))
        .route("/ajax/uats/:county/:token", get(uats))
        .route("/ajax/searchCF/:token", post(search_cf))
        .with_state(Arc::clone(&stub));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = PortalConfig::new(&format!("http://{}/", addr))
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .with_user_agents(TEST_AGENTS);

    (stub, config)
}
