#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use order_entry::config::ErpApiSettings;
use order_entry::services::erp_client::ErpClient;
use order_entry::startup::build_router;
use order_entry::AppState;
use std::sync::{Arc, Mutex, Once};
use tower::util::ServiceExt;
use wiremock::MockServer;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,order_entry=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Router wired to a mock ERP, driven like a single browser: the session
/// cookie from the first response is replayed on every later request.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub erp: MockServer,
    cookie: Mutex<Option<String>>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        init_tracing();

        let erp = MockServer::start().await;
        let mut settings = ErpApiSettings::new(erp.uri());
        settings.timeout_secs = 5;

        let client = ErpClient::new(settings).expect("Failed to build ERP client");
        let state = AppState::new(Arc::new(client));
        let router = build_router(state.clone(), "static");

        Self {
            router,
            state,
            erp,
            cookie: Mutex::new(None),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = self.with_cookie(Request::builder().method("GET").uri(uri));
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, pairs: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(pairs).unwrap();
        let request = self
            .with_cookie(Request::builder().method("POST").uri(uri))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request.body(Body::from(body)).unwrap()).await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.post_form(uri, &[]).await
    }

    /// Rendered order page body.
    pub async fn order_page(&self) -> String {
        let response = self.get("/").await;
        assert_eq!(response.status, StatusCode::OK);
        response.body
    }

    /// JSON bodies the mock ERP received, in order.
    pub async fn erp_requests(&self) -> Vec<serde_json::Value> {
        self.erp
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect()
    }

    fn with_cookie(&self, builder: axum::http::request::Builder) -> axum::http::request::Builder {
        match self.cookie.lock().unwrap().as_ref() {
            Some(cookie) => builder.header(header::COOKIE, cookie.as_str()),
            None => builder,
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response: Response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default().to_string();
            *self.cookie.lock().unwrap() = Some(pair);
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

impl TestResponse {
    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
    }
}
