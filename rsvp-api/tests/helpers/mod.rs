//! Router test harness over the in-memory store and recording mailer

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rsvp_api::{build_router, AppState};
use rsvp_common::config::{EmailConfig, StoreConfig, REQUEST_TIMEOUT};
use rsvp_common::testing::{MemoryStore, RecordingMailer};
use rsvp_common::Config;
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_KEY: &str = "s3cret";

/// How long background notifications are awaited
pub const NOTIFY_WAIT: Duration = Duration::from_secs(2);

pub fn test_config() -> Config {
    Config {
        store: StoreConfig {
            url: Some("http://store.invalid".to_string()),
            api_key: Some("service-key".to_string()),
        },
        email: EmailConfig {
            api_key: None,
            from_name: "Jemima & Marko Wedding".to_string(),
            from_email: "wedding@jemarko.com".to_string(),
        },
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_api_key: Some(ADMIN_KEY.to_string()),
        public_base_url: "https://rsvp.example.com".to_string(),
        request_timeout: REQUEST_TIMEOUT,
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    /// Guest list of John Smith, Jane Smith, Bob Johnson
    pub fn new() -> Self {
        Self::with(
            MemoryStore::with_guests(&["John Smith", "Jane Smith", "Bob Johnson"]),
            test_config(),
        )
    }

    pub fn with(store: MemoryStore, config: Config) -> Self {
        let store = Arc::new(store);
        let mailer = Arc::new(RecordingMailer::new());
        let state = AppState::new(config, store.clone(), mailer.clone());

        Self {
            router: build_router(state),
            store,
            mailer,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.send(get(uri)).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, body) = self.send(post_json(uri, &body.to_string())).await;
        (status, serde_json::from_str(&body).unwrap())
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .extension(ConnectInfo(SocketAddr::from(([192, 0, 2, 10], 40000))))
        .body(Body::from(body.to_string()))
        .unwrap()
}
