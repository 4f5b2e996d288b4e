#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use study_planner_api::database::models::{Section, User};
use study_planner_api::database::{MemoryUserStore, StoreError, UserStore};
use study_planner_api::{app, AppConfig, AppState};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Router plus handles on its state, backed by a fresh in-memory store
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: MemoryUserStore,
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| {
        let value = match key {
            "DATABASE_URL" => Some("memory://"),
            "JWT_SECRET" => Some(TEST_SECRET),
            // Lowest cost keeps hashing fast in tests
            "SECURITY_BCRYPT_COST" => Some("4"),
            "API_ENABLE_REQUEST_LOGGING" => Some("false"),
            _ => None,
        };
        value.map(str::to_string)
    })
    .expect("test configuration should be valid")
}

pub fn test_app() -> TestApp {
    let store = MemoryUserStore::new();
    let state = AppState::new(test_config(), Arc::new(store.clone()))
        .expect("app state should build");
    TestApp {
        router: app(state.clone()),
        state,
        store,
    }
}

/// Store whose every call fails as if the database were down
pub struct UnreachableStore;

#[async_trait]
impl UserStore for UnreachableStore {
    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        Err(unreachable_error())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
        Err(unreachable_error())
    }

    async fn create(&self, _username: &str, _password_hash: &str) -> Result<User, StoreError> {
        Err(unreachable_error())
    }

    async fn replace_sections(&self, _id: Uuid, _sections: &[Section]) -> Result<(), StoreError> {
        Err(unreachable_error())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(unreachable_error())
    }
}

fn unreachable_error() -> StoreError {
    StoreError::Unavailable("connection refused (db.internal:5432)".to_string())
}

/// App wired to `UnreachableStore`; `store` is a detached, unused memory store
pub fn unreachable_store_app() -> TestApp {
    let state = AppState::new(test_config(), Arc::new(UnreachableStore))
        .expect("app state should build");
    TestApp {
        router: app(state.clone()),
        state,
        store: MemoryUserStore::new(),
    }
}

impl TestApp {
    /// Send a request through the router and decode the JSON body (Null when empty)
    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };
        (status, body)
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.request(builder.body(body).expect("request should build"))
            .await
    }

    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Register a user and return its token, failing the test otherwise
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let (status, body) = self.register(username, password).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body["token"]
            .as_str()
            .expect("token should be a string")
            .to_string()
    }
}

/// A server bound to a real TCP port for end-to-end tests
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        let router = test_app().router;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self { port, base_url };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}
