use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

use crate::database::models::Section;
use crate::handlers::public::auth::TokenResponse;

/// Thin HTTP client for the planner API
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Error returned by the server, decoded from its JSON error body
#[derive(Debug, thiserror::Error)]
#[error("{message} (HTTP {status})")]
pub struct RemoteError {
    pub status: StatusCode,
    pub code: Option<String>,
    pub message: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> anyhow::Result<Value> {
        let request = self.client.get(self.url("/health"));
        Ok(Self::send(request).await?.json().await?)
    }

    pub async fn register(&self, username: &str, password: &str) -> anyhow::Result<String> {
        let request = self
            .client
            .post(self.url("/api/register"))
            .json(&json!({ "username": username, "password": password }));
        let body: TokenResponse = Self::send(request).await?.json().await?;
        Ok(body.token)
    }

    pub async fn login(&self, username: &str, password: &str) -> anyhow::Result<String> {
        let request = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "username": username, "password": password }));
        let body: TokenResponse = Self::send(request).await?.json().await?;
        Ok(body.token)
    }

    pub async fn get_sections(&self, token: &str) -> anyhow::Result<Vec<Section>> {
        let request = self.client.get(self.url("/api/sections")).bearer_auth(token);
        Ok(Self::send(request).await?.json().await?)
    }

    pub async fn save_sections(&self, token: &str, sections: &[Section]) -> anyhow::Result<()> {
        let request = self
            .client
            .post(self.url("/api/sections"))
            .bearer_auth(token)
            .json(sections);
        Self::send(request).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(request: RequestBuilder) -> anyhow::Result<Response> {
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(RemoteError {
            status,
            code: body.get("code").and_then(Value::as_str).map(str::to_string),
            message: body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("request failed")
                .to_string(),
        }
        .into())
    }
}
