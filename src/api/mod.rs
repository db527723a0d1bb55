//! Authentication API client
//!
//! One network call lives here: the login mutation. Everything else the
//! shell does is local.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl AuthClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST {base_url}/Login` with a JSON credentials body.
    ///
    /// Non-success responses surface the status text (or body when the
    /// server sent one); transport failures surface the underlying message.
    /// No retries — failure handling is the caller's concern.
    pub fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let url = format!("{}/Login", self.base_url);
        info!(target: "api", "Logging in against {}", url);

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .with_context(|| format!("Login request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            let detail = detail.trim();
            if detail.is_empty() {
                return Err(anyhow!(
                    "{}",
                    status.canonical_reason().unwrap_or(status.as_str())
                ));
            }
            return Err(anyhow!("{}", detail));
        }

        let login: LoginResponse = response.json().context("Malformed login response")?;
        Ok(login)
    }
}
