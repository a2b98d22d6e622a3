// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub API client for the repository listing proxy.
//!
//! Stateless pass-through: no caching, no local side effects. Rate
//! limiting is GitHub's concern; OAuth app credentials from config raise
//! the limit and are sent via basic auth, never in the query string.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on a single GitHub call; expiry surfaces as a 500.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of repositories returned per lookup.
const REPOS_PER_PAGE: u32 = 5;

/// GitHub API client.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl GithubClient {
    /// Create a new GitHub client.
    ///
    /// `credentials` is the OAuth app (client_id, client_secret) pair; when
    /// absent, lookups run unauthenticated at the shared rate limit.
    pub fn new(credentials: Option<(String, String)>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("devconnect")
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: "https://api.github.com".to_string(),
            credentials,
        })
    }

    /// Create a client pointed at a different base URL (for tests).
    #[cfg(test)]
    fn with_base_url(base_url: &str) -> anyhow::Result<Self> {
        let mut client = Self::new(None)?;
        client.base_url = base_url.trim_end_matches('/').to_string();
        Ok(client)
    }

    /// List up to 5 most-recently-created repositories for a username,
    /// ascending by creation time.
    pub async fn list_repos(&self, username: &str) -> Result<Vec<RepoSummary>, AppError> {
        let url = self.repos_url(username);

        let mut request = self.http.get(&url).query(&[
            ("per_page", REPOS_PER_PAGE.to_string()),
            ("sort", "created".to_string()),
            ("direction", "asc".to_string()),
        ]);

        if let Some((client_id, client_secret)) = &self.credentials {
            request = request.basic_auth(client_id, Some(client_secret));
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::GithubApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::debug!(username, %status, "GitHub returned non-success status");
            return Err(AppError::NotFound("No Github profile found".to_string()));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GithubApi(format!("JSON parse error: {}", e)))
    }

    fn repos_url(&self, username: &str) -> String {
        format!("{}/users/{}/repos", self.base_url, username)
    }
}

/// Repository summary passed through to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSummary {
    pub id: u64,
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub stargazers_count: u32,
    pub watchers_count: u32,
    pub forks_count: u32,
    pub created_at: String,
}
