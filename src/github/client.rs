use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::github::paginator::Paginator;
use crate::github::source::RepoSource;
use crate::models::{GitHubUser, Repository};

const USER_AGENT: &str = "devfolio-portfolio/0.1";
const PAGE_SIZE: u32 = 100;

pub struct GitHubClient {
    client: Client,
    username: String,
    has_token: bool,
    base_url: String,
}

impl GitHubClient {
    pub fn new(username: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("token {}", token))?,
            );
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            username: username.to_string(),
            has_token: token.is_some(),
            base_url: "https://api.github.com".to_string(),
        })
    }

    /// Issues one authenticated GET against the API base and parses the
    /// JSON body. Non-2xx statuses become [`Error::Http`].
    async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("Fetching: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        Ok(response.json().await?)
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn user_profile(&self) -> Result<GitHubUser> {
        tracing::info!("Fetching profile for: {}", self.username);
        match self.request(&format!("/users/{}", self.username)).await {
            Err(Error::Http { status: 404, .. }) => {
                Err(Error::UserNotFound(self.username.clone()))
            }
            other => other,
        }
    }

    async fn repositories(&self, include_private: bool) -> Result<Vec<Repository>> {
        // The authenticated listing is the only way to see private
        // repositories; without a token the public listing is all there is.
        let endpoint = if include_private && self.has_token {
            "/user/repos?sort=updated&affiliation=owner".to_string()
        } else {
            format!("/users/{}/repos?sort=updated", self.username)
        };

        tracing::info!("Fetching repositories for: {}", self.username);
        let url = format!("{}{}", self.base_url, endpoint);
        Paginator::new(&self.client).fetch_all(&url, PAGE_SIZE).await
    }

    async fn starred(&self) -> Result<Vec<Repository>> {
        let url = format!("{}/users/{}/starred", self.base_url, self.username);
        Paginator::new(&self.client).fetch_all(&url, PAGE_SIZE).await
    }

    async fn repository_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<HashMap<String, u64>> {
        self.request(&format!("/repos/{}/{}/languages", owner, repo)).await
    }
}
