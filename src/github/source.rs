use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::models::{GitHubUser, Repository};

/// The network boundary the aggregation engine sees. [`GitHubClient`]
/// is the production implementation; tests substitute fixtures.
///
/// [`GitHubClient`]: crate::github::GitHubClient
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn user_profile(&self) -> Result<GitHubUser>;

    /// Lists the user's repositories. With `include_private` set (and a
    /// token configured) this queries the authenticated owner-affiliated
    /// listing; both branches return the same shape.
    async fn repositories(&self, include_private: bool) -> Result<Vec<Repository>>;

    /// Repositories the user has starred. Callers fall back to an empty
    /// list on failure instead of propagating the error.
    async fn starred(&self) -> Result<Vec<Repository>>;

    /// Language byte counts for one repository, `{language: bytes}`.
    async fn repository_languages(&self, owner: &str, repo: &str)
        -> Result<HashMap<String, u64>>;
}
