use chrono::Utc;

use crate::aggregate::LanguageAggregator;
use crate::cache::{CachePayload, CacheStore};
use crate::config::StatsConfig;
use crate::github::RepoSource;
use crate::models::{Repository, SkillsReport};

/// Front door for the presentation layer: checks the cache, runs the
/// configured aggregation strategy and the profile-stats fetch
/// concurrently, classifies the result, and writes it back to the cache
/// best-effort.
pub struct SkillsService<S: RepoSource> {
    engine: LanguageAggregator<S>,
    cache: Option<CacheStore>,
    username: String,
    config: StatsConfig,
}

impl<S: RepoSource> SkillsService<S> {
    pub fn new(source: S, cache: Option<CacheStore>, username: &str, config: StatsConfig) -> Self {
        Self {
            engine: LanguageAggregator::new(source),
            cache,
            username: username.to_string(),
            config,
        }
    }

    pub async fn fetch(&self) -> SkillsReport {
        if let Some(entry) = self.fresh_cache_entry() {
            tracing::info!("Using cached skills data for {}", self.username);
            return SkillsReport {
                languages: entry.languages,
                stats: entry.stats,
                error: None,
            };
        }

        let language_stats = async {
            if self.config.use_detailed_stats {
                self.engine
                    .detailed_language_stats(self.config.include_private)
                    .await
            } else {
                self.engine
                    .basic_language_stats(self.config.include_private)
                    .await
            }
        };
        let profile_stats = self.engine.profile_stats(self.config.include_private);

        let (languages, stats) = futures::join!(language_stats, profile_stats);

        // Profile stats are a nice-to-have; the skills list renders
        // without them.
        let stats = match stats {
            Ok(stats) => Some(stats),
            Err(err) => {
                tracing::warn!("Failed to fetch profile stats: {}", err);
                None
            }
        };

        match languages {
            Ok(ranked) => {
                let languages = self.engine.classify(
                    ranked,
                    self.config.min_percentage,
                    self.config.max_languages,
                );

                if self.config.enable_cache {
                    if let Some(cache) = &self.cache {
                        cache.set(
                            &self.username,
                            self.config.include_private,
                            &CachePayload {
                                languages: languages.clone(),
                                stats: stats.clone(),
                            },
                        );
                    }
                }

                SkillsReport {
                    languages,
                    stats,
                    error: None,
                }
            }
            Err(err) => {
                tracing::error!("Failed to fetch language stats: {}", err);
                SkillsReport {
                    languages: Vec::new(),
                    stats,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Starred repositories for the projects section; an empty list on
    /// failure, never an error.
    pub async fn starred_projects(&self) -> Vec<Repository> {
        match self.engine.source().starred().await {
            Ok(repos) => repos,
            Err(err) => {
                tracing::warn!("Failed to fetch starred repositories: {}", err);
                Vec::new()
            }
        }
    }

    fn fresh_cache_entry(&self) -> Option<CachePayload> {
        if !self.config.enable_cache {
            return None;
        }
        let entry = self
            .cache
            .as_ref()?
            .get(&self.username, self.config.include_private)?;

        entry
            .is_fresh(self.config.cache_expiry_millis, Utc::now().timestamp_millis())
            .then_some(entry.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::error::{Error, Result};
    use crate::models::{GitHubUser, RepositoryOwner};

    #[derive(Default)]
    struct CountingSource {
        repos: Vec<Repository>,
        fail_listing: bool,
        fail_profile: bool,
        listing_calls: AtomicU32,
    }

    fn repo(name: &str, language: &str) -> Repository {
        Repository {
            id: 1,
            name: name.to_string(),
            full_name: format!("octocat/{}", name),
            description: None,
            language: Some(language.to_string()),
            size: 10,
            stargazers_count: 2,
            forks_count: 1,
            fork: false,
            homepage: None,
            has_pages: false,
            updated_at: Utc::now(),
            owner: RepositoryOwner {
                login: "octocat".to_string(),
            },
        }
    }

    #[async_trait]
    impl RepoSource for CountingSource {
        async fn user_profile(&self) -> Result<GitHubUser> {
            if self.fail_profile {
                return Err(Error::Http {
                    status: 503,
                    status_text: "Service Unavailable".to_string(),
                });
            }
            Ok(GitHubUser {
                login: "octocat".to_string(),
                id: 1,
                name: None,
                avatar_url: String::new(),
                bio: None,
                public_repos: 1,
                followers: 3,
                following: 4,
                created_at: Utc::now(),
            })
        }

        async fn repositories(&self, _include_private: bool) -> Result<Vec<Repository>> {
            self.listing_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_listing {
                return Err(Error::Http {
                    status: 502,
                    status_text: "Bad Gateway".to_string(),
                });
            }
            Ok(self.repos.clone())
        }

        async fn starred(&self) -> Result<Vec<Repository>> {
            Err(Error::Http {
                status: 500,
                status_text: "Internal Server Error".to_string(),
            })
        }

        async fn repository_languages(
            &self,
            _owner: &str,
            _repo: &str,
        ) -> Result<HashMap<String, u64>> {
            Ok(HashMap::new())
        }
    }

    fn config() -> StatsConfig {
        StatsConfig {
            min_percentage: 1,
            max_languages: 10,
            enable_cache: true,
            cache_expiry_millis: 60_000,
            include_private: false,
            use_detailed_stats: false,
        }
    }

    #[tokio::test]
    async fn fetch_produces_classified_report_and_caches_it() {
        let source = CountingSource {
            repos: vec![repo("app", "Rust")],
            ..Default::default()
        };
        let cache = CacheStore::in_memory().unwrap();
        let service = SkillsService::new(source, Some(cache), "octocat", config());

        let report = service.fetch().await;

        assert!(report.error.is_none());
        assert_eq!(report.languages.len(), 1);
        assert_eq!(report.languages[0].display_name, "Rust");
        assert_eq!(report.languages[0].percentage, 100);
        let stats = report.stats.expect("profile stats should be present");
        assert_eq!(stats.total_stars, 2);

        let cached = service
            .cache
            .as_ref()
            .unwrap()
            .get("octocat", false)
            .expect("run should be cached");
        assert_eq!(cached.payload.languages, report.languages);
    }

    #[tokio::test]
    async fn fresh_cache_short_circuits_the_network() {
        let source = CountingSource {
            repos: vec![repo("app", "Rust")],
            ..Default::default()
        };
        let cache = CacheStore::in_memory().unwrap();
        let service = SkillsService::new(source, Some(cache), "octocat", config());

        let first = service.fetch().await;
        // one listing call per concurrent branch
        let calls_after_first = service
            .engine
            .source()
            .listing_calls
            .load(Ordering::SeqCst);

        let second = service.fetch().await;
        let calls_after_second = service
            .engine
            .source()
            .listing_calls
            .load(Ordering::SeqCst);

        assert_eq!(calls_after_first, calls_after_second);
        assert_eq!(first.languages, second.languages);
    }

    #[tokio::test]
    async fn expired_cache_triggers_a_fresh_run() {
        let source = CountingSource {
            repos: vec![repo("app", "Rust")],
            ..Default::default()
        };
        let cache = CacheStore::in_memory().unwrap();
        let mut cfg = config();
        cfg.cache_expiry_millis = 0; // everything is instantly stale
        let service = SkillsService::new(source, Some(cache), "octocat", cfg);

        service.fetch().await;
        let first_calls = service
            .engine
            .source()
            .listing_calls
            .load(Ordering::SeqCst);
        service.fetch().await;
        let second_calls = service
            .engine
            .source()
            .listing_calls
            .load(Ordering::SeqCst);

        assert!(second_calls > first_calls);
    }

    #[tokio::test]
    async fn listing_failure_becomes_an_error_report() {
        let source = CountingSource {
            fail_listing: true,
            ..Default::default()
        };
        let service = SkillsService::new(source, None, "octocat", config());

        let report = service.fetch().await;

        assert!(report.languages.is_empty());
        assert!(report.stats.is_none());
        let message = report.error.expect("error message expected");
        assert!(message.contains("502"));
    }

    #[tokio::test]
    async fn profile_failure_degrades_to_absent_stats() {
        let source = CountingSource {
            repos: vec![repo("app", "Rust")],
            fail_profile: true,
            ..Default::default()
        };
        let service = SkillsService::new(source, None, "octocat", config());

        let report = service.fetch().await;

        assert!(report.error.is_none());
        assert_eq!(report.languages.len(), 1);
        assert!(report.stats.is_none());
    }

    #[tokio::test]
    async fn starred_failure_degrades_to_empty_list() {
        let service = SkillsService::new(CountingSource::default(), None, "octocat", config());

        assert!(service.starred_projects().await.is_empty());
    }
}
