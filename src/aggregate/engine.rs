use futures::future::try_join;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use tokio::time::{sleep, Duration};

use crate::error::Result;
use crate::github::RepoSource;
use crate::models::{ClassifiedLanguage, LanguageStat, ProfileStats};
use crate::taxonomy::LanguageTable;

/// Batch and pacing constants for the detailed strategy. The language
/// endpoint is hit once per repository, so requests go out one at a
/// time with a delay to stay clear of the upstream rate limit.
const LANGUAGE_BATCH_SIZE: usize = 5;
const REQUEST_DELAY: Duration = Duration::from_millis(200);

/// Turns a user's repository listing into ranked language statistics.
///
/// Two strategies: the basic one counts repositories by primary
/// language from the listing alone; the detailed one fetches the exact
/// byte breakdown of every non-fork repository and sums bytes.
pub struct LanguageAggregator<S: RepoSource> {
    source: S,
    table: LanguageTable,
}

impl<S: RepoSource> LanguageAggregator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            table: LanguageTable::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Ranks languages by how many non-fork repositories name them as
    /// the primary language. One listing fetch, no per-repository
    /// fan-out. Repositories without a primary language are skipped.
    pub async fn basic_language_stats(&self, include_private: bool) -> Result<Vec<LanguageStat>> {
        let repos = self.source.repositories(include_private).await?;

        let mut repo_counts: HashMap<String, u32> = HashMap::new();
        for repo in repos.iter().filter(|r| !r.fork) {
            if let Some(language) = &repo.language {
                *repo_counts.entry(language.clone()).or_insert(0) += 1;
            }
        }

        let total: u32 = repo_counts.values().sum();

        let mut counts: Vec<(String, u32)> = repo_counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(counts
            .into_iter()
            .map(|(name, count)| LanguageStat {
                name,
                bytes: None,
                percentage: percentage(u64::from(count), u64::from(total)),
            })
            .collect())
    }

    /// Fetches per-repository byte counts and merges them into one
    /// ranking. Forks and empty repositories are excluded before the
    /// fan-out. A single repository's failed fetch is logged and
    /// skipped; the run keeps going.
    pub async fn detailed_language_stats(
        &self,
        include_private: bool,
    ) -> Result<Vec<LanguageStat>> {
        let repos = self.source.repositories(include_private).await?;
        let candidates: Vec<_> = repos
            .into_iter()
            .filter(|r| !r.fork && r.size > 0)
            .collect();

        tracing::info!(
            "Analyzing {} repositories{}",
            candidates.len(),
            if include_private {
                " (including private)"
            } else {
                " (public only)"
            }
        );

        let pb = ProgressBar::new(candidates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} repos")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut bytes_by_language: HashMap<String, u64> = HashMap::new();
        let mut first_request = true;

        for batch in candidates.chunks(LANGUAGE_BATCH_SIZE) {
            for repo in batch {
                if !first_request {
                    sleep(REQUEST_DELAY).await;
                }
                first_request = false;

                match self
                    .source
                    .repository_languages(&repo.owner.login, &repo.name)
                    .await
                {
                    Ok(languages) => {
                        for (language, bytes) in languages {
                            *bytes_by_language.entry(language).or_insert(0) += bytes;
                        }
                    }
                    Err(err) => {
                        tracing::warn!("Failed to fetch languages for {}: {}", repo.name, err);
                    }
                }

                pb.inc(1);
            }
        }

        pb.finish_and_clear();

        let total: u64 = bytes_by_language.values().sum();

        let mut merged: Vec<(String, u64)> = bytes_by_language.into_iter().collect();
        merged.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(merged
            .into_iter()
            .map(|(name, bytes)| LanguageStat {
                name,
                bytes: Some(bytes),
                percentage: percentage(bytes, total),
            })
            .collect())
    }

    /// Profile and repository listing fetched concurrently; either
    /// failure fails the whole call.
    pub async fn profile_stats(&self, include_private: bool) -> Result<ProfileStats> {
        let (profile, repos) = try_join(
            self.source.user_profile(),
            self.source.repositories(include_private),
        )
        .await?;

        Ok(ProfileStats {
            public_repos: repos.iter().filter(|r| !r.fork).count() as u32,
            // Star and fork totals run over the full listing, forks
            // included; only the repository count excludes forks.
            total_stars: repos.iter().map(|r| r.stargazers_count).sum(),
            total_forks: repos.iter().map(|r| r.forks_count).sum(),
            followers: profile.followers,
            following: profile.following,
            created_at: profile.created_at,
        })
    }

    /// Joins stats against the classification table, dropping entries
    /// below `min_percentage` first and only then truncating to
    /// `max_languages`, so the cap applies to the surviving ranking.
    pub fn classify(
        &self,
        stats: Vec<LanguageStat>,
        min_percentage: u32,
        max_languages: usize,
    ) -> Vec<ClassifiedLanguage> {
        stats
            .into_iter()
            .filter(|s| s.percentage >= min_percentage)
            .take(max_languages)
            .map(|stat| {
                let info = self.table.lookup(&stat.name);
                ClassifiedLanguage {
                    name: stat.name,
                    bytes: stat.bytes,
                    percentage: stat.percentage,
                    category: info.category,
                    display_name: info.display_name,
                    color: info.color,
                }
            })
            .collect()
    }
}

/// Integer share of `part` in `total`, rounded; 0 for an empty total.
fn percentage(part: u64, total: u64) -> u32 {
    if total == 0 {
        0
    } else {
        ((part as f64 / total as f64) * 100.0).round() as u32
    }
}
