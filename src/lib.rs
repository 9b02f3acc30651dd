pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod taxonomy;
pub mod aggregate;
pub mod cache;
pub mod display;

pub use config::{Config, StatsConfig};
pub use error::{Error, Result};
pub use github::{GitHubClient, RepoSource};
pub use aggregate::{LanguageAggregator, SkillsService};
pub use cache::CacheStore;
