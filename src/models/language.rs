use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One language's share of an aggregation run. `bytes` is populated by
/// the detailed strategy only; the basic strategy ranks by repository
/// count and reports percentages alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub name: String,
    pub bytes: Option<u64>,
    pub percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Frontend,
    Backend,
    Mobile,
    Tools,
    Database,
    DataScience,
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Frontend => write!(f, "Frontend"),
            Category::Backend => write!(f, "Backend"),
            Category::Mobile => write!(f, "Mobile"),
            Category::Tools => write!(f, "Tools"),
            Category::Database => write!(f, "Database"),
            Category::DataScience => write!(f, "Data Science"),
            Category::Other => write!(f, "Other"),
        }
    }
}

/// A [`LanguageStat`] joined with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLanguage {
    pub name: String,
    pub bytes: Option<u64>,
    pub percentage: u32,
    pub category: Category,
    pub display_name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    /// Non-fork repositories in the listing. Stars and forks below sum
    /// over the full listing, forks included; the published site numbers
    /// depend on that asymmetry, so it stays.
    pub public_repos: u32,
    pub total_stars: u32,
    pub total_forks: u32,
    pub followers: u32,
    pub following: u32,
    pub created_at: DateTime<Utc>,
}

/// What the presentation layer receives from one skills fetch: the
/// classified languages, profile stats when available, and a single
/// error message when the run failed outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsReport {
    pub languages: Vec<ClassifiedLanguage>,
    pub stats: Option<ProfileStats>,
    pub error: Option<String>,
}
