use clap::Parser;
use tracing_subscriber::EnvFilter;

use devfolio::display::{group_by_category, skill_level};
use devfolio::models::{Repository, SkillsReport};
use devfolio::{CacheStore, Config, GitHubClient, SkillsService, StatsConfig};

#[derive(Parser, Debug)]
#[command(name = "devfolio")]
#[command(version = "0.1.0")]
#[command(about = "Aggregate GitHub language statistics into a portfolio skills report")]
struct Args {
    /// GitHub username to aggregate
    #[arg(short, long)]
    username: String,

    /// Output format (json, text, markdown)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Fetch exact per-repository byte counts (slower, more accurate)
    #[arg(long)]
    detailed: bool,

    /// Include private repositories (requires a token with repo scope)
    #[arg(long)]
    include_private: bool,

    /// Drop languages below this percentage of the total
    #[arg(long, default_value = "1")]
    min_percentage: u32,

    /// Show at most this many languages
    #[arg(long, default_value = "10")]
    max_languages: usize,

    /// Skip the cache entirely
    #[arg(long)]
    no_cache: bool,

    /// Treat cached data older than this many hours as stale
    #[arg(long, default_value = "1")]
    cache_expiry_hours: i64,

    /// Cache database path
    #[arg(long, default_value = "devfolio.db")]
    database: String,

    /// Append the user's starred repositories to the report
    #[arg(long)]
    starred: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("devfolio=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    // A missing or broken cache database only costs us re-fetching.
    let cache = if args.no_cache {
        None
    } else {
        match CacheStore::new(&args.database) {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!("Cache unavailable, continuing without it: {}", err);
                None
            }
        }
    };

    let github = GitHubClient::new(&args.username, config.github_token.as_deref())?;

    let stats_config = StatsConfig {
        min_percentage: args.min_percentage,
        max_languages: args.max_languages,
        enable_cache: !args.no_cache,
        cache_expiry_millis: args.cache_expiry_hours * 60 * 60 * 1000,
        include_private: args.include_private,
        use_detailed_stats: args.detailed,
    };

    let service = SkillsService::new(github, cache, &args.username, stats_config);

    tracing::info!("Aggregating language statistics for: {}", args.username);
    let report = service.fetch().await;

    let starred = if args.starred {
        Some(service.starred_projects().await)
    } else {
        None
    };

    output_report(&report, starred.as_deref(), &args)?;

    Ok(())
}

fn output_report(
    report: &SkillsReport,
    starred: Option<&[Repository]>,
    args: &Args,
) -> anyhow::Result<()> {
    let output = match args.format.as_str() {
        "json" => format_json(report, starred)?,
        "markdown" => format_markdown(report, starred, &args.username),
        _ => format_text(report, starred, &args.username),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_json(report: &SkillsReport, starred: Option<&[Repository]>) -> anyhow::Result<String> {
    let value = match starred {
        Some(starred) => serde_json::json!({
            "languages": report.languages,
            "stats": report.stats,
            "error": report.error,
            "starred": starred,
        }),
        None => serde_json::to_value(report)?,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

fn format_text(report: &SkillsReport, starred: Option<&[Repository]>, username: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== Skills: {} ===\n\n", username));

    if let Some(ref error) = report.error {
        output.push_str(&format!("Live data unavailable: {}\n", error));
    }

    let total_languages = report.languages.len();
    for group in group_by_category(&report.languages) {
        output.push_str(&format!(
            "{} ({}% of codebase)\n",
            group.category, group.total_percentage
        ));
        for lang in &group.languages {
            let bytes = lang
                .bytes
                .map(|b| format!(", {} bytes", b))
                .unwrap_or_default();
            output.push_str(&format!(
                "  - {}: {}% usage{} (level {}/100)\n",
                lang.display_name,
                lang.percentage,
                bytes,
                skill_level(lang.percentage, total_languages)
            ));
        }
        output.push('\n');
    }

    if let Some(stats) = &report.stats {
        output.push_str("GitHub Statistics:\n");
        output.push_str(&format!("  Public repos: {}\n", stats.public_repos));
        output.push_str(&format!("  Total stars:  {}\n", stats.total_stars));
        output.push_str(&format!("  Total forks:  {}\n", stats.total_forks));
        output.push_str(&format!("  Followers:    {}\n", stats.followers));
        output.push_str(&format!("  Following:    {}\n", stats.following));
        output.push_str(&format!(
            "  Member since: {}\n",
            stats.created_at.format("%Y-%m-%d")
        ));
    }

    if let Some(starred) = starred {
        output.push_str("\nStarred Repositories:\n");
        if starred.is_empty() {
            output.push_str("  (none available)\n");
        }
        for repo in starred {
            output.push_str(&format!(
                "  - {} ({} stars)\n",
                repo.full_name, repo.stargazers_count
            ));
        }
    }

    output
}

fn format_markdown(
    report: &SkillsReport,
    starred: Option<&[Repository]>,
    username: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Skills: {}\n\n", username));

    if let Some(ref error) = report.error {
        output.push_str(&format!("> Live data unavailable: {}\n\n", error));
    }

    let total_languages = report.languages.len();
    for group in group_by_category(&report.languages) {
        output.push_str(&format!("## {}\n\n", group.category));
        output.push_str("| Language | Usage | Level | Color |\n");
        output.push_str("|----------|-------|-------|-------|\n");
        for lang in &group.languages {
            output.push_str(&format!(
                "| {} | {}% | {}/100 | `{}` |\n",
                lang.display_name,
                lang.percentage,
                skill_level(lang.percentage, total_languages),
                lang.color
            ));
        }
        output.push('\n');
    }

    if let Some(stats) = &report.stats {
        output.push_str("## GitHub Statistics\n\n");
        output.push_str("| Metric | Value |\n|--------|-------|\n");
        output.push_str(&format!("| Public Repos | {} |\n", stats.public_repos));
        output.push_str(&format!("| Total Stars | {} |\n", stats.total_stars));
        output.push_str(&format!("| Total Forks | {} |\n", stats.total_forks));
        output.push_str(&format!("| Followers | {} |\n", stats.followers));
        output.push_str(&format!("| Following | {} |\n", stats.following));
        output.push_str(&format!(
            "| Member Since | {} |\n",
            stats.created_at.format("%Y-%m-%d")
        ));
        output.push('\n');
    }

    if let Some(starred) = starred {
        output.push_str("## Starred Repositories\n\n");
        for repo in starred {
            let description = repo.description.as_deref().unwrap_or("");
            output.push_str(&format!(
                "- **{}** ({} stars) {}\n",
                repo.full_name, repo.stargazers_count, description
            ));
        }
        if starred.is_empty() {
            output.push_str("_None available._\n");
        }
    }

    output
}
