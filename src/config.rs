use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub dry_run: bool,
    /// IANA zone used to decide "today" for the weekday rule
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_chart_base_url")]
    pub chart_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_page_url")]
    pub page_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Tried in order; the first strategy matching any container wins
    #[serde(default = "default_selectors")]
    pub selectors: Vec<SelectorStrategy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectorStrategy {
    pub container: String,
    pub headline: String,
    #[serde(default = "default_link_selector")]
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_min_words")]
    pub min_words: u32,
    #[serde(default = "default_max_words")]
    pub max_words: u32,
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublisherConfig {
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default = "default_posts_path")]
    pub posts_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Publish,
    Draft,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub csv_logging: bool,
    #[serde(default = "default_csv_log_path")]
    pub csv_log_path: String,
}

fn default_timezone() -> String { "Asia/Seoul".to_string() }
fn default_symbol() -> String { "^IXIC".to_string() }
fn default_display_name() -> String { "Nasdaq".to_string() }
fn default_range() -> String { "5d".to_string() }
fn default_interval() -> String { "1d".to_string() }
fn default_chart_base_url() -> String { "https://query1.finance.yahoo.com/v8/finance/chart/".to_string() }
fn default_page_url() -> String { "https://www.google.com/finance".to_string() }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}
fn default_max_items() -> usize { 5 }
fn default_link_selector() -> String { "a".to_string() }
fn default_selectors() -> Vec<SelectorStrategy> {
    vec![
        SelectorStrategy {
            container: "div.yY3Lee".to_string(),
            headline: "div.Yfwt5".to_string(),
            link: default_link_selector(),
        },
        SelectorStrategy {
            container: "div.F2KAFc".to_string(),
            headline: "div.Yfwt5".to_string(),
            link: default_link_selector(),
        },
    ]
}
fn default_api_base_url() -> String { "https://generativelanguage.googleapis.com".to_string() }
fn default_model() -> String { "gemini-flash-latest".to_string() }
fn default_language() -> String { "Korean (Hangul)".to_string() }
fn default_tone() -> String { "Professional yet engaging".to_string() }
fn default_min_words() -> u32 { 500 }
fn default_max_words() -> u32 { 800 }
fn default_fallback_title() -> String { "Market Update".to_string() }
fn default_posts_path() -> String { "/wp-json/wp/v2/posts".to_string() }
fn default_csv_log_path() -> String { "runs.csv".to_string() }

impl Default for SystemConfig {
    fn default() -> Self {
        Self { dry_run: false, timezone: default_timezone() }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            display_name: default_display_name(),
            range: default_range(),
            interval: default_interval(),
            chart_base_url: default_chart_base_url(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
            user_agent: default_user_agent(),
            max_items: default_max_items(),
            selectors: default_selectors(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            language: default_language(),
            tone: default_tone(),
            min_words: default_min_words(),
            max_words: default_max_words(),
            fallback_title: default_fallback_title(),
        }
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self { status: PostStatus::default(), posts_path: default_posts_path() }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self { csv_logging: false, csv_log_path: default_csv_log_path() }
    }
}

/// Secrets read from the environment (and `.env`). Absence is checked by the
/// component that needs the value, not here.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub wp_url: Option<String>,
    pub wp_username: Option<String>,
    pub wp_app_password: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    /// Load from `path`, falling back to built-in defaults when the file is absent
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.timezone()?;
        Ok(config)
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.system
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid timezone {:?}: {}", self.system.timezone, e))
    }
}

impl EnvConfig {
    pub fn load() -> Self {
        dotenv::dotenv().ok();

        Self {
            wp_url: non_empty_var("WP_URL"),
            wp_username: non_empty_var("WP_USERNAME"),
            wp_app_password: non_empty_var("WP_APP_PASSWORD"),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert!(!config.system.dry_run);
        assert_eq!(config.market.symbol, "^IXIC");
        assert_eq!(config.news.max_items, 5);
        assert_eq!(config.news.selectors.len(), 2);
        assert_eq!(config.news.selectors[0].container, "div.yY3Lee");
        assert_eq!(config.generator.min_words, 500);
        assert_eq!(config.publisher.status, PostStatus::Publish);
        assert_eq!(config.timezone().unwrap(), chrono_tz::Asia::Seoul);
    }

    #[test]
    fn test_partial_file_overrides() {
        let config = Config::parse(
            r#"
            [system]
            dry_run = true
            timezone = "UTC"

            [publisher]
            status = "draft"

            [[news.selectors]]
            container = "article"
            headline = "h3"
            "#,
        )
        .unwrap();

        assert!(config.system.dry_run);
        assert_eq!(config.timezone().unwrap(), chrono_tz::UTC);
        assert_eq!(config.publisher.status, PostStatus::Draft);
        assert_eq!(config.publisher.status.as_str(), "draft");
        assert_eq!(
            config.news.selectors,
            vec![SelectorStrategy {
                container: "article".to_string(),
                headline: "h3".to_string(),
                link: "a".to_string(),
            }]
        );
        // Untouched sections keep their defaults
        assert_eq!(config.generator.model, "gemini-flash-latest");
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let err = Config::parse("[system]\ntimezone = \"Mars/Olympus\"").unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default("/nonexistent/daily-market-blog.toml").unwrap();
        assert_eq!(config.market.display_name, "Nasdaq");
    }
}
