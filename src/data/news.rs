use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};
use url::Url;

use crate::config::{NewsConfig, SelectorStrategy};
use crate::data::types::{NewsDigest, NewsItem};

/// Scrapes the configured news page into a short headline digest.
/// Never fails: transport or parse problems degrade to `NewsDigest::Unavailable`.
pub struct NewsScraper {
    client: Client,
    config: NewsConfig,
}

impl NewsScraper {
    pub fn new(config: NewsConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    pub async fn fetch_digest(&self) -> NewsDigest {
        info!("Fetching news from {}", self.config.page_url);

        let html = match self.fetch_page().await {
            Ok(html) => html,
            Err(e) => {
                warn!("Error fetching news: {:#}", e);
                return NewsDigest::Unavailable;
            }
        };

        let page_url = match Url::parse(&self.config.page_url) {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid news page URL {}: {}", self.config.page_url, e);
                return NewsDigest::Unavailable;
            }
        };

        let items = extract_items(&html, &page_url, &self.config.selectors, self.config.max_items);
        if items.is_empty() {
            warn!("No headlines matched any selector strategy, asking for a general overview");
            NewsDigest::Overview
        } else {
            info!("Scraped {} headlines", items.len());
            NewsDigest::Headlines(items)
        }
    }

    async fn fetch_page(&self) -> anyhow::Result<String> {
        let response = self
            .client
            .get(&self.config.page_url)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

/// Try each strategy in order; the first one whose container selector matches
/// anything is used exclusively. Only the first `max` containers are read, and
/// containers without a headline node are skipped.
pub fn extract_items(
    html: &str,
    page_url: &Url,
    strategies: &[SelectorStrategy],
    max: usize,
) -> Vec<NewsItem> {
    let document = Html::parse_document(html);

    for strategy in strategies {
        let (Some(container), Some(headline), Some(link)) = (
            parse_selector(&strategy.container),
            parse_selector(&strategy.headline),
            parse_selector(&strategy.link),
        ) else {
            continue;
        };

        let containers: Vec<_> = document.select(&container).collect();
        if containers.is_empty() {
            continue;
        }

        return containers
            .into_iter()
            .take(max)
            .filter_map(|el| {
                let title = el.select(&headline).next()?.text().collect::<String>();
                let title = title.trim();
                if title.is_empty() {
                    return None;
                }

                let href = el
                    .select(&link)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .unwrap_or("#");

                Some(NewsItem {
                    headline: title.to_string(),
                    link: normalize_link(page_url, href),
                })
            })
            .collect();
    }

    Vec::new()
}

fn parse_selector(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Skipping invalid selector {:?}: {:?}", raw, e);
            None
        }
    }
}

/// `./path` resolves under the page URL, `/path` under the site origin;
/// anything else is returned unchanged.
pub fn normalize_link(page_url: &Url, href: &str) -> String {
    if let Some(rest) = href.strip_prefix("./") {
        format!("{}/{}", page_url.as_str().trim_end_matches('/'), rest)
    } else if href.starts_with('/') && !href.starts_with("//") {
        format!("{}{}", page_url.origin().ascii_serialization(), href)
    } else {
        href.to_string()
    }
}
