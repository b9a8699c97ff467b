use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::config::MarketConfig;
use crate::data::types::{DailyBar, MarketSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unexpected response status: {status} at {url}")]
    Status { status: u16, url: String },

    #[error("Chart data unexpected or missing field: {0}")]
    Data(String),
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Option<ChartNode>,
}

#[derive(Debug, Deserialize)]
struct ChartNode {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<MetaNode>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct MetaNode {
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Daily-bar client for the Yahoo chart endpoint
pub struct ChartClient {
    client: Client,
    config: MarketConfig,
}

impl ChartClient {
    pub fn new(config: MarketConfig, user_agent: &str) -> Self {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// Fetch the recent daily bars for the configured symbol
    pub async fn fetch_bars(&self) -> Result<Vec<DailyBar>, MarketDataError> {
        let mut url = Url::parse(&self.config.chart_base_url)?;
        url.path_segments_mut()
            .map_err(|_| MarketDataError::Data("chart base URL cannot take a path".into()))?
            .pop_if_empty()
            .push(&self.config.symbol);
        url.query_pairs_mut()
            .append_pair("range", &self.config.range)
            .append_pair("interval", &self.config.interval);

        info!("Fetching {} daily bars for {}", self.config.range, self.config.symbol);

        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(MarketDataError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        decode_bars(&body)
    }

    /// Fetch and summarize; `Ok(None)` means the series came back empty
    pub async fn fetch_snapshot(&self) -> Result<Option<MarketSnapshot>, MarketDataError> {
        let bars = self.fetch_bars().await?;
        if bars.is_empty() {
            warn!("No bars returned for {}", self.config.symbol);
        }
        Ok(MarketSnapshot::from_bars(&bars))
    }
}

fn decode_bars(body: &str) -> Result<Vec<DailyBar>, MarketDataError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| MarketDataError::Data(format!("json parse: {e}")))?;

    let chart = envelope
        .chart
        .ok_or_else(|| MarketDataError::Data("missing chart".into()))?;

    if let Some(error) = chart.error {
        return Err(MarketDataError::Data(format!(
            "chart error: {} - {}",
            error.code, error.description
        )));
    }

    let Some(result) = chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };
    let gmtoffset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let field = |v: &[Option<f64>]| v.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close)) = (
            field(quote.open.as_slice()),
            field(quote.high.as_slice()),
            field(quote.low.as_slice()),
            field(quote.close.as_slice()),
        ) else {
            continue;
        };

        let Some(local) = DateTime::from_timestamp(ts + gmtoffset, 0) else {
            continue;
        };

        bars.push(DailyBar {
            date: local.date_naive(),
            open,
            high,
            low,
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }

    Ok(bars)
}
