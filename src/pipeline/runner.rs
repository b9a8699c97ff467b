use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::config::{Config, EnvConfig};
use crate::content::gemini::GenerationError;
use crate::content::generator::ContentGenerator;
use crate::content::types::ContentDraft;
use crate::data::market::{ChartClient, MarketDataError};
use crate::data::news::NewsScraper;
use crate::pipeline::mode::{select_mode, Mode, NEWS_TOPIC};
use crate::publishing::wordpress::{PublishResult, WordPressClient};

/// Why a run stopped before anything was sent to the blog
#[derive(Debug, thiserror::Error)]
pub enum AbortReason {
    #[error("No market data returned")]
    NoMarketData,

    #[error("Failed to fetch market data: {0}")]
    MarketFetch(#[from] MarketDataError),

    #[error("Failed to generate content: {0}")]
    Generation(#[from] GenerationError),

    #[error("Generated draft has an empty title or body")]
    EmptyDraft,
}

#[derive(Debug)]
pub enum RunOutcome {
    Published { link: Option<String> },
    DryRun(ContentDraft),
    PublishFailed { detail: String },
    Aborted(AbortReason),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Published { .. } | RunOutcome::DryRun(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Published { .. } => "published",
            RunOutcome::DryRun(_) => "dry_run",
            RunOutcome::PublishFailed { .. } => "publish_failed",
            RunOutcome::Aborted(_) => "aborted",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            RunOutcome::Published { link } => link.clone().unwrap_or_default(),
            RunOutcome::DryRun(draft) => draft.title.clone(),
            RunOutcome::PublishFailed { detail } => detail.clone(),
            RunOutcome::Aborted(reason) => reason.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub date: NaiveDate,
    pub mode: Mode,
    pub outcome: RunOutcome,
}

/// One pass: select mode, collect data, generate, publish.
/// Every stage consumes the previous stage's output; nothing flows back.
pub struct DailyPostPipeline {
    chart: ChartClient,
    news: NewsScraper,
    generator: ContentGenerator,
    publisher: WordPressClient,
    display_name: String,
    dry_run: bool,
}

impl DailyPostPipeline {
    pub fn new(config: &Config, env: &EnvConfig) -> Self {
        Self {
            chart: ChartClient::new(config.market.clone(), &config.news.user_agent),
            news: NewsScraper::new(config.news.clone()),
            generator: ContentGenerator::new(config.generator.clone(), env.gemini_api_key.clone()),
            publisher: WordPressClient::new(config.publisher.clone(), env),
            display_name: config.market.display_name.clone(),
            dry_run: config.system.dry_run,
        }
    }

    pub async fn run(&self, today: NaiveDate) -> RunReport {
        let mode = select_mode(today);
        info!("Run date {} ({}), mode: {}", today, today.format("%A"), mode);

        let outcome = self.run_mode(mode, today).await;
        match &outcome {
            RunOutcome::Aborted(reason) => error!("Run aborted: {}", reason),
            RunOutcome::PublishFailed { detail } => error!("Publishing failed: {}", detail),
            RunOutcome::DryRun(_) | RunOutcome::Published { .. } => {}
        }

        RunReport { date: today, mode, outcome }
    }

    async fn run_mode(&self, mode: Mode, today: NaiveDate) -> RunOutcome {
        let (topic, context) = match self.collect(mode).await {
            Ok(collected) => collected,
            Err(reason) => return RunOutcome::Aborted(reason),
        };

        let draft = match self.generator.generate(&topic, &context, today).await {
            Ok(draft) => draft,
            Err(e) => return RunOutcome::Aborted(e.into()),
        };

        if !draft.is_publishable() {
            return RunOutcome::Aborted(AbortReason::EmptyDraft);
        }

        if self.dry_run {
            info!(
                "Dry run: not publishing {:?} (status would be {})",
                draft.title,
                self.publisher.status().as_str()
            );
            info!("{}", draft.body);
            return RunOutcome::DryRun(draft);
        }

        match self.publisher.publish(&draft).await {
            PublishResult::Published { link } => RunOutcome::Published { link },
            PublishResult::Failed { detail } => RunOutcome::PublishFailed { detail },
        }
    }

    /// Topic and data context for the generator
    async fn collect(&self, mode: Mode) -> Result<(String, String), AbortReason> {
        match mode {
            Mode::News => {
                let digest = self.news.fetch_digest().await;
                Ok((NEWS_TOPIC.to_string(), digest.to_context()))
            }
            Mode::Market => {
                let Some(snapshot) = self.chart.fetch_snapshot().await? else {
                    warn!("Market series was empty, nothing to write about");
                    return Err(AbortReason::NoMarketData);
                };
                info!(
                    "Snapshot {}: close {} ({:+} / {:+}%)",
                    snapshot.date, snapshot.close, snapshot.change, snapshot.change_percent
                );
                Ok((snapshot.topic(&self.display_name), snapshot.to_context()))
            }
        }
    }
}
