use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::{EnvConfig, PostStatus, PublisherConfig};
use crate::content::types::ContentDraft;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishResult {
    Published { link: Option<String> },
    Failed { detail: String },
}

#[derive(Debug, Clone)]
struct Credentials {
    base_url: String,
    username: String,
    app_password: String,
}

#[derive(Debug, Serialize)]
struct CreatePost<'a> {
    title: &'a str,
    content: &'a str,
    status: &'static str,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    #[serde(default)]
    link: Option<String>,
}

/// Creates posts through the WordPress REST API using an application password
pub struct WordPressClient {
    client: Client,
    config: PublisherConfig,
    base_url: Option<String>,
    username: Option<String>,
    app_password: Option<String>,
}

impl WordPressClient {
    pub fn new(config: PublisherConfig, env: &EnvConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            base_url: env.wp_url.clone(),
            username: env.wp_username.clone(),
            app_password: env.wp_app_password.clone(),
        }
    }

    pub fn status(&self) -> PostStatus {
        self.config.status
    }

    fn credentials(&self) -> Result<Credentials, String> {
        let missing: Vec<&str> = [
            ("WP_URL", &self.base_url),
            ("WP_USERNAME", &self.username),
            ("WP_APP_PASSWORD", &self.app_password),
        ]
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| *k)
        .collect();

        match (&self.base_url, &self.username, &self.app_password) {
            (Some(base_url), Some(username), Some(app_password)) => Ok(Credentials {
                base_url: base_url.trim_end_matches('/').to_string(),
                username: username.clone(),
                app_password: app_password.clone(),
            }),
            _ => Err(format!("WordPress credentials missing: {}", missing.join(", "))),
        }
    }

    /// Submit the draft as a new post. Never returns an error: every failure
    /// is reported through `PublishResult::Failed`.
    pub async fn publish(&self, draft: &ContentDraft) -> PublishResult {
        let creds = match self.credentials() {
            Ok(creds) => creds,
            Err(detail) => {
                error!("{}", detail);
                return PublishResult::Failed { detail };
            }
        };

        let url = format!("{}{}", creds.base_url, self.config.posts_path);
        info!("Posting {:?} to {} as {}", draft.title, url, self.config.status.as_str());

        let payload = CreatePost {
            title: &draft.title,
            content: &draft.body,
            status: self.config.status.as_str(),
        };

        let response = match self
            .client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                basic_auth_header(&creds.username, &creds.app_password),
            )
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Error posting to WordPress: {}", e);
                return PublishResult::Failed { detail: e.to_string() };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            error!("Error posting to WordPress: HTTP {}", status);
            error!("Response: {}", body);
            return PublishResult::Failed {
                detail: format!("HTTP {}: {}", status.as_u16(), body),
            };
        }

        let link = serde_json::from_str::<CreatedPost>(&body)
            .ok()
            .and_then(|post| post.link);
        info!("Successfully posted: {}", link.as_deref().unwrap_or("(no link returned)"));

        PublishResult::Published { link }
    }
}

/// `Basic base64(username:password)`
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}
