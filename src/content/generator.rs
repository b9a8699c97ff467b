use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::content::gemini::{GeminiClient, GenerationError};
use crate::content::parser::parse_response;
use crate::content::prompt::build_prompt;
use crate::content::types::ContentDraft;

pub struct ContentGenerator {
    config: GeneratorConfig,
    client: GeminiClient,
}

impl ContentGenerator {
    pub fn new(config: GeneratorConfig, api_key: Option<String>) -> Self {
        let client = GeminiClient::new(config.api_base_url.clone(), config.model.clone(), api_key);
        Self { config, client }
    }

    /// Prompt the model with the topic and data context, then parse its reply
    pub async fn generate(
        &self,
        topic: &str,
        context: &str,
        today: NaiveDate,
    ) -> Result<ContentDraft, GenerationError> {
        info!("Generating content for: {}", topic);

        let prompt = build_prompt(&self.config, today, topic, context);
        let raw = self.client.generate(&prompt).await?;
        let draft = parse_response(&raw, &self.config.fallback_title);

        if draft.title == self.config.fallback_title {
            warn!("Model response had no title marker, using {:?}", draft.title);
        }
        info!("Generated draft {:?} ({} chars)", draft.title, draft.body.len());

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn generator(server: &MockServer, api_key: Option<&str>) -> ContentGenerator {
        ContentGenerator::new(
            GeneratorConfig {
                api_base_url: server.base_url(),
                ..GeneratorConfig::default()
            },
            api_key.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_generate_builds_prompt_and_parses_reply() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-flash-latest:generateContent")
                .body_includes("Topic: Global Financial Market News & Updates")
                .body_includes("- Fed holds (https://x.example/1)");
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "Title: Rates on hold\nContent:\n<p>The Fed held.</p>"}]}}]
            }));
        });

        let draft = generator(&server, Some("k"))
            .generate(
                "Global Financial Market News & Updates",
                "- Fed holds (https://x.example/1)",
                NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            )
            .await
            .unwrap();

        mock.assert();
        assert_eq!(
            draft,
            ContentDraft {
                title: "Rates on hold".to_string(),
                body: "<p>The Fed held.</p>".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unstructured_reply_uses_fallback_title() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "<p>free text</p>"}]}}]
            }));
        });

        let draft = generator(&server, Some("k"))
            .generate("topic", "ctx", NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())
            .await
            .unwrap();

        assert_eq!(draft.title, "Market Update");
        assert_eq!(draft.body, "<p>free text</p>");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let result = generator(&server, None)
            .generate("topic", "ctx", NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())
            .await;

        assert!(matches!(result, Err(GenerationError::MissingCredentials(_))));
        mock.assert_hits(0);
    }
}
