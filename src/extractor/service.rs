//! End-to-end extraction: fetch, reduce, prompt, invoke, parse.

use crate::extractor::config::ExtractorConfig;
use crate::extractor::error::{ExtractError, Result};
use crate::extractor::model::{ChatModelClient, CompletionClient};
use crate::extractor::{parser, prompt, reducer};
use crate::models::{ExtractedProperty, ScrapeOutcome};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates one extraction call per URL.
///
/// Stateless across calls: no retries, no caching, no rate limiting. The
/// two network hops (page fetch, model call) run sequentially.
pub struct ExtractionService {
    client: Client,
    model: Arc<dyn CompletionClient>,
    config: ExtractorConfig,
}

impl ExtractionService {
    /// Create a service backed by the OpenAI-compatible model client
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let model = Arc::new(ChatModelClient::new(&config)?);
        Self::with_model(config, model)
    }

    /// Create a service with an injected completion backend
    pub fn with_model(config: ExtractorConfig, model: Arc<dyn CompletionClient>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .map_err(ExtractError::ClientBuild)?;

        Ok(Self {
            client,
            model,
            config,
        })
    }

    /// Extract candidate records from a URL, never failing the caller.
    ///
    /// This is the only contract external code depends on; errors collapse
    /// into a `ScrapeOutcome` with a human-readable message.
    pub async fn scrape_url(&self, url: &str) -> ScrapeOutcome {
        match self.extract(url).await {
            Ok(properties) => ScrapeOutcome::ok(properties),
            Err(error) => {
                warn!("Extraction failed for '{}': {}", url, error);
                ScrapeOutcome::failed(error.to_string())
            }
        }
    }

    /// Typed pipeline behind `scrape_url`; the HTTP handler uses this to
    /// map error variants to status codes.
    pub async fn extract(&self, url: &str) -> Result<Vec<ExtractedProperty>> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ExtractError::InvalidUrl);
        }

        info!("Starting extraction for {}", url);

        let html = self.fetch_html(url).await?;
        debug!("Downloaded {} bytes of HTML", html.len());

        let reduced = reducer::reduce(&html, self.config.max_document_chars);
        let content = reducer::truncate_chars(&reduced, self.config.max_content_chars);
        debug!("Reduced content to {} characters", content.chars().count());

        let prompt = prompt::build_prompt(&content, self.config.max_records);
        let completion = self.model.complete(&prompt).await?;

        let properties = parser::parse_response(&completion, url);
        info!("Extracted {} candidate records from {}", properties.len(), url);

        Ok(properties)
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ExtractError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Target page returned status: {}", status);
            return Err(ExtractError::FetchStatus {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| ExtractError::Fetch {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::parser::FALLBACK_NAME;
    use async_trait::async_trait;
    use mockito::Server;
    use std::sync::Mutex;

    /// Scripted completion backend that records the prompts it receives.
    struct ScriptedModel {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: text.to_string(),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedModel {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn service_with(model: Arc<ScriptedModel>) -> ExtractionService {
        ExtractionService::with_model(ExtractorConfig::default(), model).unwrap()
    }

    const PAGE: &str = "<html><body><main>\
        <h1>Fazenda Boa Vista</h1><p>Cavalgadas e trilhas na serra.</p>\
        <h1>Sítio do Vale</h1><p>Café colonial aos domingos.</p>\
        </main></body></html>";

    const TWO_RECORDS: &str = r#"[
        {"name": "Fazenda Boa Vista", "activities": ["Cavalgada"]},
        {"name": "Sítio do Vale", "hours": "Domingos, 9h às 17h"}
    ]"#;

    #[tokio::test]
    async fn successful_extraction_returns_normalized_records() {
        let mut server = Server::new_async().await;
        let page = server
            .mock("GET", "/fazendas")
            .with_status(200)
            .with_body(PAGE)
            .expect(1)
            .create_async()
            .await;

        let model = ScriptedModel::replying(TWO_RECORDS);
        let service = service_with(model.clone());

        let outcome = service
            .scrape_url(&format!("{}/fazendas", server.url()))
            .await;

        assert!(outcome.success);
        let properties = outcome.properties.unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].name, "Fazenda Boa Vista");
        assert_eq!(properties[1].hours, "Domingos, 9h às 17h");

        // The prompt carried the reduced page content
        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Cavalgadas e trilhas"));

        page.assert_async().await;
    }

    #[tokio::test]
    async fn blank_url_is_rejected_before_any_network_call() {
        let model = ScriptedModel::replying("[]");
        let service = service_with(model.clone());

        for url in ["", "   "] {
            let outcome = service.scrape_url(url).await;
            assert!(!outcome.success);
            assert!(outcome.error.unwrap().contains("URL"));
        }

        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn forbidden_fetch_aborts_without_model_call() {
        let mut server = Server::new_async().await;
        let page = server
            .mock("GET", "/fazendas")
            .with_status(403)
            .create_async()
            .await;

        let model = ScriptedModel::replying("[]");
        let service = service_with(model.clone());

        let outcome = service
            .scrape_url(&format!("{}/fazendas", server.url()))
            .await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("403"));
        assert_eq!(model.call_count(), 0);

        page.assert_async().await;
    }

    #[tokio::test]
    async fn unparseable_model_output_degrades_to_fallback_record() {
        let mut server = Server::new_async().await;
        let _page = server
            .mock("GET", "/fazendas")
            .with_status(200)
            .with_body(PAGE)
            .create_async()
            .await;

        let model = ScriptedModel::replying("I cannot process this request.");
        let service = service_with(model);

        let url = format!("{}/fazendas", server.url());
        let outcome = service.scrape_url(&url).await;

        // Degraded output is still a success: one actionable record
        assert!(outcome.success);
        let properties = outcome.properties.unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].name, FALLBACK_NAME);
        assert_eq!(properties[0].contact.website, url);
    }

    #[tokio::test]
    async fn oversized_pages_are_bounded_before_prompting() {
        let mut server = Server::new_async().await;
        let huge = format!(
            "<html><body><main>{}</main></body></html>",
            "conteúdo ".repeat(10_000)
        );
        let _page = server
            .mock("GET", "/fazendas")
            .with_status(200)
            .with_body(huge)
            .create_async()
            .await;

        let model = ScriptedModel::replying("[]");
        let service = service_with(model.clone());

        let outcome = service
            .scrape_url(&format!("{}/fazendas", server.url()))
            .await;
        assert!(outcome.success);

        let prompts = model.prompts.lock().unwrap();
        let budget = ExtractorConfig::default().max_content_chars;
        // Instruction block is small; the whole prompt stays well under
        // the content budget plus a fixed overhead.
        assert!(prompts[0].chars().count() < budget + 2_000);
    }
}
