use std::time::Duration;

/// Tunable settings for the extraction pipeline
///
/// Everything the pipeline needs is passed in here explicitly; no module
/// below `main` reads environment variables.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// API key for the chat-completion provider
    pub api_key: String,
    /// Full URL of the chat-completion endpoint
    pub endpoint: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Low temperature: this is structured extraction, not open generation
    pub temperature: f32,
    /// Output budget, sized to comfortably fit `max_records` records
    pub max_tokens: u32,
    /// Upper bound on candidate records requested per page
    pub max_records: usize,
    /// Character budget for page content included in the prompt
    pub max_content_chars: usize,
    /// Absolute ceiling on reducer output (characters)
    pub max_document_chars: usize,
    /// Timeout for fetching the target page
    pub fetch_timeout: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 3000,
            max_records: 5,
            max_content_chars: 10_000,
            max_document_chars: 20_000,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl ExtractorConfig {
    /// Build a config from environment variables, for use by `main` only
    ///
    /// `MODEL_API_KEY` is required; `MODEL_ENDPOINT` and `MODEL_NAME`
    /// override the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("MODEL_API_KEY")
            .map_err(|_| anyhow::anyhow!("MODEL_API_KEY is not set"))?;

        let mut config = Self {
            api_key,
            ..Self::default()
        };

        if let Ok(endpoint) = std::env::var("MODEL_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("MODEL_NAME") {
            config.model = model;
        }

        Ok(config)
    }
}
