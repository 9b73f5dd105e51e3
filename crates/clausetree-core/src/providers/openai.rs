use async_trait::async_trait;
use serde_json::json;

use super::TextGenerator;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiGenerator {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub client: reqwest::Client,
}

impl OpenAiGenerator {
    pub fn new(model: String, api_key: String, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature,
            max_tokens,
            client: reqwest::Client::new(),
        }
    }

    /// Build from `OPENAI_API_KEY` and optional `OPENAI_BASE_URL`.
    pub fn from_env(model: Option<String>) -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;
        let mut generator = Self::new(
            model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
            0.0,
            4096,
        );
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            generator.base_url = base_url.trim_end_matches('/').to_string();
        }
        Ok(generator)
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate_syntax_analysis(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI chat API error (status {}): {}", status, error_text);
        }

        let json: serde_json::Value = resp.json().await?;

        // A cut-off completion is still returned; the truncation check reports it.
        if json.pointer("/choices/0/finish_reason").and_then(|v| v.as_str()) == Some("length") {
            tracing::warn!(model = %self.model, "completion stopped at max_tokens");
        }

        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("OpenAI API response missing content"))?
            .to_string();

        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
