//! Text generation collaborators.

use async_trait::async_trait;

pub mod fake;
#[cfg(feature = "openai")]
pub mod openai;

pub use fake::FakeGenerator;
#[cfg(feature = "openai")]
pub use openai::OpenAiGenerator;

/// Produces the raw syntax-analysis text for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_syntax_analysis(&self, prompt: &str) -> anyhow::Result<String>;

    fn provider_name(&self) -> &'static str;
}
