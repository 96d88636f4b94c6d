//! LLM insights infrastructure.
//!
//! A report is rendered into a prompt ([`prompt`]), sent through an
//! [`LlmClient`], and the reply decoded into
//! [`UserMetricsWithInsights`] ([`insights`]).

pub mod insights;
mod openai;
pub mod prompt;

pub use insights::{
    parse_insights, AggregatedMetric, AggregatedMetricsWithInsight, OverallMetricsWithInsight,
    UserMetricsWithInsights,
};
pub use openai::OpenAiClient;
pub use prompt::build_prompt;

use crate::error::Result;
use crate::types::UserMetrics;

/// LLM completion interface.
pub trait LlmClient: Send + Sync {
    /// Send `prompt` and return the model's text reply.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Ask the model for insights on a report.
pub fn get_insights(
    client: &dyn LlmClient,
    metrics: &UserMetrics,
) -> Result<UserMetricsWithInsights> {
    let prompt = build_prompt(metrics);
    tracing::debug!(prompt_chars = prompt.len(), "Requesting insights");

    let raw = client.complete(&prompt)?;
    parse_insights(&raw)
}
