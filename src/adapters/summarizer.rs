use crate::domain::model::{SummaryPayload, SummaryRequest};
use crate::domain::ports::{ConfigProvider, Summarizer};
use crate::utils::error::{LitterbookError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Environment variable holding the summarization service API key.
pub const API_KEY_ENV: &str = "LITTERBOOK_SUMMARIZER_API_KEY";

const SYSTEM_PROMPT: &str = r#"You are a livestock breeding analyst. You receive the entries of a litter performance report and categorize the mothers that appear in them.

Output JSON with exactly these fields:
- highPerformers: array of mother identifiers with clearly strong weaning results
- lowPerformers: array of mother identifiers with clearly weak results
- concerningTrends: array of mother identifiers whose results degrade across entries
- averagePerformers: array of mother identifiers near the report average
- potentialRecordErrors: array of mother identifiers whose entries look like data-entry mistakes
- insights: a short free-text analysis of the report as a whole

Guidelines:
- Base every judgement only on the entries provided
- An entry with weaning rate N/A means no offspring were recorded, not a zero rate
- Respond with JSON only"#;

/// Summarizer backed by an OpenAI-compatible chat-completions endpoint.
///
/// The client timeout doubles as the summarization deadline; a timeout
/// surfaces as an upstream failure like any other transport error.
pub struct HttpSummarizer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpSummarizer {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Builds a summarizer from config, reading the API key from the
    /// environment. Missing credentials are an upstream failure: the
    /// collaborator is unusable, not misconfigured data.
    pub fn from_config(config: &impl ConfigProvider) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            LitterbookError::upstream(format!("missing credentials: {API_KEY_ENV} is not set"))
        })?;
        Self::new(
            config.summarizer_endpoint(),
            config.summarizer_model(),
            api_key,
            Duration::from_secs(config.summarizer_timeout_secs()),
        )
    }

    fn build_prompt(request: &SummaryRequest) -> String {
        let mut entries_text = String::new();
        for (i, entry) in request.entries.iter().enumerate() {
            entries_text.push_str(&format!("{}. {}\n", i + 1, entry));
        }

        format!(
            "Report: {}\nGenerated at: {}\nTarget mothers: {}\n\nEntries:\n{}\nCategorize the mothers and respond with JSON.",
            request.report_name,
            request.generated_at.to_rfc3339(),
            if request.mother_ids.is_empty() {
                "(none)".to_string()
            } else {
                request.mother_ids.join(", ")
            },
            entries_text
        )
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryPayload> {
        let prompt = Self::build_prompt(request);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ],
            "response_format": {"type": "json_object"},
            "temperature": 0.0,
        });

        tracing::debug!(
            endpoint = %self.endpoint,
            report_name = %request.report_name,
            "Calling summarization service"
        );
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LitterbookError::upstream(format!(
                "summarizer returned HTTP {status}"
            )));
        }

        let body_text = response.text().await?;
        let completion: serde_json::Value = serde_json::from_str(&body_text)
            .map_err(|e| LitterbookError::validation(format!("non-JSON summarizer response: {e}")))?;
        let content = completion
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                LitterbookError::validation("summarizer response missing message content")
            })?;

        serde_json::from_str::<SummaryPayload>(content)
            .map_err(|e| LitterbookError::validation(format!("malformed summary payload: {e}")))
    }
}
