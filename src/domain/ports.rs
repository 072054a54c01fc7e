use crate::domain::model::{SummaryPayload, SummaryRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

/// External summarization collaborator. Implementations are expected to be
/// slow (an LLM call); nothing in the core holds a lock across this await.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryPayload>;
}

pub trait ConfigProvider: Send + Sync {
    fn summarizer_endpoint(&self) -> &str;
    fn summarizer_model(&self) -> &str;
    fn summarizer_timeout_secs(&self) -> u64;
    fn auto_register_mothers(&self) -> bool;
}
