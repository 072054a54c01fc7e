use crate::domain::ports::ConfigProvider;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "litterbook")]
#[command(about = "Breeding-event tracking and litter performance reporting")]
pub struct CliConfig {
    /// Chat-completions endpoint of the summarization service.
    #[arg(long, default_value = "https://api.openai.com/v1/chat/completions")]
    pub summarizer_endpoint: String,

    /// Model name passed to the summarization service.
    #[arg(long, default_value = "gpt-4o-mini")]
    pub summarizer_model: String,

    /// Summarization request timeout; a timeout counts as a transport failure.
    #[arg(long, default_value = "30")]
    pub summarizer_timeout_secs: u64,

    #[arg(long, help = "Register unknown mothers on the fly when recording litters")]
    pub auto_register_mothers: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn summarizer_endpoint(&self) -> &str {
        &self.summarizer_endpoint
    }

    fn summarizer_model(&self) -> &str {
        &self.summarizer_model
    }

    fn summarizer_timeout_secs(&self) -> u64 {
        self.summarizer_timeout_secs
    }

    fn auto_register_mothers(&self) -> bool {
        self.auto_register_mothers
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("summarizer_endpoint", &self.summarizer_endpoint)?;
        validate_non_empty_string("summarizer_model", &self.summarizer_model)?;
        validate_positive_number("summarizer_timeout_secs", self.summarizer_timeout_secs, 1)?;
        Ok(())
    }
}
