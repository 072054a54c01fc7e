pub mod adapters;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::summarizer::HttpSummarizer;
pub use core::{
    lifecycle::LifecycleManager, report::ReportAggregator, store::EntityStore,
    summary::SummaryCache,
};
pub use domain::model::{
    Litter, LitterUpdate, Mother, Offspring, OffspringState, OffspringUpdate, PerformanceMetrics,
    Report, Sex, SummaryPayload, SummaryRequest,
};
pub use domain::ports::{ConfigProvider, Summarizer};
pub use utils::error::{LitterbookError, Result};
