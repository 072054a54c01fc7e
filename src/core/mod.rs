pub mod lifecycle;
pub mod report;
pub mod store;
pub mod summary;

pub use crate::domain::model::{
    Litter, LitterUpdate, Mother, Offspring, OffspringState, OffspringUpdate, PerformanceMetrics,
    Report, Sex, SummaryPayload, SummaryRequest,
};
pub use crate::domain::ports::{ConfigProvider, Summarizer};
pub use crate::utils::error::Result;
