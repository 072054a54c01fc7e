use crate::core::store::EntityStore;
use crate::domain::model::{SummaryPayload, SummaryRequest};
use crate::domain::ports::Summarizer;
use crate::utils::error::{LitterbookError, Result};
use chrono::Utc;
use std::sync::Arc;

/// Caches one external summarization per report.
///
/// The collaborator call is the only long-running operation in the core; it
/// runs with no store lock held. A transport or validation failure leaves
/// whatever was cached before untouched.
pub struct SummaryCache<S: Summarizer> {
    store: Arc<EntityStore>,
    summarizer: S,
}

impl<S: Summarizer> SummaryCache<S> {
    pub fn new(store: Arc<EntityStore>, summarizer: S) -> Self {
        Self { store, summarizer }
    }

    /// Returns the cached summary when present, otherwise invokes the
    /// collaborator once and caches the validated result on the report.
    pub async fn get_summary(&self, report_name: &str) -> Result<SummaryPayload> {
        let cached = {
            let state = self.store.read().await;
            let report = state
                .reports
                .get(report_name)
                .ok_or_else(|| LitterbookError::not_found("report", report_name))?;
            if report.summary.is_empty() {
                None
            } else {
                Some(report.summary.clone())
            }
        };

        if let Some(text) = cached {
            tracing::debug!(report_name, "Returning cached summary");
            return serde_json::from_str(&text).map_err(|e| {
                LitterbookError::validation(format!("cached summary is unreadable: {e}"))
            });
        }

        self.refresh(report_name).await
    }

    /// Invokes the collaborator unconditionally and overwrites the cache on
    /// success. On failure the previous cached value, if any, survives.
    pub async fn regenerate_summary(&self, report_name: &str) -> Result<SummaryPayload> {
        if self.store.get_report(report_name).await.is_none() {
            return Err(LitterbookError::not_found("report", report_name));
        }
        self.refresh(report_name).await
    }

    async fn refresh(&self, report_name: &str) -> Result<SummaryPayload> {
        let request = {
            let state = self.store.read().await;
            let report = state
                .reports
                .get(report_name)
                .ok_or_else(|| LitterbookError::not_found("report", report_name))?;
            SummaryRequest {
                report_name: report.name.clone(),
                generated_at: Utc::now(),
                mother_ids: target_mothers(&report.entries),
                entries: report.entries.clone(),
            }
        };

        tracing::info!(
            report_name,
            entries = request.entries.len(),
            mothers = request.mother_ids.len(),
            "Requesting report summary"
        );
        let payload = self.summarizer.summarize(&request).await?;

        let text = serde_json::to_string(&payload)
            .map_err(|e| LitterbookError::validation(format!("summary not serializable: {e}")))?;

        let mut state = self.store.write().await;
        let report = state
            .reports
            .get_mut(report_name)
            .ok_or_else(|| LitterbookError::not_found("report", report_name))?;
        // The entry list may have grown while the collaborator ran; the
        // result is still returned, but caching it would pin a summary of
        // entries the report no longer matches.
        if report.entries == request.entries {
            report.summary = text;
        } else {
            tracing::debug!(
                report_name,
                "Report entries changed during summarization, not caching"
            );
        }
        Ok(payload)
    }
}

/// Pulls the distinct target mother identifiers back out of the formatted
/// entries, in first-seen order. Entries are the only place a report keeps
/// mother information. The identifier runs up to the " (" that opens the
/// date range; nothing after it contains that sequence, so identifiers with
/// whitespace survive (rfind covers ids that contain " (" themselves).
fn target_mothers(entries: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for entry in entries {
        let Some(rest) = entry.strip_prefix("Mother ") else {
            continue;
        };
        let Some(id) = rest.rfind(" (").map(|i| &rest[..i]) else {
            continue;
        };
        if !seen.iter().any(|s| s == id) {
            seen.push(id.to_string());
        }
    }
    seen
}
