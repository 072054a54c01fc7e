use crate::core::store::EntityStore;
use crate::domain::model::{PerformanceMetrics, Report};
use crate::utils::error::{LitterbookError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

/// Sentinel printed in place of a weaning rate when a mother has no
/// recorded offspring in the range.
pub const WEANING_RATE_NA: &str = "N/A";

/// Computes performance metrics over a mother's litters and appends the
/// formatted result to a named report.
///
/// Reads never mutate lifecycle state. The whole generation (metric reads,
/// report creation, conditional append) runs under one store write guard,
/// so two concurrent generations of the same entry cannot both append.
pub struct ReportAggregator {
    store: Arc<EntityStore>,
}

impl ReportAggregator {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    /// Generates a performance entry for `mother_id` over litters born in
    /// `[start, end]` and appends it to the report `report_name`, creating
    /// the report on first use. The append is idempotent: a verbatim
    /// duplicate of an existing entry is skipped. Returns the report's full
    /// entry list.
    ///
    /// Appending a genuinely new entry drops the report's cached summary,
    /// since the summary no longer reflects the entry list.
    pub async fn generate_report(
        &self,
        mother_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        report_name: &str,
    ) -> Result<Vec<String>> {
        let mut state = self.store.write().await;

        if !state.mothers.contains_key(mother_id) {
            return Err(LitterbookError::not_found("mother", mother_id));
        }

        let litter_ids: HashSet<&str> = state
            .litters
            .values()
            .filter(|l| l.mother_id == mother_id && l.birth_date >= start && l.birth_date <= end)
            .map(|l| l.id.as_str())
            .collect();

        // Actual offspring records, never the reported litter size.
        let mut offspring_count = 0;
        let mut weaned_count = 0;
        for offspring in state.offspring.values() {
            if litter_ids.contains(offspring.litter_id.as_str()) {
                offspring_count += 1;
                if offspring.survived_till_weaning {
                    weaned_count += 1;
                }
            }
        }
        let metrics = PerformanceMetrics {
            litter_count: litter_ids.len(),
            offspring_count,
            weaned_count,
        };

        let entry = format_entry(mother_id, start, end, &metrics);
        let report = state
            .reports
            .entry(report_name.to_string())
            .or_insert_with(|| Report {
                name: report_name.to_string(),
                ..Default::default()
            });

        if report.entries.iter().any(|e| e == &entry) {
            tracing::debug!(report_name, "Entry already present, skipping append");
        } else {
            report.entries.push(entry);
            report.summary.clear();
            tracing::info!(
                report_name,
                mother_id,
                litters = metrics.litter_count,
                offspring = metrics.offspring_count,
                "Appended report entry"
            );
        }

        Ok(report.entries.clone())
    }

    pub async fn rename_report(&self, old_name: &str, new_name: &str) -> Result<()> {
        let mut state = self.store.write().await;

        if !state.reports.contains_key(old_name) {
            return Err(LitterbookError::not_found("report", old_name));
        }
        if state.reports.contains_key(new_name) {
            return Err(LitterbookError::already_exists("report", new_name));
        }

        let mut report = state
            .reports
            .remove(old_name)
            .ok_or_else(|| LitterbookError::not_found("report", old_name))?;
        report.name = new_name.to_string();
        state.reports.insert(new_name.to_string(), report);
        tracing::debug!(old_name, new_name, "Renamed report");
        Ok(())
    }

    /// Removes a report entirely, cached summary included.
    pub async fn delete_report(&self, name: &str) -> Result<()> {
        let mut state = self.store.write().await;
        if state.reports.remove(name).is_none() {
            return Err(LitterbookError::not_found("report", name));
        }
        tracing::debug!(name, "Deleted report");
        Ok(())
    }
}

fn format_entry(
    mother_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    metrics: &PerformanceMetrics,
) -> String {
    let rate = match metrics.weaning_rate() {
        Some(rate) => format!("{:.2}%", rate),
        None => WEANING_RATE_NA.to_string(),
    };
    format!(
        "Mother {} ({} to {}): litters={}, offspring={}, weaning rate={}",
        mother_id, start, end, metrics.litter_count, metrics.offspring_count, rate
    )
}
