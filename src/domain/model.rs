use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Sex of an individual offspring, recorded at birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

/// A registered breeding mother. The identifier is opaque; everything else
/// about the animal lives in the external identity system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mother {
    pub id: String,
}

/// A single birth event for one mother.
///
/// `reported_litter_size` is the user's estimate at recording time. Reporting
/// always counts the individually recorded [`Offspring`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Litter {
    pub id: String,
    pub mother_id: String,
    pub father_id: Option<String>,
    pub birth_date: NaiveDate,
    pub reported_litter_size: u32,
    pub notes: Option<String>,
}

/// An individual member of a litter, tracked for survival to weaning and
/// death. Identifiers are externally supplied (ear tags, chips) and must be
/// globally unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offspring {
    pub id: String,
    pub litter_id: String,
    pub sex: Sex,
    pub is_alive: bool,
    pub survived_till_weaning: bool,
    pub notes: Option<String>,
}

impl Offspring {
    pub fn state(&self) -> OffspringState {
        match (self.is_alive, self.survived_till_weaning) {
            (true, false) => OffspringState::AliveUnweaned,
            (true, true) => OffspringState::AliveWeaned,
            (false, false) => OffspringState::DeadUnweaned,
            (false, true) => OffspringState::DeadWeaned,
        }
    }
}

/// Lifecycle state of an offspring. Both dead states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffspringState {
    AliveUnweaned,
    AliveWeaned,
    DeadUnweaned,
    DeadWeaned,
}

/// A named, append-only log of performance snapshots. `summary` holds the
/// cached summarizer payload as JSON text; empty means no cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub name: String,
    pub entries: Vec<String>,
    pub summary: String,
}

/// Partial update for a litter. `None` means leave the field unchanged; the
/// doubly wrapped options distinguish "unchanged" from "clear the value".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LitterUpdate {
    pub mother_id: Option<String>,
    pub father_id: Option<Option<String>>,
    pub birth_date: Option<NaiveDate>,
    pub reported_litter_size: Option<u32>,
    pub notes: Option<Option<String>>,
}

/// Partial update for an offspring. Lifecycle flags are deliberately absent;
/// they change only through the lifecycle manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OffspringUpdate {
    pub litter_id: Option<String>,
    pub sex: Option<Sex>,
    pub notes: Option<Option<String>>,
}

/// Counts derived from one mother's litters within a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceMetrics {
    pub litter_count: usize,
    pub offspring_count: usize,
    pub weaned_count: usize,
}

impl PerformanceMetrics {
    /// Weaning rate in percent, rounded to two decimals. `None` when there
    /// are no recorded offspring (the "N/A" case).
    pub fn weaning_rate(&self) -> Option<f64> {
        if self.offspring_count == 0 {
            return None;
        }
        let rate = self.weaned_count as f64 / self.offspring_count as f64 * 100.0;
        Some((rate * 100.0).round() / 100.0)
    }
}

/// Everything the summarization collaborator receives about a report.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest {
    pub report_name: String,
    pub generated_at: DateTime<Utc>,
    pub mother_ids: Vec<String>,
    pub entries: Vec<String>,
}

/// Structured analysis returned by the summarization collaborator.
///
/// Deserialization is the structural validation: every field must be present
/// with the right type. Business-level quality of the categorization is the
/// collaborator's problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub high_performers: Vec<String>,
    pub low_performers: Vec<String>,
    pub concerning_trends: Vec<String>,
    pub average_performers: Vec<String>,
    pub potential_record_errors: Vec<String>,
    pub insights: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weaning_rate_rounding() {
        let metrics = PerformanceMetrics {
            litter_count: 1,
            offspring_count: 3,
            weaned_count: 1,
        };
        assert_eq!(metrics.weaning_rate(), Some(33.33));

        let metrics = PerformanceMetrics {
            litter_count: 1,
            offspring_count: 4,
            weaned_count: 2,
        };
        assert_eq!(metrics.weaning_rate(), Some(50.0));

        let metrics = PerformanceMetrics {
            litter_count: 1,
            offspring_count: 3,
            weaned_count: 2,
        };
        assert_eq!(metrics.weaning_rate(), Some(66.67));
    }

    #[test]
    fn test_weaning_rate_not_applicable_without_offspring() {
        let metrics = PerformanceMetrics {
            litter_count: 2,
            offspring_count: 0,
            weaned_count: 0,
        };
        assert_eq!(metrics.weaning_rate(), None);
    }

    #[test]
    fn test_offspring_state_mapping() {
        let mut offspring = Offspring {
            id: "O1".to_string(),
            litter_id: "L1".to_string(),
            sex: Sex::Female,
            is_alive: true,
            survived_till_weaning: false,
            notes: None,
        };
        assert_eq!(offspring.state(), OffspringState::AliveUnweaned);

        offspring.survived_till_weaning = true;
        assert_eq!(offspring.state(), OffspringState::AliveWeaned);

        offspring.is_alive = false;
        assert_eq!(offspring.state(), OffspringState::DeadWeaned);

        offspring.survived_till_weaning = false;
        assert_eq!(offspring.state(), OffspringState::DeadUnweaned);
    }

    #[test]
    fn test_summary_payload_requires_all_fields() {
        let complete = serde_json::json!({
            "highPerformers": ["M1"],
            "lowPerformers": [],
            "concerningTrends": ["M2"],
            "averagePerformers": ["M3"],
            "potentialRecordErrors": [],
            "insights": "M1 is outperforming the herd average."
        });
        assert!(serde_json::from_value::<SummaryPayload>(complete).is_ok());

        let missing_field = serde_json::json!({
            "highPerformers": ["M1"],
            "lowPerformers": [],
            "concerningTrends": [],
            "averagePerformers": [],
            "insights": "no error array"
        });
        assert!(serde_json::from_value::<SummaryPayload>(missing_field).is_err());

        let wrong_type = serde_json::json!({
            "highPerformers": "M1",
            "lowPerformers": [],
            "concerningTrends": [],
            "averagePerformers": [],
            "potentialRecordErrors": [],
            "insights": "array expected"
        });
        assert!(serde_json::from_value::<SummaryPayload>(wrong_type).is_err());
    }
}
