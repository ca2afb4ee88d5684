//! Records and run reporting types

use chrono::{DateTime, Utc};
use devicenames_common::DeviceKey;
use serde::Serialize;
use uuid::Uuid;

/// Row-level issues kept in [`IngestSummary::issues`]; counters keep counting past it.
pub const MAX_RECORDED_ISSUES: usize = 1000;

/// Normalized row ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub key: DeviceKey,
    /// Display name, kept exactly as it appears in the source
    pub marketing_name: String,
}

impl DeviceRecord {
    pub fn retail_branding(&self) -> &str {
        self.key.retail_branding()
    }

    pub fn model(&self) -> &str {
        self.key.model()
    }
}

/// What happened to a single data row.
///
/// `line` is 1-based and counts the header as line 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    Inserted { line: u64 },
    /// Key already stored, by this run or an earlier one; nothing was written
    AlreadyPresent { line: u64 },
    SkippedMalformed { line: u64, reason: String },
    SkippedShortRecord { line: u64, fields: usize },
    SkippedInsertError { line: u64, reason: String },
}

impl RowOutcome {
    pub fn line(&self) -> u64 {
        match self {
            RowOutcome::Inserted { line }
            | RowOutcome::AlreadyPresent { line }
            | RowOutcome::SkippedMalformed { line, .. }
            | RowOutcome::SkippedShortRecord { line, .. }
            | RowOutcome::SkippedInsertError { line, .. } => *line,
        }
    }

    /// Whether the row reached the insert statement without error
    pub fn is_stored(&self) -> bool {
        matches!(self, RowOutcome::Inserted { .. } | RowOutcome::AlreadyPresent { .. })
    }
}

/// Aggregated result of one ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// License banner skipped ahead of the header, if any
    pub license: Option<String>,
    pub rows_read: u64,
    pub inserted: u64,
    pub already_present: u64,
    pub skipped_malformed: u64,
    pub skipped_short: u64,
    pub insert_errors: u64,
    /// Skipped rows, capped at [`MAX_RECORDED_ISSUES`]
    pub issues: Vec<RowOutcome>,
}

impl IngestSummary {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            license: None,
            rows_read: 0,
            inserted: 0,
            already_present: 0,
            skipped_malformed: 0,
            skipped_short: 0,
            insert_errors: 0,
            issues: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: RowOutcome) {
        self.rows_read += 1;
        match outcome {
            RowOutcome::Inserted { .. } => self.inserted += 1,
            RowOutcome::AlreadyPresent { .. } => self.already_present += 1,
            RowOutcome::SkippedMalformed { .. } => self.skipped_malformed += 1,
            RowOutcome::SkippedShortRecord { .. } => self.skipped_short += 1,
            RowOutcome::SkippedInsertError { .. } => self.insert_errors += 1,
        }

        if !outcome.is_stored() && self.issues.len() < MAX_RECORDED_ISSUES {
            self.issues.push(outcome);
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Rows inserted or ignored as duplicates
    pub fn stored(&self) -> u64 {
        self.inserted + self.already_present
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_malformed + self.skipped_short + self.insert_errors
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = IngestSummary::start();
        summary.record(RowOutcome::Inserted { line: 2 });
        summary.record(RowOutcome::AlreadyPresent { line: 3 });
        summary.record(RowOutcome::SkippedShortRecord { line: 4, fields: 1 });
        summary.record(RowOutcome::SkippedInsertError {
            line: 5,
            reason: "constraint failed".to_string(),
        });

        assert_eq!(summary.rows_read, 4);
        assert_eq!(summary.stored(), 2);
        assert_eq!(summary.skipped(), 2);
        assert_eq!(summary.issues.len(), 2);
        assert_eq!(summary.issues[0].line(), 4);
    }

    #[test]
    fn test_issues_are_capped() {
        let mut summary = IngestSummary::start();
        for line in 0..(MAX_RECORDED_ISSUES as u64 + 10) {
            summary.record(RowOutcome::SkippedMalformed {
                line,
                reason: "bad".to_string(),
            });
        }
        assert_eq!(summary.issues.len(), MAX_RECORDED_ISSUES);
        assert_eq!(summary.skipped_malformed, MAX_RECORDED_ISSUES as u64 + 10);
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_value(RowOutcome::SkippedShortRecord { line: 7, fields: 2 })
            .unwrap();
        assert_eq!(json["outcome"], "skipped_short_record");
        assert_eq!(json["line"], 7);
    }
}
