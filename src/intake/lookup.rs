//! Symptom label → care guideline resolution.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::dataset::GuidelineTable;
use crate::error::IntakeError;

/// Returned when no label matches.
pub const NO_GUIDANCE_MESSAGE: &str = "No specific guidance is available for that symptom. \
     If you're worried, please contact your local health center.";

/// Response body for a guideline lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuidelineReply {
    pub guideline: String,
}

/// Resolves a free-text symptom against the guideline table.
pub struct GuidelineLookup {
    table: Arc<GuidelineTable>,
}

impl GuidelineLookup {
    pub fn new(table: Arc<GuidelineTable>) -> Self {
        Self { table }
    }

    /// Exact label first, then the first label contained in the input, then
    /// the fixed fallback. Only an empty input is an error.
    pub fn lookup(&self, symptom: &str) -> Result<GuidelineReply, IntakeError> {
        let query = symptom.trim().to_lowercase();
        if query.is_empty() {
            return Err(IntakeError::MissingInput { field: "symptom" });
        }

        let entries = self.table.entries();
        let matched = entries
            .iter()
            .find(|e| e.label == query)
            .or_else(|| entries.iter().find(|e| query.contains(e.label.as_str())));

        let guideline = match matched {
            Some(entry) => {
                debug!(label = %entry.label, "Resolved guideline");
                entry.advisory.clone()
            }
            None => {
                debug!(query = %query, "No guideline matched");
                NO_GUIDANCE_MESSAGE.to_string()
            }
        };
        Ok(GuidelineReply { guideline })
    }

    /// All labels, in table order.
    pub fn labels(&self) -> Vec<String> {
        self.table.labels().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> GuidelineLookup {
        GuidelineLookup::new(Arc::new(GuidelineTable::builtin()))
    }

    fn advisory(label: &str) -> String {
        GuidelineTable::builtin()
            .entries()
            .iter()
            .find(|e| e.label == label)
            .unwrap()
            .advisory
            .clone()
    }

    #[test]
    fn exact_match_ignores_case() {
        let reply = lookup().lookup("  Sore Throat ").unwrap();
        assert_eq!(reply.guideline, advisory("sore throat"));
    }

    #[test]
    fn substring_match_finds_label_in_sentence() {
        let reply = lookup().lookup("I have a really bad cold").unwrap();
        assert_eq!(reply.guideline, advisory("cold"));
    }

    #[test]
    fn exact_match_wins_over_earlier_substring() {
        let reply = lookup().lookup("throat pain").unwrap();
        assert_eq!(reply.guideline, advisory("throat pain"));
        // "sore throat" precedes "throat pain" in table order.
        let reply = lookup().lookup("sore throat pain").unwrap();
        assert_eq!(reply.guideline, advisory("sore throat"));
    }

    #[test]
    fn unknown_symptom_gets_fallback() {
        let reply = lookup().lookup("xyz").unwrap();
        assert_eq!(reply.guideline, NO_GUIDANCE_MESSAGE);
    }

    #[test]
    fn empty_symptom_is_missing_input() {
        assert_eq!(
            lookup().lookup("   ").unwrap_err(),
            IntakeError::MissingInput { field: "symptom" }
        );
    }

    #[test]
    fn labels_follow_table_order() {
        let labels = lookup().labels();
        assert_eq!(labels.first().map(String::as_str), Some("cold"));
    }
}
