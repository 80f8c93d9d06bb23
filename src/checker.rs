//! Legacy symptom checker returning fixed results for the
//! `/api/check-symptoms` endpoint.
//!
//! It does not look at the submitted text beyond requiring it; real intake
//! goes through the scripted dialogue.

use serde::Serialize;
use tracing::info;

use crate::error::IntakeError;

/// One candidate condition with a confidence percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionResult {
    pub condition: String,
    pub description: String,
    pub confidence: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub results: Vec<ConditionResult>,
}

const MOCK_RESULTS: &[(&str, &str, u8)] = &[
    ("Common Cold", "A viral infection of your nose and throat.", 85),
    ("Flu (Influenza)", "Cough, sore throat, tiredness, mild fever.", 70),
    ("Strep Throat", "Bacterial infection with sore throat and fever.", 55),
];

/// Return the fixed candidate list for any non-empty symptom text.
pub fn check_symptoms(symptoms: &str) -> Result<CheckResponse, IntakeError> {
    if symptoms.trim().is_empty() {
        return Err(IntakeError::MissingInput { field: "symptoms" });
    }
    info!(symptoms = %symptoms, "Received symptoms");
    Ok(CheckResponse {
        results: MOCK_RESULTS
            .iter()
            .map(|(condition, description, confidence)| ConditionResult {
                condition: (*condition).to_string(),
                description: (*description).to_string(),
                confidence: *confidence,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_are_sorted_by_confidence() {
        let resp = check_symptoms("sore throat and fever").unwrap();
        assert_eq!(resp.results.len(), 3);
        assert_eq!(resp.results[0].condition, "Common Cold");
        assert!(resp.results.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn empty_symptoms_are_rejected() {
        assert_eq!(
            check_symptoms("").unwrap_err(),
            IntakeError::MissingInput { field: "symptoms" }
        );
    }
}
