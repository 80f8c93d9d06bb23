//! Scripted conversation templates.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DatasetError;

/// Who speaks a template line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One line of a scripted conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(alias = "role")]
    pub speaker: Speaker,
    #[serde(alias = "content")]
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }

    pub fn is_assistant(&self) -> bool {
        self.speaker == Speaker::Assistant
    }
}

/// A pre-authored conversation plus the conditions it points towards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTemplate {
    #[serde(alias = "conversation")]
    pub turns: Vec<Turn>,
    #[serde(default, alias = "possible_conditions", alias = "possibleConditions")]
    pub candidate_conditions: Vec<String>,
}

impl ConversationTemplate {
    pub fn new(turns: Vec<Turn>, candidate_conditions: Vec<String>) -> Self {
        Self {
            turns,
            candidate_conditions,
        }
    }

    /// The first user line, used to score the template against an opening message.
    pub fn opening_exemplar(&self) -> Option<&Turn> {
        self.turns.iter().find(|t| t.is_user())
    }

    /// Index of the first assistant turn at or after `from`.
    pub fn next_assistant_index(&self, from: usize) -> Option<usize> {
        self.turns
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, t)| t.is_assistant())
            .map(|(i, _)| i)
    }

    fn validate(&self) -> Result<(), String> {
        if self.turns.is_empty() {
            return Err("template has no turns".to_string());
        }
        if let Some(pos) = self.turns.iter().position(|t| t.text.trim().is_empty()) {
            return Err(format!("turn {pos} has empty text"));
        }
        Ok(())
    }
}

/// Ordered, read-only collection of templates.
///
/// Templates are reference-counted so sessions can hold on to the one they
/// are bound to without copying it.
#[derive(Debug, Clone, Default)]
pub struct ScriptCorpus {
    templates: Vec<Arc<ConversationTemplate>>,
}

impl ScriptCorpus {
    /// An empty corpus. Template selection never matches against it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(templates: Vec<ConversationTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(Arc::new).collect(),
        }
    }

    /// Parse a JSON array of templates.
    ///
    /// Entries that fail to deserialize or validate are skipped with a
    /// warning; a document that is not an array is an error.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut templates = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            match parse_template(index, value) {
                Ok(template) => templates.push(template),
                Err(e) => warn!(error = %e, "Skipping malformed conversation template"),
            }
        }
        Ok(Self::new(templates))
    }

    /// Load a corpus from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path)?;
        let corpus = Self::from_json_str(&raw)?;
        info!(path = %path.display(), templates = corpus.len(), "Loaded script corpus");
        Ok(corpus)
    }

    pub fn templates(&self) -> &[Arc<ConversationTemplate>] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn parse_template(
    index: usize,
    value: serde_json::Value,
) -> Result<ConversationTemplate, DatasetError> {
    let template: ConversationTemplate =
        serde_json::from_value(value).map_err(|e| DatasetError::Malformed {
            index,
            reason: e.to_string(),
        })?;
    template
        .validate()
        .map_err(|reason| DatasetError::Malformed { index, reason })?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_exemplar_is_first_user_turn() {
        let template = ConversationTemplate::new(
            vec![
                Turn::assistant("What brings you in?"),
                Turn::user("My head hurts"),
                Turn::user("A lot"),
            ],
            vec![],
        );
        assert_eq!(template.opening_exemplar().unwrap().text, "My head hurts");
    }

    #[test]
    fn next_assistant_index_scans_forward() {
        let template = ConversationTemplate::new(
            vec![
                Turn::user("a"),
                Turn::assistant("b"),
                Turn::user("c"),
                Turn::assistant("d"),
            ],
            vec![],
        );
        assert_eq!(template.next_assistant_index(0), Some(1));
        assert_eq!(template.next_assistant_index(2), Some(3));
        assert_eq!(template.next_assistant_index(4), None);
        assert_eq!(template.next_assistant_index(99), None);
    }

    #[test]
    fn parses_legacy_field_names() {
        let corpus = ScriptCorpus::from_json_str(
            r#"[{
                "conversation": [
                    {"role": "user", "text": "I have a cough"},
                    {"role": "assistant", "text": "How long?"}
                ],
                "possible_conditions": ["Common Cold"]
            }]"#,
        )
        .unwrap();
        assert_eq!(corpus.len(), 1);
        let template = &corpus.templates()[0];
        assert_eq!(template.turns[1].speaker, Speaker::Assistant);
        assert_eq!(template.candidate_conditions, vec!["Common Cold".to_string()]);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let corpus = ScriptCorpus::from_json_str(
            r#"[
                {"turns": [{"speaker": "doctor", "text": "hm"}]},
                {"turns": []},
                {"turns": [{"speaker": "user", "text": "   "}]},
                "not an object",
                {"turns": [{"speaker": "user", "text": "fever"}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(corpus.len(), 1);
        assert!(corpus.templates()[0].candidate_conditions.is_empty());
    }

    #[test]
    fn non_array_document_is_an_error() {
        assert!(matches!(
            ScriptCorpus::from_json_str(r#"{"turns": []}"#),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScriptCorpus::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
