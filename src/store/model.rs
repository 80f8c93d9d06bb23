//! Per-conversation session state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::ConversationTemplate;

/// Where one conversation stands in its script.
///
/// The bound template is shared read-only with the corpus and is set at most
/// once. The cursor only moves forward.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    bound_template: Option<Arc<ConversationTemplate>>,
    cursor: usize,
    candidate_conditions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    /// Messages processed for this session, greetings included.
    pub turns_handled: u64,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            bound_template: None,
            cursor: 0,
            candidate_conditions: Vec::new(),
            created_at: now,
            last_active: now,
            turns_handled: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bound_template(&self) -> Option<&Arc<ConversationTemplate>> {
        self.bound_template.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.bound_template.is_some()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn candidate_conditions(&self) -> &[String] {
        &self.candidate_conditions
    }

    /// Bind the session to `template`, copying its candidate conditions and
    /// resetting the cursor. Returns `false` and changes nothing if the
    /// session is already bound.
    pub fn bind(&mut self, template: Arc<ConversationTemplate>) -> bool {
        if self.bound_template.is_some() {
            return false;
        }
        self.candidate_conditions = template.candidate_conditions.clone();
        self.bound_template = Some(template);
        self.cursor = 0;
        true
    }

    /// Move the cursor to `position`. Backward moves are ignored.
    pub fn advance_cursor(&mut self, position: usize) {
        if position > self.cursor {
            self.cursor = position;
        }
    }

    /// Record that a message was processed.
    pub fn touch(&mut self) {
        self.turns_handled += 1;
        self.last_active = Utc::now();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            bound: self.is_bound(),
            cursor: self.cursor,
            total_turns: self.bound_template.as_ref().map(|t| t.turns.len()),
            possible_conditions: self.candidate_conditions.clone(),
            turns_handled: self.turns_handled,
            created_at: self.created_at,
            last_active: self.last_active,
        }
    }
}

/// Read-only view of a session for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub bound: bool,
    pub cursor: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_turns: Option<usize>,
    pub possible_conditions: Vec<String>,
    pub turns_handled: u64,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}
