//! Runs each user message through the fixed classifier
//! pipeline and owns the session store.
//!
//! Stage order never changes:
//! 1. greeting (answers small talk, never touches the session)
//! 2. template binding (only while the session is unbound)
//! 3. relevance gate (only for sessions bound before this message)
//! 4. dialogue step

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::greeting::{GreetingClassifier, ReplyPicker};
use super::lookup::{GuidelineLookup, GuidelineReply};
use super::relevance::{REPROMPT_MESSAGE, RelevanceGate};
use super::selector::TemplateSelector;
use super::stepper::DialogueStepper;
use crate::dataset::{GuidelineTable, ScriptCorpus};
use crate::error::IntakeError;
use crate::store::{Session, SessionSnapshot, SessionStore};

/// Sent when an opening message matches no script.
pub const CLARIFICATION_MESSAGE: &str = "I'm not sure I understand your symptoms yet. \
     Could you describe what you're feeling in a little more detail?";

/// Engine response for one user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReply {
    pub assistant_message: String,
    pub done: bool,
    pub possible_conditions: Vec<String>,
}

impl TurnReply {
    fn new(message: impl Into<String>, done: bool, session: &Session) -> Self {
        Self {
            assistant_message: message.into(),
            done,
            possible_conditions: session.candidate_conditions().to_vec(),
        }
    }
}

/// Result of one pipeline stage.
enum Stage {
    /// Stop here and answer with this reply.
    Respond(TurnReply),
    /// Hand the message to the next stage.
    Continue,
}

/// Coordinates the classifiers, the stepper, and session storage.
pub struct IntakeEngine {
    store: Arc<dyn SessionStore>,
    corpus: Arc<ScriptCorpus>,
    guidelines: Arc<GuidelineTable>,
    greeting: GreetingClassifier,
    selector: TemplateSelector,
    gate: RelevanceGate,
    stepper: DialogueStepper,
    lookup: GuidelineLookup,
}

impl IntakeEngine {
    pub fn new(
        corpus: Arc<ScriptCorpus>,
        guidelines: Arc<GuidelineTable>,
        store: Arc<dyn SessionStore>,
        picker: Arc<dyn ReplyPicker>,
    ) -> Self {
        Self {
            greeting: GreetingClassifier::new(Arc::clone(&guidelines), picker),
            selector: TemplateSelector::new(Arc::clone(&corpus)),
            gate: RelevanceGate,
            stepper: DialogueStepper,
            lookup: GuidelineLookup::new(Arc::clone(&guidelines)),
            store,
            corpus,
            guidelines,
        }
    }

    /// Start a new, unbound conversation.
    pub async fn create_session(&self) -> String {
        self.store.create().await
    }

    /// Process one user message for `session_id`.
    ///
    /// The session stays locked for the whole call, so concurrent messages for
    /// the same session are applied one after another.
    pub async fn advance(&self, session_id: &str, message: &str) -> Result<TurnReply, IntakeError> {
        if session_id.trim().is_empty() {
            return Err(IntakeError::MissingInput { field: "session_id" });
        }
        if message.trim().is_empty() {
            return Err(IntakeError::MissingInput { field: "message" });
        }

        let mut session = self.store.checkout(session_id).await?;
        session.touch();
        let was_bound = session.is_bound();

        if let Stage::Respond(reply) = self.greeting_stage(&session, message) {
            return Ok(reply);
        }
        if let Stage::Respond(reply) = self.binding_stage(&mut session, message) {
            return Ok(reply);
        }
        if was_bound {
            if let Stage::Respond(reply) = self.relevance_stage(&session, message) {
                return Ok(reply);
            }
        }
        Ok(self.step_stage(&mut session))
    }

    fn greeting_stage(&self, session: &Session, message: &str) -> Stage {
        if !self.greeting.is_greeting(message) {
            return Stage::Continue;
        }
        debug!(session_id = %session.id(), "Greeting detected");
        Stage::Respond(TurnReply::new(self.greeting.reply(), false, session))
    }

    fn binding_stage(&self, session: &mut Session, message: &str) -> Stage {
        if session.is_bound() {
            return Stage::Continue;
        }
        match self.selector.select(message) {
            Some(matched) => {
                session.bind(matched.template);
                info!(
                    session_id = %session.id(),
                    template = matched.index,
                    score = matched.score,
                    "Session bound to conversation template"
                );
                Stage::Continue
            }
            None => {
                info!(session_id = %session.id(), "No template matched opening message");
                Stage::Respond(TurnReply::new(CLARIFICATION_MESSAGE, false, session))
            }
        }
    }

    fn relevance_stage(&self, session: &Session, message: &str) -> Stage {
        let expected = session
            .bound_template()
            .and_then(|t| t.turns.get(session.cursor()));
        let verdict = self.gate.evaluate(message, expected);
        if verdict.is_relevant() {
            return Stage::Continue;
        }
        info!(
            session_id = %session.id(),
            cursor = session.cursor(),
            overlap = verdict.overlap,
            words = verdict.meaningful_words,
            "Reply rejected as off-topic"
        );
        Stage::Respond(TurnReply::new(REPROMPT_MESSAGE, false, session))
    }

    fn step_stage(&self, session: &mut Session) -> TurnReply {
        let outcome = self.stepper.step(session);
        TurnReply::new(outcome.message, outcome.done, session)
    }

    /// Resolve a symptom label to regional advice. Independent of sessions.
    pub fn lookup_guideline(&self, symptom: &str) -> Result<GuidelineReply, IntakeError> {
        self.lookup.lookup(symptom)
    }

    pub fn guideline_labels(&self) -> Vec<String> {
        self.lookup.labels()
    }

    pub async fn session_snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        self.store.snapshot(session_id).await
    }

    pub async fn session_count(&self) -> usize {
        self.store.len().await
    }

    pub fn template_count(&self) -> usize {
        self.corpus.len()
    }

    pub fn guideline_count(&self) -> usize {
        self.guidelines.len()
    }
}
