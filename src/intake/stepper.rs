//! Script progression for a bound session.

use tracing::debug;

use crate::store::Session;

/// What the stepper produced for one accepted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub message: String,
    /// No assistant line remains after this one.
    pub done: bool,
}

/// Walks a session's bound template one assistant line at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogueStepper;

impl DialogueStepper {
    /// Emit the next assistant line and move the cursor past it.
    ///
    /// The cursor marks the turn the user is answering; if that turn is a
    /// scripted user line it is skipped before searching. When the script has
    /// no assistant line left, a closing message naming the candidate
    /// conditions is returned and the cursor stays put.
    pub fn step(&self, session: &mut Session) -> StepOutcome {
        let Some(template) = session.bound_template().cloned() else {
            return StepOutcome {
                message: closing_message(session.candidate_conditions()),
                done: true,
            };
        };

        let mut working = session.cursor();
        if template.turns.get(working).is_some_and(|t| t.is_user()) {
            working += 1;
        }

        match template.next_assistant_index(working) {
            Some(index) => {
                let next_cursor = index + 1;
                session.advance_cursor(next_cursor);
                let done = template.next_assistant_index(next_cursor).is_none();
                debug!(
                    session_id = %session.id(),
                    cursor = next_cursor,
                    done,
                    "Advanced script"
                );
                StepOutcome {
                    message: template.turns[index].text.clone(),
                    done,
                }
            }
            None => {
                debug!(session_id = %session.id(), "Script exhausted, sending closing message");
                StepOutcome {
                    message: closing_message(session.candidate_conditions()),
                    done: true,
                }
            }
        }
    }
}

/// Fallback sent once the script has nothing more to say.
pub fn closing_message(conditions: &[String]) -> String {
    if conditions.is_empty() {
        "Thank you for answering my questions. If your symptoms persist or get worse, please consult a doctor."
            .to_string()
    } else {
        format!(
            "Thank you for answering my questions. Based on what you've told me, this could be related to: {}. \
             If your symptoms persist or get worse, please consult a doctor.",
            conditions.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dataset::{ConversationTemplate, Turn};

    fn bound_session() -> Session {
        let template = ConversationTemplate::new(
            vec![
                Turn::user("I have a headache"),
                Turn::assistant("How long have you had it?"),
                Turn::user("Two days"),
                Turn::assistant("Any nausea?"),
                Turn::user("No"),
            ],
            vec!["Tension headache".to_string(), "Migraine".to_string()],
        );
        let mut session = Session::new("s1");
        session.bind(Arc::new(template));
        session
    }

    #[test]
    fn walks_assistant_lines_in_order() {
        let mut session = bound_session();
        let stepper = DialogueStepper;

        let first = stepper.step(&mut session);
        assert_eq!(first.message, "How long have you had it?");
        assert!(!first.done);
        assert_eq!(session.cursor(), 2);

        let second = stepper.step(&mut session);
        assert_eq!(second.message, "Any nausea?");
        assert!(second.done);
        assert_eq!(session.cursor(), 4);
    }

    #[test]
    fn exhausted_script_closes_with_conditions() {
        let mut session = bound_session();
        let stepper = DialogueStepper;
        stepper.step(&mut session);
        stepper.step(&mut session);

        let closing = stepper.step(&mut session);
        assert!(closing.done);
        assert!(closing.message.contains("Tension headache, Migraine"));
        assert!(closing.message.contains("consult a doctor"));
        assert_eq!(session.cursor(), 4);
    }

    #[test]
    fn assistant_turn_at_cursor_is_emitted_directly() {
        let template = ConversationTemplate::new(
            vec![Turn::assistant("Hello, what's wrong?"), Turn::user("fever")],
            vec![],
        );
        let mut session = Session::new("s2");
        session.bind(Arc::new(template));

        let out = DialogueStepper.step(&mut session);
        assert_eq!(out.message, "Hello, what's wrong?");
        assert!(out.done);
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn unbound_session_gets_generic_closing() {
        let mut session = Session::new("s3");
        let out = DialogueStepper.step(&mut session);
        assert!(out.done);
        assert_eq!(out.message, closing_message(&[]));
    }
}
