//! Symptom intake: scripted multi-turn dialogue driven by lexical rules.
//!
//! A user message runs through a fixed pipeline: greeting detection, template
//! selection for unbound sessions, a relevance gate for bound ones, and finally
//! one step through the bound script. Guideline lookup is a separate entry
//! point that needs no session.

pub mod engine;
pub mod greeting;
pub mod lookup;
pub mod relevance;
pub mod routes;
pub mod selector;
pub mod stepper;
pub mod text;

pub use engine::{CLARIFICATION_MESSAGE, IntakeEngine, TurnReply};
pub use greeting::{FixedPicker, GreetingClassifier, RandomPicker, ReplyPicker};
pub use lookup::{GuidelineLookup, GuidelineReply, NO_GUIDANCE_MESSAGE};
pub use relevance::{REPROMPT_MESSAGE, RelevanceGate, RelevanceVerdict};
pub use routes::{IntakeRouteState, cors_layer, intake_routes};
pub use selector::{TemplateMatch, TemplateSelector};
pub use stepper::{DialogueStepper, StepOutcome, closing_message};
