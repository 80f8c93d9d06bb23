//! Read-only datasets the intake engine runs against.
//!
//! Both datasets are parsed and validated once at startup and never mutated.

pub mod corpus;
pub mod guidelines;

pub use corpus::{ConversationTemplate, ScriptCorpus, Speaker, Turn};
pub use guidelines::{GuidelineEntry, GuidelineTable};
