//! Greeting detection and canned greeting replies.

use std::sync::Arc;

use rand::Rng;

use super::text::normalize;
use crate::dataset::GuidelineTable;

/// Phrases that mark a message as small talk.
pub const GREETING_PHRASES: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "hiya",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
    "howdy",
    "how are you",
    "whats up",
];

/// Replies sent when a greeting is detected.
pub const GREETING_REPLIES: &[&str] = &[
    "Hello! I'm here to help you understand your symptoms. What are you experiencing today?",
    "Hi there! Tell me how you're feeling and I'll ask a few questions.",
    "Hey! Describe your symptoms and we'll go through them together.",
    "Good to hear from you. What symptoms are bothering you right now?",
];

/// Source of randomness for picking a greeting reply.
pub trait ReplyPicker: Send + Sync {
    /// Return an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform picker backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl ReplyPicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same index (wrapped into range).
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl ReplyPicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0 % len
    }
}

/// Decides whether a message is a greeting rather than a symptom report.
pub struct GreetingClassifier {
    guidelines: Arc<GuidelineTable>,
    picker: Arc<dyn ReplyPicker>,
}

impl GreetingClassifier {
    pub fn new(guidelines: Arc<GuidelineTable>, picker: Arc<dyn ReplyPicker>) -> Self {
        Self { guidelines, picker }
    }

    /// A greeting phrase is present and no guideline label is.
    ///
    /// The label check keeps "hi, I have a cough" on the symptom path.
    pub fn is_greeting(&self, text: &str) -> bool {
        let normalized = normalize(text);
        GREETING_PHRASES.iter().any(|p| normalized.contains(p))
            && !self.guidelines.mentions_any_label(&normalized)
    }

    pub fn reply(&self) -> &'static str {
        GREETING_REPLIES[self.picker.pick(GREETING_REPLIES.len())]
    }
}
