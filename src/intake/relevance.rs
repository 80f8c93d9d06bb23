//! Mid-conversation relevance gate.
//!
//! Once a session is bound to a script, every reply passes through this gate
//! before the script advances. Noise gets a reprompt instead of silently
//! consuming a step.

use std::sync::LazyLock;

use regex::Regex;

use super::text::{meaningful_word_set, meaningful_words};
use crate::dataset::Turn;

/// Sent when a reply is judged off-topic.
pub const REPROMPT_MESSAGE: &str =
    "I didn't quite catch that. Could you answer the question above, or describe your symptoms a bit more?";

/// Short replies accepted as a complete "no" answer.
pub const NEGATIVE_REPLIES: &[&str] = &[
    "no",
    "none",
    "nope",
    "nah",
    "not really",
    "nothing",
    "no i dont",
    "no i don't",
    "not at all",
];

/// Words that alone make a reply on-topic.
pub const SYMPTOM_KEYWORDS: &[&str] = &[
    "fever",
    "cough",
    "headache",
    "pain",
    "ache",
    "sore",
    "throat",
    "nausea",
    "vomiting",
    "dizzy",
    "dizziness",
    "fatigue",
    "tired",
    "chills",
    "rash",
    "cold",
    "flu",
    "sneezing",
    "runny",
    "nose",
    "breath",
    "breathing",
    "chest",
    "stomach",
    "diarrhea",
    "weakness",
    "itchy",
    "swelling",
    "congestion",
    "migraine",
];

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(\d+|one|two|three|four|five|six|seven|eight|nine|ten|couple|few|several)\b(\s+(days?|weeks?|months?)\b)?",
    )
    .expect("static regex is valid")
});

/// Why a reply was accepted or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceVerdict {
    /// Expected-turn meaningful words that also appear in the reply.
    pub overlap: usize,
    pub is_valid_negative: bool,
    pub contains_symptom_word: bool,
    pub contains_time: bool,
    /// Distinct meaningful words in the reply.
    pub meaningful_words: usize,
}

impl RelevanceVerdict {
    pub fn is_relevant(&self) -> bool {
        self.overlap > 0
            || self.is_valid_negative
            || self.contains_symptom_word
            || self.contains_time
            || self.meaningful_words >= 2
    }
}

/// Stateless relevance check.
#[derive(Debug, Default, Clone, Copy)]
pub struct RelevanceGate;

impl RelevanceGate {
    /// Judge `reply` against the turn the user is expected to be answering.
    ///
    /// `expected` is `None` when the script has run past its last turn.
    pub fn evaluate(&self, reply: &str, expected: Option<&Turn>) -> RelevanceVerdict {
        let user_words = meaningful_word_set(reply);
        let overlap = expected
            .map(|turn| {
                meaningful_words(&turn.text)
                    .iter()
                    .filter(|w| user_words.contains(*w))
                    .count()
            })
            .unwrap_or(0);

        let lowered = reply.to_lowercase();
        let trimmed = lowered.trim();

        RelevanceVerdict {
            overlap,
            is_valid_negative: NEGATIVE_REPLIES.contains(&trimmed),
            contains_symptom_word: user_words
                .iter()
                .any(|w| SYMPTOM_KEYWORDS.contains(&w.as_str())),
            contains_time: DURATION.is_match(&lowered),
            meaningful_words: user_words.len(),
        }
    }
}
