//! Opening-message → template matching.

use std::sync::Arc;

use tracing::debug;

use crate::dataset::{ConversationTemplate, ScriptCorpus};

/// The best-scoring template for an opening message.
#[derive(Debug, Clone)]
pub struct TemplateMatch {
    pub template: Arc<ConversationTemplate>,
    /// Position of the template in the corpus.
    pub index: usize,
    /// Number of exemplar words found in the message.
    pub score: usize,
}

/// Scores every template's opening exemplar against a message.
pub struct TemplateSelector {
    corpus: Arc<ScriptCorpus>,
}

impl TemplateSelector {
    pub fn new(corpus: Arc<ScriptCorpus>) -> Self {
        Self { corpus }
    }

    /// Pick the template whose exemplar words appear most often in `text`.
    ///
    /// Words are matched as substrings of the lowercased message, so "ache"
    /// counts inside "headache". Ties keep the earliest template. Returns
    /// `None` when nothing scores above zero.
    pub fn select(&self, text: &str) -> Option<TemplateMatch> {
        let input = text.to_lowercase();
        let mut best: Option<TemplateMatch> = None;

        for (index, template) in self.corpus.templates().iter().enumerate() {
            let Some(exemplar) = template.opening_exemplar() else {
                continue;
            };
            let score = score_exemplar(&exemplar.text, &input);
            let best_score = best.as_ref().map_or(0, |m| m.score);
            if score > best_score {
                best = Some(TemplateMatch {
                    template: Arc::clone(template),
                    index,
                    score,
                });
            }
        }

        match &best {
            Some(m) => debug!(template = m.index, score = m.score, "Selected conversation template"),
            None => debug!(templates = self.corpus.len(), "No conversation template matched"),
        }
        best
    }
}

fn score_exemplar(exemplar: &str, lowered_input: &str) -> usize {
    exemplar
        .to_lowercase()
        .split_whitespace()
        .filter(|word| lowered_input.contains(word))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Turn;

    fn template(opening: &str, conditions: &[&str]) -> ConversationTemplate {
        ConversationTemplate::new(
            vec![Turn::user(opening), Turn::assistant("Tell me more.")],
            conditions.iter().map(|c| c.to_string()).collect(),
        )
    }

    fn selector(templates: Vec<ConversationTemplate>) -> TemplateSelector {
        TemplateSelector::new(Arc::new(ScriptCorpus::new(templates)))
    }

    #[test]
    fn picks_highest_overlap() {
        let s = selector(vec![
            template("I have a sore throat", &["Strep Throat"]),
            template("I have had a headache since yesterday", &["Migraine"]),
        ]);
        let m = s.select("I have had a headache for two days").unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.template.candidate_conditions, vec!["Migraine".to_string()]);
        assert!(m.score >= 4);
    }

    #[test]
    fn ties_keep_earliest_template() {
        let s = selector(vec![
            template("fever chills", &["A"]),
            template("chills fever", &["B"]),
        ]);
        let m = s.select("fever and chills").unwrap();
        assert_eq!(m.score, 2);
        assert_eq!(m.index, 0);
    }

    #[test]
    fn selection_is_repeatable() {
        let s = selector(vec![
            template("my back hurts", &["Strain"]),
            template("my stomach hurts", &["Gastritis"]),
        ]);
        let first = s.select("stomach hurts after eating").unwrap();
        for _ in 0..5 {
            let again = s.select("stomach hurts after eating").unwrap();
            assert_eq!(again.index, first.index);
            assert!(Arc::ptr_eq(&again.template, &first.template));
        }
    }

    #[test]
    fn words_match_inside_longer_words() {
        let s = selector(vec![template("ache", &[])]);
        assert_eq!(s.select("HEADACHE").unwrap().score, 1);
    }

    #[test]
    fn zero_score_is_no_match() {
        let s = selector(vec![template("sore throat", &[])]);
        assert!(s.select("xyz").is_none());
    }

    #[test]
    fn empty_corpus_is_no_match() {
        let s = TemplateSelector::new(Arc::new(ScriptCorpus::empty()));
        assert!(s.select("I have a headache").is_none());
    }

    #[test]
    fn templates_without_user_turn_are_ignored() {
        let s = selector(vec![ConversationTemplate::new(
            vec![Turn::assistant("headache")],
            vec![],
        )]);
        assert!(s.select("headache").is_none());
    }
}
