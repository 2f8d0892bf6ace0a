//! The in-memory catalog.

use std::collections::HashMap;

use quizbot_core::rng::DeterministicRng;
use tracing::warn;

use crate::error::CatalogError;
use crate::text::normalize_whitespace;

/// One question with its canonical answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEntry {
    question: String,
    answer: String,
}

impl QuizEntry {
    /// Creates an entry. The question is whitespace-normalised because it is
    /// the lookup key.
    #[must_use]
    pub fn new(question: impl AsRef<str>, answer: impl Into<String>) -> Self {
        Self {
            question: normalize_whitespace(question.as_ref()),
            answer: answer.into(),
        }
    }

    /// The normalised question text, which doubles as the entry's lookup key.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The canonical answer text.
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// Immutable, non-empty set of quiz entries with unique question texts.
///
/// Entries keep their source order. When a question appears more than once
/// the later answer replaces the earlier one in place.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<QuizEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from entries.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` if `entries` yields nothing.
    pub fn from_entries(entries: impl IntoIterator<Item = QuizEntry>) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for entry in entries {
            if let Some(&position) = catalog.index.get(entry.question()) {
                warn!(question = entry.question(), "duplicate question, keeping the later answer");
                catalog.entries[position] = entry;
            } else {
                catalog
                    .index
                    .insert(entry.question.clone(), catalog.entries.len());
                catalog.entries.push(entry);
            }
        }
        if catalog.entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(catalog)
    }

    /// Number of entries (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in source order.
    #[must_use]
    pub fn entries(&self) -> &[QuizEntry] {
        &self.entries
    }

    /// Looks up the answer for `question`, ignoring differences in
    /// whitespace.
    #[must_use]
    pub fn get(&self, question: &str) -> Option<&str> {
        self.position(question)
            .map(|position| self.entries[position].answer())
    }

    /// Returns `true` if `question` is one of the catalog's keys, ignoring
    /// differences in whitespace.
    #[must_use]
    pub fn contains(&self, question: &str) -> bool {
        self.position(question).is_some()
    }

    fn position(&self, question: &str) -> Option<usize> {
        self.index
            .get(question)
            .or_else(|| self.index.get(normalize_whitespace(question).as_str()))
            .copied()
    }

    /// Picks an entry uniformly at random. Repeats are possible.
    pub fn pick(&self, rng: &mut dyn DeterministicRng) -> &QuizEntry {
        &self.entries[rng.next_index(self.entries.len())]
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use quizbot_test_support::{MockRng, SequenceRng};

    use super::*;

    fn two_entry_catalog() -> Catalog {
        Catalog::from_entries([
            QuizEntry::new("2+2=?", "4"),
            QuizEntry::new("Capital of France?", "Paris"),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_entries_rejects_empty_input() {
        let result = Catalog::from_entries(Vec::new());

        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn test_get_returns_answer_for_known_question() {
        let catalog = two_entry_catalog();

        assert_eq!(catalog.get("2+2=?"), Some("4"));
        assert_eq!(catalog.get("unknown"), None);
    }

    #[test]
    fn test_get_ignores_whitespace_differences() {
        let catalog = two_entry_catalog();

        assert_eq!(catalog.get("2+2=? "), Some("4"));
        assert_eq!(catalog.get("  Capital   of\nFrance? "), Some("Paris"));
        assert!(catalog.contains("2+2=?\t"));
    }

    #[test]
    fn test_entry_question_is_normalised() {
        let entry = QuizEntry::new(" Capital  of France? ", "Paris");

        assert_eq!(entry.question(), "Capital of France?");
    }

    #[test]
    fn test_duplicate_question_keeps_later_answer_and_position() {
        let catalog = Catalog::from_entries([
            QuizEntry::new("q1", "old"),
            QuizEntry::new("q2", "a2"),
            QuizEntry::new("q1", "new"),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("q1"), Some("new"));
        assert_eq!(catalog.entries()[0].answer(), "new");
    }

    #[test]
    fn test_pick_uses_rng_index() {
        let catalog = two_entry_catalog();

        assert_eq!(catalog.pick(&mut MockRng).question(), "2+2=?");
        assert_eq!(
            catalog.pick(&mut SequenceRng::new(vec![1])).question(),
            "Capital of France?"
        );
    }

    proptest! {
        #[test]
        fn prop_pick_always_returns_a_catalog_question(
            questions in proptest::collection::hash_set("[a-z]{1,8}", 1..20),
            draws in proptest::collection::vec(any::<u32>(), 1..30),
        ) {
            let catalog = Catalog::from_entries(
                questions.iter().map(|q| QuizEntry::new(q.clone(), format!("answer to {q}"))),
            )
            .unwrap();
            let mut rng = SequenceRng::new(draws.clone());

            for _ in 0..draws.len() {
                let entry = catalog.pick(&mut rng);
                prop_assert!(catalog.contains(entry.question()));
            }
        }
    }
}
