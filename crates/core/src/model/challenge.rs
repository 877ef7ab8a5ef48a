use serde::{Deserialize, Serialize};

/// What the player is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    Synonym,
    Antonym,
    Usage,
    /// Pick the word that completes a sentence.
    FillBlank,
    /// Combine tiles into an accepted word.
    Forge,
    Unscramble,
}

impl ChallengeKind {
    /// Free-form kinds are judged without regard to case or surrounding space.
    #[must_use]
    pub fn is_free_form(self) -> bool {
        matches!(self, ChallengeKind::Forge | ChallengeKind::Unscramble)
    }
}

/// A single question handed to the player. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub title: String,
    pub kind: ChallengeKind,
    pub prompt: String,
    /// Empty for free-text challenges.
    pub options: Vec<String>,
    pub correct_answer: String,
    pub hints: Vec<String>,
}

impl Challenge {
    #[must_use]
    pub fn new(
        kind: ChallengeKind,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            title: String::new(),
            kind,
            prompt: prompt.into(),
            options,
            correct_answer: correct_answer.into(),
            hints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        if self.kind.is_free_form() {
            answer.trim().eq_ignore_ascii_case(self.correct_answer.trim())
        } else {
            answer == self.correct_answer
        }
    }

    /// Resolve a 1-based option number to its text.
    #[must_use]
    pub fn option(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.options.get(idx))
            .map(String::as_str)
    }
}
