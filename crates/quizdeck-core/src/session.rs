//! Quiz session state.
//!
//! A [`Session`] is one administration of a quiz: an ordered (possibly
//! shuffled and truncated) copy of the bank, the answers given so far, the
//! current position, and whether it has been submitted. It enforces its own
//! invariants; side effects such as persistence and notifications live in
//! [`crate::runner`].

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{Question, QuestionBank};

/// Lifecycle phase of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    InProgress,
    Submitted,
}

/// One administration of a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    questions: Vec<Question>,
    answers: BTreeMap<u32, String>,
    current_index: usize,
    submitted: bool,
}

impl Session {
    /// Start a session over `questions` in the given order.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        Ok(Self {
            questions,
            answers: BTreeMap::new(),
            current_index: 0,
            submitted: false,
        })
    }

    /// Draw a session from a bank.
    ///
    /// With `0 < random_count < bank.len()` the whole copy is shuffled
    /// (Fisher–Yates) before truncation, so every subset of that size is
    /// equally likely. Any other count uses the full bank in source order.
    pub fn draw<R: Rng + ?Sized>(
        bank: &QuestionBank,
        random_count: usize,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        let mut questions = bank.questions.clone();
        if random_count > 0 && random_count < questions.len() {
            questions.shuffle(rng);
            questions.truncate(random_count);
        }
        Self::new(questions)
    }

    /// Rebuild an unsubmitted session from saved parts.
    ///
    /// Answers for questions outside `questions` are dropped.
    pub fn from_parts(
        questions: Vec<Question>,
        answers: BTreeMap<u32, String>,
        current_index: usize,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Restore("saved session has no questions".into()));
        }
        if current_index >= questions.len() {
            return Err(QuizError::Restore(format!(
                "saved position {} is outside {} question(s)",
                current_index + 1,
                questions.len()
            )));
        }

        let mut session = Self::new(questions)?;
        let before = answers.len();
        session.answers = answers
            .into_iter()
            .filter(|(id, _)| session.contains(*id))
            .collect();
        let dropped = before - session.answers.len();
        if dropped > 0 {
            tracing::warn!("dropped {dropped} saved answer(s) for unknown questions");
        }
        session.current_index = current_index;
        Ok(session)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &BTreeMap<u32, String> {
        &self.answers
    }

    /// The key selected for a question, if any.
    pub fn answer_for(&self, question_id: u32) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn phase(&self) -> Phase {
        if self.submitted {
            Phase::Submitted
        } else {
            Phase::InProgress
        }
    }

    pub fn contains(&self, question_id: u32) -> bool {
        self.questions.iter().any(|q| q.id == question_id)
    }

    /// Record `key` as the answer to `question_id`, replacing any earlier choice.
    pub fn select(&mut self, question_id: u32, key: &str) -> Result<(), QuizError> {
        if self.submitted {
            return Err(QuizError::AlreadySubmitted);
        }
        if !self.contains(question_id) {
            return Err(QuizError::InvalidSelection { question_id });
        }
        self.answers.insert(question_id, key.to_string());
        Ok(())
    }

    /// Jump to `index`. Returns `false` (and changes nothing) when out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.questions.len() {
            return false;
        }
        self.current_index = index;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_index + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current_index.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    /// Freeze the answers. Returns `true` only on the first call.
    pub fn mark_submitted(&mut self) -> bool {
        if self.submitted {
            return false;
        }
        self.submitted = true;
        true
    }
}
