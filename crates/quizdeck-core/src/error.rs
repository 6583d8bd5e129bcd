//! Quiz error types.
//!
//! Every fallible core operation returns one of these instead of reporting
//! through a side channel, so the presentation layer decides what to show.
//! A failed operation never leaves the session partially updated.

use thiserror::Error;

/// Why a question source could not be turned into a bank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The source contained no rows at all.
    #[error("no questions found in the source")]
    NoRows,

    /// The first row's columns match none of the known layouts.
    #[error("unrecognized column layout (columns: {columns})")]
    UnrecognizedLayout { columns: String },
}

/// Errors surfaced by the quiz core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The question source has an unknown schema; the user must supply another file.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// A session was started without any parsed questions.
    #[error("cannot start a quiz from an empty question bank")]
    EmptyBank,

    /// The saved snapshot is missing, corrupt, or unusable.
    #[error("cannot restore saved session: {0}")]
    Restore(String),

    /// An answer was selected for a question that is not part of the session.
    #[error("question {question_id} is not part of the current session")]
    InvalidSelection { question_id: u32 },

    /// Answers are frozen once the session is submitted.
    #[error("the session has already been submitted")]
    AlreadySubmitted,

    /// Scoring was requested before submission.
    #[error("the session has not been submitted yet")]
    NotSubmitted,

    /// The operation needs an active session.
    #[error("no quiz session is in progress")]
    NoSession,
}

impl QuizError {
    /// Returns `true` for errors the presentation layer should drop silently.
    pub fn is_ignorable(&self) -> bool {
        matches!(
            self,
            QuizError::InvalidSelection { .. } | QuizError::AlreadySubmitted
        )
    }
}
