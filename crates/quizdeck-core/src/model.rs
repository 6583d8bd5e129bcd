//! Core data model types for quizdeck.
//!
//! These are the types every other module works with: questions, their
//! options, and the bank a session is drawn from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key of the "true" option in a true/false question.
pub const TRUE_KEY: &str = "O";
/// Key of the "false" option in a true/false question.
pub const FALSE_KEY: &str = "X";

/// A single answer choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Option key (e.g. "A", or "O"/"X" for true/false).
    pub key: String,
    /// Display text.
    pub text: String,
}

impl QuizOption {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// A parsed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 1-based position of the source row this question came from.
    pub id: u32,
    /// Question text.
    pub text: String,
    /// Answer choices in display order.
    pub options: Vec<QuizOption>,
    /// Key of the correct option.
    pub answer: String,
}

impl Question {
    /// Look up an option by key.
    pub fn option(&self, key: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.key == key)
    }

    /// The option whose key matches the answer, if the question is gradable.
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.option(&self.answer)
    }

    /// Whether this is an O/X question.
    pub fn is_true_false(&self) -> bool {
        self.options.len() == 2
            && self.options[0].key == TRUE_KEY
            && self.options[1].key == FALSE_KEY
    }

    /// Text shown for an option: `"A. text"`, or the bare text for O/X questions.
    pub fn display_label(&self, option: &QuizOption) -> String {
        if self.is_true_false() {
            option.text.clone()
        } else {
            format!("{}. {}", option.key, option.text)
        }
    }
}

/// Which column layout a bank was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// One column per option (`選項A`..`選項E`).
    MultipleChoice,
    /// O/X answers.
    TrueFalse,
    /// Options embedded in the question text as `(A)...(B)...`.
    Embedded,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::MultipleChoice => write!(f, "multiple_choice"),
            SourceFormat::TrueFalse => write!(f, "true_false"),
            SourceFormat::Embedded => write!(f, "embedded"),
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiple_choice" | "standard" => Ok(SourceFormat::MultipleChoice),
            "true_false" | "ox" => Ok(SourceFormat::TrueFalse),
            "embedded" => Ok(SourceFormat::Embedded),
            other => Err(format!("unknown source format: {other}")),
        }
    }
}

/// The full, unshuffled question list parsed from one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Name of the source (usually the file name).
    pub source_name: String,
    /// Detected layout.
    pub format: SourceFormat,
    /// Questions in source order.
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tf_question() -> Question {
        Question {
            id: 1,
            text: "地球是圓的".into(),
            options: vec![QuizOption::new("O", "O"), QuizOption::new("X", "X")],
            answer: "O".into(),
        }
    }

    #[test]
    fn true_false_detection_and_labels() {
        let q = tf_question();
        assert!(q.is_true_false());
        assert_eq!(q.display_label(&q.options[0]), "O");

        let mc = Question {
            id: 2,
            text: "1+1".into(),
            options: vec![QuizOption::new("A", "2"), QuizOption::new("B", "3")],
            answer: "A".into(),
        };
        assert!(!mc.is_true_false());
        assert_eq!(mc.display_label(&mc.options[1]), "B. 3");
    }

    #[test]
    fn correct_option_lookup() {
        let mut q = tf_question();
        assert_eq!(q.correct_option().map(|o| o.key.as_str()), Some("O"));
        q.answer = "Z".into();
        assert!(q.correct_option().is_none());
    }

    #[test]
    fn source_format_display_and_parse() {
        assert_eq!(SourceFormat::TrueFalse.to_string(), "true_false");
        assert_eq!(
            "standard".parse::<SourceFormat>().unwrap(),
            SourceFormat::MultipleChoice
        );
        assert!("xlsx".parse::<SourceFormat>().is_err());
    }

    #[test]
    fn question_serde_shape() {
        let json = serde_json::to_value(tf_question()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["options"][1]["key"], "X");
        assert_eq!(json["answer"], "O");
    }
}
