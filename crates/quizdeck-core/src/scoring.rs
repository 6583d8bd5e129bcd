//! Scoring and review of submitted sessions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::Question;
use crate::session::Session;

/// Shown in place of an answer the user never gave.
pub const UNANSWERED_MARKER: &str = "未作答";
/// Shown when the selected key resolves to no option.
pub const INVALID_OPTION_MARKER: &str = "無效選項";
/// Shown when the question's answer key resolves to no option.
pub const NO_VALID_ANSWER_MARKER: &str = "無有效答案";

/// Qualitative result tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// 90% and above.
    Excellent,
    /// 70% to 89%.
    Good,
    /// 50% to 69%.
    Fair,
    /// Below 50%.
    Encouragement,
}

impl Grade {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Grade::Excellent,
            70..=89 => Grade::Good,
            50..=69 => Grade::Fair,
            _ => Grade::Encouragement,
        }
    }

    /// Message shown with the score.
    pub fn message(&self) -> &'static str {
        match self {
            Grade::Excellent => "太棒了！你真是個天才！",
            Grade::Good => "做得很好！繼續努力！",
            Grade::Fair => "還有進步空間，加油！",
            Grade::Encouragement => "別灰心，再試一次吧！",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Excellent => write!(f, "excellent"),
            Grade::Good => write!(f, "good"),
            Grade::Fair => write!(f, "fair"),
            Grade::Encouragement => write!(f, "encouragement"),
        }
    }
}

/// Totals for a submitted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Questions with no answer (counted in `incorrect` too).
    pub unanswered: usize,
    /// Rounded percentage, 0–100.
    pub percentage: u32,
    pub grade: Grade,
}

/// Percentage of `correct` out of `total`, rounded the way browsers round
/// `correct / total * 100`: the float product plus one half, floored.
///
/// An empty quiz scores 0.
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = correct.min(total) as f64 / total as f64;
    (ratio * 100.0 + 0.5).floor() as u32
}

/// Whether `selected` answers `question` correctly.
///
/// A question whose answer key matches none of its options can never be
/// answered correctly.
pub fn is_correct(question: &Question, selected: Option<&str>) -> bool {
    question.correct_option().is_some() && selected == Some(question.answer.as_str())
}

/// Score a submitted session.
pub fn score(session: &Session) -> Result<ScoreSummary, QuizError> {
    if !session.is_submitted() {
        return Err(QuizError::NotSubmitted);
    }

    let total = session.len();
    let correct = session
        .questions()
        .iter()
        .filter(|q| is_correct(q, session.answer_for(q.id)))
        .count();
    let unanswered = session
        .questions()
        .iter()
        .filter(|q| session.answer_for(q.id).is_none())
        .count();
    let percentage = percentage(correct, total);

    Ok(ScoreSummary {
        total,
        correct,
        incorrect: total - correct,
        unanswered,
        percentage,
        grade: Grade::from_percentage(percentage),
    })
}

/// Per-question breakdown of a submitted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    /// 1-based position within the session.
    pub position: usize,
    pub question_id: u32,
    pub question_text: String,
    /// Selected key, `None` if unanswered.
    pub selected: Option<String>,
    /// Text of the selected option, or a marker.
    pub selected_text: String,
    pub correct_key: String,
    /// Text of the correct option, or a marker.
    pub correct_text: String,
    pub is_correct: bool,
}

impl ReviewItem {
    /// Selected key, or the unanswered marker.
    pub fn selected_display(&self) -> &str {
        self.selected.as_deref().unwrap_or(UNANSWERED_MARKER)
    }
}

/// Build the review for a submitted session.
pub fn review(session: &Session) -> Result<Vec<ReviewItem>, QuizError> {
    if !session.is_submitted() {
        return Err(QuizError::NotSubmitted);
    }

    let items = session
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let selected = session.answer_for(question.id);
            let selected_text = match selected {
                None => UNANSWERED_MARKER.to_string(),
                Some(key) => question
                    .option(key)
                    .map_or_else(|| INVALID_OPTION_MARKER.to_string(), |o| o.text.clone()),
            };
            let correct_text = question
                .correct_option()
                .map_or_else(|| NO_VALID_ANSWER_MARKER.to_string(), |o| o.text.clone());

            ReviewItem {
                position: index + 1,
                question_id: question.id,
                question_text: question.text.clone(),
                selected: selected.map(str::to_string),
                selected_text,
                correct_key: question.answer.clone(),
                correct_text,
                is_correct: is_correct(question, selected),
            }
        })
        .collect();

    Ok(items)
}
