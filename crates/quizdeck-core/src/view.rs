//! Render-ready snapshot of a session.
//!
//! The core never draws anything. After each state change it hands the
//! presentation layer a [`SessionView`] holding everything needed to draw
//! the current question, the navigation palette, and the timer.

use serde::Serialize;

use crate::session::{Phase, Session};
use crate::timer::Countdown;

/// How an option should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionStyle {
    Plain,
    /// Chosen, session still in progress.
    Selected,
    /// The correct option, after submission.
    Correct,
    /// Chosen but wrong, after submission.
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub key: String,
    /// `"A. text"`, or bare text for O/X questions.
    pub label: String,
    pub style: OptionStyle,
}

/// One cell of the navigation palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    /// 1-based position.
    pub number: usize,
    pub question_id: u32,
    pub answered: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerView {
    /// Remaining time as `m:ss`.
    pub text: String,
    pub urgent: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: Phase,
    pub question_id: u32,
    pub question_text: String,
    /// 0-based position of the current question.
    pub index: usize,
    pub total: usize,
    pub answered: usize,
    pub options: Vec<OptionView>,
    pub palette: Vec<PaletteEntry>,
    /// `None` when the session is untimed.
    pub timer: Option<TimerView>,
    pub is_first: bool,
    pub is_last: bool,
    /// `(index + 1) / total * 100`.
    pub progress_percent: f64,
}

impl SessionView {
    pub fn build(session: &Session, timer: &Countdown) -> Self {
        let question = session.current_question();
        let selected = session.answer_for(question.id);
        let submitted = session.is_submitted();
        let index = session.current_index();
        let total = session.len();

        let options = question
            .options
            .iter()
            .map(|option| {
                let is_selected = selected == Some(option.key.as_str());
                let style = if submitted {
                    if option.key == question.answer {
                        OptionStyle::Correct
                    } else if is_selected {
                        OptionStyle::Incorrect
                    } else {
                        OptionStyle::Plain
                    }
                } else if is_selected {
                    OptionStyle::Selected
                } else {
                    OptionStyle::Plain
                };
                OptionView {
                    key: option.key.clone(),
                    label: question.display_label(option),
                    style,
                }
            })
            .collect();

        let palette = session
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| PaletteEntry {
                number: i + 1,
                question_id: q.id,
                answered: session.answer_for(q.id).is_some(),
                current: i == index,
            })
            .collect();

        let timer = timer.display().map(|text| TimerView {
            text,
            urgent: timer.is_urgent(),
        });

        Self {
            phase: session.phase(),
            question_id: question.id,
            question_text: question.text.clone(),
            index,
            total,
            answered: session.answered_count(),
            options,
            palette,
            timer,
            is_first: index == 0,
            is_last: index + 1 == total,
            progress_percent: (index + 1) as f64 / total as f64 * 100.0,
        }
    }
}
