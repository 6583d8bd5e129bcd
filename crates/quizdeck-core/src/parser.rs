//! Question parser and normalizer.
//!
//! Turns tabular records (one per spreadsheet row) into a [`QuestionBank`],
//! detecting which of the three supported column layouts the source uses.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{FormatError, QuizError};
use crate::model::{Question, QuestionBank, QuizOption, SourceFormat, FALSE_KEY, TRUE_KEY};

/// One spreadsheet row: column name → cell text. Blank cells are absent.
pub type Record = BTreeMap<String, String>;

/// Column name aliases (traditional first, then simplified).
type Column = &'static [&'static str];

const QUESTION: Column = &["問題", "问题"];
const ITEM: Column = &["試題", "试题"];
const CORRECT_ANSWER: Column = &["正確答案", "正确答案"];
const ANSWER: Column = &["答案"];

const OPTION_LETTERS: [&str; 5] = ["A", "B", "C", "D", "E"];
const OPTION_COLUMNS: [Column; 5] = [
    &["選項A", "选项A"],
    &["選項B", "选项B"],
    &["選項C", "选项C"],
    &["選項D", "选项D"],
    &["選項E", "选项E"],
];

/// Answer tokens that mark a source as true/false.
pub const TRUE_FALSE_TOKENS: [&str; 8] = ["O", "X", "○", "是", "非", "TRUE", "FALSE", "V"];

/// Answer tokens that normalize to the "true" key.
pub const TRUE_TOKENS: [&str; 5] = ["O", "○", "TRUE", "是", "V"];

static OPTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Za-z0-9_]+)\)").expect("option label regex is valid"));

fn has_column(record: &Record, column: &[&str]) -> bool {
    column.iter().any(|name| record.contains_key(*name))
}

fn cell<'a>(record: &'a Record, column: &[&str]) -> Option<&'a str> {
    column
        .iter()
        .find_map(|name| record.get(*name))
        .map(String::as_str)
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Trim and uppercase an answer cell.
fn normalize_answer(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_uppercase()
}

/// Map a raw true/false answer onto `O` or `X`.
pub fn normalize_true_false(raw: &str) -> &'static str {
    let token = raw.trim().to_uppercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        TRUE_KEY
    } else {
        FALSE_KEY
    }
}

/// Detect which layout a set of records uses by probing the first record.
pub fn detect_format(records: &[Record]) -> Result<SourceFormat, FormatError> {
    let first = records.first().ok_or(FormatError::NoRows)?;

    if OPTION_COLUMNS.iter().any(|column| has_column(first, column)) {
        return Ok(SourceFormat::MultipleChoice);
    }

    if has_column(first, ITEM) && has_column(first, ANSWER) {
        let first_answer = normalize_answer(cell(first, ANSWER));
        if TRUE_FALSE_TOKENS.contains(&first_answer.as_str()) {
            return Ok(SourceFormat::TrueFalse);
        }
        return Ok(SourceFormat::Embedded);
    }

    Err(FormatError::UnrecognizedLayout {
        columns: first.keys().cloned().collect::<Vec<_>>().join(", "),
    })
}

/// Parse records into a bank.
///
/// Question ids are the 1-based row position in `records`, assigned before
/// rows are dropped, so a skipped row leaves a gap in the id sequence.
pub fn parse_records(records: &[Record], source_name: &str) -> Result<QuestionBank, QuizError> {
    let format = detect_format(records)?;

    let questions: Vec<Question> = match format {
        SourceFormat::MultipleChoice => parse_multiple_choice(records),
        SourceFormat::TrueFalse => parse_true_false(records),
        SourceFormat::Embedded => parse_embedded(records),
    };

    let skipped = records.len() - questions.len();
    if skipped > 0 {
        tracing::debug!("{source_name}: skipped {skipped} row(s) without a usable question");
    }
    tracing::info!(
        "parsed {} question(s) from {source_name} ({format})",
        questions.len()
    );

    Ok(QuestionBank {
        source_name: source_name.to_string(),
        format,
        questions,
    })
}

fn row_id(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

fn parse_multiple_choice(records: &[Record]) -> Vec<Question> {
    let first = &records[0];
    let question_column = if has_column(first, QUESTION) {
        QUESTION
    } else {
        ITEM
    };
    let answer_column = if has_column(first, CORRECT_ANSWER) {
        CORRECT_ANSWER
    } else {
        ANSWER
    };

    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let text = cell(record, question_column);
            if is_blank(text) {
                return None;
            }

            let options = OPTION_LETTERS
                .iter()
                .zip(OPTION_COLUMNS.iter())
                .filter_map(|(letter, column)| {
                    let value = cell(record, column);
                    (!is_blank(value)).then(|| QuizOption::new(*letter, value.unwrap_or_default()))
                })
                .collect();

            Some(Question {
                id: row_id(index),
                text: text.unwrap_or_default().to_string(),
                options,
                answer: normalize_answer(cell(record, answer_column)),
            })
        })
        .collect()
}

fn parse_true_false(records: &[Record]) -> Vec<Question> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let text = cell(record, ITEM);
            if is_blank(text) {
                return None;
            }
            Some(Question {
                id: row_id(index),
                text: text.unwrap_or_default().to_string(),
                options: vec![
                    QuizOption::new(TRUE_KEY, TRUE_KEY),
                    QuizOption::new(FALSE_KEY, FALSE_KEY),
                ],
                answer: normalize_true_false(cell(record, ANSWER).unwrap_or_default()).to_string(),
            })
        })
        .collect()
}

fn parse_embedded(records: &[Record]) -> Vec<Question> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let raw = cell(record, ITEM).unwrap_or_default();
            if raw.is_empty() {
                return None;
            }
            let (text, options) = split_embedded_options(raw);
            if options.is_empty() {
                return None;
            }
            Some(Question {
                id: row_id(index),
                text,
                options,
                answer: normalize_answer(cell(record, ANSWER)),
            })
        })
        .collect()
}

/// Split `"stem (A)one (B)two"` into the stem and its labelled options.
///
/// Each option runs from its label to the next label or the end of the text.
/// Labels are uppercased to form option keys.
pub fn split_embedded_options(raw: &str) -> (String, Vec<QuizOption>) {
    let labels: Vec<_> = OPTION_LABEL.captures_iter(raw).collect();

    let Some(first) = labels.first() else {
        return (raw.to_string(), Vec::new());
    };
    let stem_end = first.get(0).map_or(0, |m| m.start());
    let stem = raw[..stem_end].trim().to_string();

    let options = labels
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let label = caps.get(1)?;
            let end = labels
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(raw.len(), |m| m.start());
            Some(QuizOption::new(
                label.as_str().to_uppercase(),
                raw[whole.end()..end].trim(),
            ))
        })
        .collect();

    (stem, options)
}

/// A warning from bank validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankWarning {
    /// The question id (if applicable).
    pub question_id: Option<u32>,
    /// Warning message.
    pub message: String,
}

/// Check a bank for questions that can never be answered correctly or look malformed.
pub fn validate_bank(bank: &QuestionBank) -> Vec<BankWarning> {
    let mut warnings = Vec::new();

    if bank.is_empty() {
        warnings.push(BankWarning {
            question_id: None,
            message: "bank contains no questions".into(),
        });
    }

    for question in &bank.questions {
        if question.correct_option().is_none() {
            warnings.push(BankWarning {
                question_id: Some(question.id),
                message: format!(
                    "answer '{}' matches no option; question will always be graded incorrect",
                    question.answer
                ),
            });
        }

        let mut seen = HashSet::new();
        for option in &question.options {
            if !seen.insert(option.key.as_str()) {
                warnings.push(BankWarning {
                    question_id: Some(question.id),
                    message: format!("duplicate option key: {}", option.key),
                });
            }
        }

        if question.options.len() == 1 {
            warnings.push(BankWarning {
                question_id: Some(question.id),
                message: "question has a single option".into(),
            });
        }
    }

    warnings
}
