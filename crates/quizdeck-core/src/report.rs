//! Quiz report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QuizError;
use crate::scoring::{review, score, ReviewItem, ScoreSummary};
use crate::session::Session;

/// A finished, scored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Name of the question source.
    pub quiz_name: String,
    pub summary: ScoreSummary,
    pub review: Vec<ReviewItem>,
    /// Configured limit, `None` when untimed.
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
    /// Set when the timer forced the submission.
    #[serde(default)]
    pub timed_out: bool,
}

impl QuizReport {
    /// Build a report from a submitted session.
    pub fn from_session(
        session: &Session,
        quiz_name: &str,
        time_limit_minutes: Option<u32>,
        timed_out: bool,
    ) -> Result<Self, QuizError> {
        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            quiz_name: quiz_name.to_string(),
            summary: score(session)?,
            review: review(session)?,
            time_limit_minutes: time_limit_minutes.filter(|m| *m > 0),
            timed_out,
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.quiz_name));
        md.push_str(&format!(
            "**得分：** {}/{} ({}%) {}\n\n",
            self.summary.correct,
            self.summary.total,
            self.summary.percentage,
            self.summary.grade.message()
        ));
        if let Some(minutes) = self.time_limit_minutes {
            md.push_str(&format!("時間限制：{minutes} 分鐘\n\n"));
        }
        if self.timed_out {
            md.push_str("_時間到，已自動提交。_\n\n");
        }

        md.push_str("| # | 題目 | 你的答案 | 正確答案 | 結果 |\n");
        md.push_str("|---|------|----------|----------|------|\n");
        for item in &self.review {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                item.position,
                escape_cell(&item.question_text),
                escape_cell(&format!("{} {}", item.selected_display(), item.selected_text)),
                escape_cell(&format!("{} {}", item.correct_key, item.correct_text)),
                if item.is_correct { "✓" } else { "✗" }
            ));
        }

        md
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuizOption};
    use crate::scoring::{Grade, UNANSWERED_MARKER};

    fn submitted_session() -> Session {
        let questions = vec![
            Question {
                id: 1,
                text: "1 + 1 = ?".into(),
                options: vec![QuizOption::new("A", "2"), QuizOption::new("B", "3")],
                answer: "A".into(),
            },
            Question {
                id: 2,
                text: "a | b".into(),
                options: vec![QuizOption::new("O", "O"), QuizOption::new("X", "X")],
                answer: "X".into(),
            },
        ];
        let mut session = Session::new(questions).unwrap();
        session.select(1, "A").unwrap();
        session.mark_submitted();
        session
    }

    #[test]
    fn builds_from_submitted_session() {
        let report = QuizReport::from_session(&submitted_session(), "bank.csv", Some(0), true)
            .unwrap();
        assert_eq!(report.summary.correct, 1);
        assert_eq!(report.summary.percentage, 50);
        assert_eq!(report.summary.grade, Grade::Fair);
        assert_eq!(report.time_limit_minutes, None);
        assert_eq!(report.review.iter().filter(|i| !i.is_correct).count(), 1);
        assert_eq!(report.review[1].selected_display(), UNANSWERED_MARKER);
    }

    #[test]
    fn requires_submission() {
        let session = Session::new(submitted_session().questions().to_vec()).unwrap();
        assert_eq!(
            QuizReport::from_session(&session, "bank.csv", None, false),
            Err(QuizError::NotSubmitted)
        );
    }

    #[test]
    fn json_roundtrip() {
        let report =
            QuizReport::from_session(&submitted_session(), "bank.csv", Some(10), false).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = QuizReport::load_json(&path).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "not json").unwrap();
        let err = QuizReport::load_json(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse report JSON"));
    }

    #[test]
    fn markdown_output() {
        let report =
            QuizReport::from_session(&submitted_session(), "bank.csv", None, true).unwrap();
        let md = report.to_markdown();
        assert!(md.contains("## bank.csv"));
        assert!(md.contains("1/2 (50%)"));
        assert!(md.contains("| # | 題目 | 你的答案 | 正確答案 | 結果 |"));
        assert!(md.contains("時間到，已自動提交。"));
        assert!(!md.contains("時間限制"));
        assert!(md.contains("a \\| b"));
        assert!(md.contains("未作答"));
    }
}
