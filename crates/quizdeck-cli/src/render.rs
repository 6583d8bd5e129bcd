//! Terminal rendering of quiz state.

use comfy_table::{Cell, Color, Table};

use quizdeck_core::report::QuizReport;
use quizdeck_core::runner::QuizObserver;
use quizdeck_core::scoring::ScoreSummary;
use quizdeck_core::view::{OptionStyle, SessionView, TimerView};

/// Prints each state change to stdout.
pub struct ConsoleRenderer;

impl QuizObserver for ConsoleRenderer {
    fn on_change(&self, view: &SessionView) {
        println!("{}", render_view(view));
    }

    fn on_tick(&self, timer: &TimerView) {
        if timer.text.ends_with(":00") || matches!(timer.text.as_str(), "0:30" | "0:10") {
            println!("剩餘時間 {}", timer.text);
        }
    }

    fn on_submitted(&self, summary: &ScoreSummary, forced: bool) {
        if forced {
            println!("\n時間到！已自動提交。");
        }
        println!("{}", render_summary(summary));
    }

    fn on_reset(&self) {
        println!("已清除測驗進度。");
    }
}

/// Render one frame: status line, question, options, palette.
pub fn render_view(view: &SessionView) -> String {
    let mut out = String::new();

    let timer = match &view.timer {
        Some(t) if t.urgent => format!(" | 剩餘時間 {} !", t.text),
        Some(t) => format!(" | 剩餘時間 {}", t.text),
        None => String::new(),
    };
    out.push_str(&format!(
        "\n[{}/{}] 已作答 {}/{}{}\n",
        view.index + 1,
        view.total,
        view.answered,
        view.total,
        timer
    ));
    out.push_str(&format!("{}\n", view.question_text));

    for option in &view.options {
        let marker = match option.style {
            OptionStyle::Plain => " ",
            OptionStyle::Selected => "*",
            OptionStyle::Correct => "✓",
            OptionStyle::Incorrect => "✗",
        };
        out.push_str(&format!("  {marker} {}\n", option.label));
    }

    let palette: Vec<String> = view
        .palette
        .iter()
        .map(|entry| {
            let mark = if entry.answered { "*" } else { "" };
            if entry.current {
                format!("[{}{mark}]", entry.number)
            } else {
                format!("{}{mark}", entry.number)
            }
        })
        .collect();
    out.push_str(&format!("題號: {}", palette.join(" ")));

    out
}

pub fn render_summary(summary: &ScoreSummary) -> String {
    format!(
        "\n得分: {}% ({}/{})，答錯 {}，未作答 {}\n{}",
        summary.percentage,
        summary.correct,
        summary.total,
        summary.incorrect,
        summary.unanswered,
        summary.grade.message()
    )
}

/// Per-question review table.
pub fn review_table(report: &QuizReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "題目", "你的答案", "正確答案", "結果"]);

    for item in &report.review {
        let verdict = if item.is_correct {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("✗").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(item.position),
            Cell::new(&item.question_text),
            Cell::new(format!("{} {}", item.selected_display(), item.selected_text)),
            Cell::new(format!("{} {}", item.correct_key, item.correct_text)),
            verdict,
        ]);
    }

    table
}

pub const HELP: &str = "指令: 選項代號作答 (a-e, o, x)，n 下一題，p 上一題，g N 跳到第 N 題，s 提交，r 重新開始，q 離開 (保留進度)，h 說明";

#[cfg(test)]
mod tests {
    use super::*;
    use quizdeck_core::scoring::Grade;
    use quizdeck_core::session::Phase;
    use quizdeck_core::view::{OptionView, PaletteEntry};

    fn view() -> SessionView {
        SessionView {
            phase: Phase::InProgress,
            question_id: 2,
            question_text: "地球是圓的".into(),
            index: 1,
            total: 3,
            answered: 1,
            options: vec![
                OptionView {
                    key: "O".into(),
                    label: "O".into(),
                    style: OptionStyle::Selected,
                },
                OptionView {
                    key: "X".into(),
                    label: "X".into(),
                    style: OptionStyle::Plain,
                },
            ],
            palette: (1..=3)
                .map(|n| PaletteEntry {
                    number: n,
                    question_id: n as u32,
                    answered: n == 2,
                    current: n == 2,
                })
                .collect(),
            timer: Some(TimerView {
                text: "0:42".into(),
                urgent: true,
            }),
            is_first: false,
            is_last: false,
            progress_percent: 200.0 / 3.0,
        }
    }

    #[test]
    fn renders_frame() {
        let out = render_view(&view());
        assert!(out.contains("[2/3] 已作答 1/3 | 剩餘時間 0:42 !"));
        assert!(out.contains("  * O\n"));
        assert!(out.contains("    X\n"));
        assert!(!out.contains("(O)"));
        assert!(out.contains("題號: 1 [2*] 3"));
    }

    #[test]
    fn choice_options_show_label_once() {
        let mut view = view();
        view.options = vec![OptionView {
            key: "A".into(),
            label: "A. 玉山".into(),
            style: OptionStyle::Plain,
        }];
        let out = render_view(&view);
        assert!(out.contains("    A. 玉山\n"));
        assert!(!out.contains("(A)"));
    }

    #[test]
    fn renders_summary() {
        let out = render_summary(&ScoreSummary {
            total: 4,
            correct: 3,
            incorrect: 1,
            unanswered: 0,
            percentage: 75,
            grade: Grade::Good,
        });
        assert!(out.contains("75% (3/4)"));
        assert!(out.contains("做得很好"));
    }
}
