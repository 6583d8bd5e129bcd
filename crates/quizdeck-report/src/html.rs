//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined, suitable for
//! printing or sharing a finished quiz.

use anyhow::{Context, Result};
use std::path::Path;

use quizdeck_core::report::QuizReport;
use quizdeck_core::timer::format_clock;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a quiz report.
pub fn generate_html(report: &QuizReport) -> String {
    let summary = &report.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"zh-TW\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>測驗結果 - {}</title>\n",
        html_escape(&report.quiz_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>測驗結果</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">題庫：<strong>{}</strong> | 產生時間：{}</p>\n",
        html_escape(&report.quiz_name),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(minutes) = report.time_limit_minutes {
        html.push_str(&format!(
            "<p class=\"meta\">時間限制：{}</p>\n",
            format_clock(minutes.saturating_mul(60))
        ));
    }
    if report.timed_out {
        html.push_str("<p class=\"meta warn\">時間到，已自動提交。</p>\n");
    }
    html.push_str("</header>\n");

    // Score
    html.push_str(&format!(
        "<section class=\"score {}\">\n",
        grade_class(summary.percentage)
    ));
    html.push_str(&format!(
        "<div class=\"percentage\">{}%</div>\n",
        summary.percentage
    ));
    html.push_str(&format!(
        "<p>答對 <strong>{}</strong> / {} 題（答錯 {}，未作答 {}）</p>\n",
        summary.correct, summary.total, summary.incorrect, summary.unanswered
    ));
    html.push_str(&format!(
        "<p class=\"message\">{}</p>\n",
        html_escape(summary.grade.message())
    ));
    html.push_str("</section>\n");

    // Per-question review
    html.push_str("<section class=\"review\">\n");
    html.push_str("<h2>答題詳情</h2>\n");
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>#</th><th>題目</th><th>你的答案</th><th>正確答案</th><th>結果</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for item in &report.review {
        let class = if item.is_correct { "pass" } else { "fail" };
        let verdict = if item.is_correct { "✓" } else { "✗" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{} {}</td><td>{} {}</td><td>{}</td></tr>\n",
            class,
            item.position,
            html_escape(&item.question_text),
            html_escape(item.selected_display()),
            html_escape(&item.selected_text),
            html_escape(&item.correct_key),
            html_escape(&item.correct_text),
            verdict
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &QuizReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn grade_class(percentage: u32) -> &'static str {
    match percentage {
        70.. => "high",
        50..=69 => "mid",
        _ => "low",
    }
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans TC', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.warn { color: #ef4444; }
.score { border: 1px solid var(--border); border-radius: 8px; padding: 1rem 2rem; margin: 1rem 0; }
.score .percentage { font-size: 3rem; font-weight: bold; }
.score.high .percentage { color: #22c55e; }
.score.mid .percentage { color: #eab308; }
.score.low .percentage { color: #ef4444; }
.message { font-size: 1.2rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
"#;
