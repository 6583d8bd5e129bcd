//! The `quizdeck report` command.

use std::path::PathBuf;

use anyhow::Result;

use quizdeck_core::report::QuizReport;
use quizdeck_report::write_html_report;

use crate::render::{render_summary, review_table};

pub fn execute(input: PathBuf, html: Option<PathBuf>, markdown: bool) -> Result<()> {
    let report = QuizReport::load_json(&input)?;

    if markdown {
        print!("{}", report.to_markdown());
        return write_html(&report, html);
    }

    println!(
        "{} ({})",
        report.quiz_name,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if report.timed_out {
        println!("時間到，已自動提交。");
    }
    println!("{}", render_summary(&report.summary));
    println!("\n{}", review_table(&report));

    write_html(&report, html)
}

fn write_html(report: &QuizReport, html: Option<PathBuf>) -> Result<()> {
    if let Some(path) = html {
        write_html_report(report, &path)?;
        println!("HTML report: {}", path.display());
    }
    Ok(())
}
