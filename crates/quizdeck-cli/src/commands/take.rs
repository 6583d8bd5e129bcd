//! The `quizdeck take` command.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use quizdeck_core::config::load_config_from;
use quizdeck_core::loader::parse_bank_file;
use quizdeck_core::model::QuestionBank;
use quizdeck_core::persistence::{saved_quiz_name, FileStore};
use quizdeck_core::report::QuizReport;
use quizdeck_core::runner::QuizRunner;
use quizdeck_core::timer::TickOutcome;
use quizdeck_report::write_html_report;

use crate::render::{review_table, ConsoleRenderer, HELP};

pub struct TakeArgs {
    pub bank: Option<PathBuf>,
    pub random_count: Option<usize>,
    pub time_limit: Option<u32>,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub config: Option<PathBuf>,
    pub resume: bool,
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Answer(String),
    Next,
    Previous,
    /// 0-based position.
    GoTo(usize),
    Submit,
    Restart,
    Quit,
    Help,
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let lower = line.to_lowercase();
    match lower.as_str() {
        "n" => Some(Input::Next),
        "p" => Some(Input::Previous),
        "s" => Some(Input::Submit),
        "r" => Some(Input::Restart),
        "q" => Some(Input::Quit),
        "h" | "?" => Some(Input::Help),
        _ => {
            if let Some(number) = lower.strip_prefix('g').and_then(|n| n.trim().parse::<usize>().ok())
            {
                return number.checked_sub(1).map(Input::GoTo);
            }
            Some(Input::Answer(line.to_uppercase()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Json,
    Html,
}

fn parse_formats(format: &str) -> Result<Vec<ReportFormat>> {
    if format.trim() == "all" {
        return Ok(vec![ReportFormat::Json, ReportFormat::Html]);
    }
    format
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| match f {
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            other => anyhow::bail!("unknown report format: '{other}' (expected json, html, all)"),
        })
        .collect()
}

/// How a terminal session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Submitted { timed_out: bool },
    Quit,
}

/// What `r` restarts with.
struct Plan<'a> {
    bank: Option<&'a QuestionBank>,
    random_count: usize,
    time_limit: u32,
}

pub async fn execute(args: TakeArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let random_count = args.random_count.unwrap_or(config.random_count);
    let time_limit = args.time_limit.unwrap_or(config.time_limit_minutes);
    let output = args.output.unwrap_or_else(|| config.output_dir.clone());
    let formats = parse_formats(args.format.as_deref().unwrap_or(&config.default_format))?;

    let bank = args.bank.as_deref().map(parse_bank_file).transpose()?;

    let store = Arc::new(FileStore::new(&config.state_dir));
    let mut runner = QuizRunner::new(store.clone(), Arc::new(ConsoleRenderer));

    if args.resume {
        runner.resume()?;
    } else {
        let bank = bank
            .as_ref()
            .context("--bank is required unless --resume is given")?;
        if let Some(name) = saved_quiz_name(store.as_ref()) {
            println!("已捨棄先前未完成的測驗「{name}」（下次可用 --resume 繼續）。");
        }
        runner.start(bank, random_count, time_limit)?;
    }
    println!("{HELP}");

    let plan = Plan {
        bank: bank.as_ref(),
        random_count,
        time_limit,
    };
    let mut input = spawn_stdin_reader();

    match drive(&mut runner, &mut input, &plan).await? {
        Outcome::Quit => Ok(()),
        Outcome::Submitted { timed_out } => {
            let session = runner
                .session()
                .context("quiz ended without a session")?;
            let limit = (!args.resume).then_some(time_limit);
            let report = QuizReport::from_session(session, runner.quiz_name(), limit, timed_out)?;
            println!("\n{}", review_table(&report));
            write_reports(&report, &output, &formats)
        }
    }
}

/// Read stdin lines on a dedicated thread so a pending read never blocks shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Interleave user input with one-second timer ticks until the quiz ends.
async fn drive(
    runner: &mut QuizRunner,
    input: &mut mpsc::UnboundedReceiver<String>,
    plan: &Plan<'_>,
) -> Result<Outcome> {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            line = input.recv() => {
                let Some(line) = line else {
                    runner.persist();
                    return Ok(Outcome::Quit);
                };
                let Some(command) = parse_input(&line) else {
                    continue;
                };
                if let Some(outcome) = apply(runner, command, plan)? {
                    return Ok(outcome);
                }
            }
            _ = ticker.tick(), if runner.timer().is_running() => {
                if runner.tick() == TickOutcome::Expired {
                    return Ok(Outcome::Submitted { timed_out: true });
                }
            }
        }
    }
}

fn apply(runner: &mut QuizRunner, command: Input, plan: &Plan<'_>) -> Result<Option<Outcome>> {
    match command {
        Input::Answer(key) => {
            let known = runner
                .session()
                .is_some_and(|s| s.current_question().option(&key).is_some());
            if !known {
                println!("沒有選項 {key}（輸入 h 查看說明）");
                return Ok(None);
            }
            if let Err(e) = runner.select_current(&key) {
                if !e.is_ignorable() {
                    return Err(e.into());
                }
            }
        }
        Input::Next => {
            if !runner.next() {
                println!("已經是最後一題");
            }
        }
        Input::Previous => {
            if !runner.previous() {
                println!("已經是第一題");
            }
        }
        Input::GoTo(index) => {
            if !runner.go_to(index) {
                println!("沒有第 {} 題", index + 1);
            }
        }
        Input::Submit => {
            runner.submit()?;
            return Ok(Some(Outcome::Submitted { timed_out: false }));
        }
        Input::Restart => {
            runner.restart();
            match plan.bank {
                Some(bank) => runner.start(bank, plan.random_count, plan.time_limit)?,
                None => {
                    println!("沒有指定題庫，無法重新開始。");
                    return Ok(Some(Outcome::Quit));
                }
            }
        }
        Input::Quit => {
            runner.persist();
            println!("進度已保存，使用 quizdeck take --resume 繼續。");
            return Ok(Some(Outcome::Quit));
        }
        Input::Help => println!("{HELP}"),
    }
    Ok(None)
}

fn write_reports(report: &QuizReport, output: &Path, formats: &[ReportFormat]) -> Result<()> {
    if formats.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    for fmt in formats {
        match fmt {
            ReportFormat::Json => {
                let path = output.join(format!("quiz-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            ReportFormat::Html => {
                let path = output.join(format!("quiz-{timestamp}.html"));
                write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
        }
    }

    Ok(())
}
