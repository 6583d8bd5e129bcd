//! Quiz session driver.
//!
//! [`QuizRunner`] owns the session, the countdown, the progress store, and
//! the observer that renders state. Every operation runs to completion and
//! leaves the runner consistent before returning, so a timer tick can be
//! interleaved between any two calls.

use std::sync::Arc;

use rand::Rng;

use crate::error::QuizError;
use crate::model::QuestionBank;
use crate::persistence::{
    clear_snapshot, load_snapshot, save_snapshot, ProgressSnapshot, SnapshotStore,
};
use crate::scoring::{score, ScoreSummary};
use crate::session::{Phase, Session};
use crate::timer::{Countdown, TickOutcome};
use crate::view::{SessionView, TimerView};

/// Receives state changes for rendering.
pub trait QuizObserver {
    /// The session changed (start, restore, answer, navigation).
    fn on_change(&self, view: &SessionView);

    /// The timer advanced.
    fn on_tick(&self, _timer: &TimerView) {}

    /// The session was submitted. `forced` is set when the timer ran out.
    fn on_submitted(&self, summary: &ScoreSummary, forced: bool);

    /// The session was discarded.
    fn on_reset(&self) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl QuizObserver for NoopObserver {
    fn on_change(&self, _: &SessionView) {}
    fn on_submitted(&self, _: &ScoreSummary, _: bool) {}
}

/// Drives one quiz at a time through `NotStarted → InProgress → Submitted`.
pub struct QuizRunner {
    session: Option<Session>,
    timer: Countdown,
    quiz_name: String,
    store: Arc<dyn SnapshotStore>,
    observer: Arc<dyn QuizObserver>,
}

impl QuizRunner {
    pub fn new(store: Arc<dyn SnapshotStore>, observer: Arc<dyn QuizObserver>) -> Self {
        Self {
            session: None,
            timer: Countdown::new(),
            quiz_name: String::new(),
            store,
            observer,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map_or(Phase::NotStarted, Session::phase)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    /// Name of the source the current session was drawn from.
    pub fn quiz_name(&self) -> &str {
        &self.quiz_name
    }

    /// Render-ready view of the current state, if a session exists.
    pub fn view(&self) -> Option<SessionView> {
        self.session
            .as_ref()
            .map(|session| SessionView::build(session, &self.timer))
    }

    /// Start a fresh session from `bank`.
    ///
    /// `random_count` of 0 (or at least the bank size) uses the whole bank;
    /// `time_limit_minutes` of 0 runs untimed.
    pub fn start(
        &mut self,
        bank: &QuestionBank,
        random_count: usize,
        time_limit_minutes: u32,
    ) -> Result<(), QuizError> {
        self.start_with_rng(
            bank,
            random_count,
            time_limit_minutes,
            &mut rand::thread_rng(),
        )
    }

    /// [`QuizRunner::start`] with a caller-supplied random source.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        random_count: usize,
        time_limit_minutes: u32,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        let session = Session::draw(bank, random_count, rng)?;

        self.clear_saved();
        self.timer.arm(time_limit_minutes.saturating_mul(60));
        tracing::info!(
            "started quiz from {} with {} of {} question(s){}",
            bank.source_name,
            session.len(),
            bank.len(),
            match self.timer.remaining() {
                Some(secs) => format!(", {secs}s limit"),
                None => String::new(),
            }
        );
        self.session = Some(session);
        self.quiz_name = bank.source_name.clone();
        self.notify_change();
        Ok(())
    }

    /// Record an answer and save progress.
    ///
    /// Selecting for a question outside the session, or after submission,
    /// returns an ignorable error and changes nothing.
    pub fn select_option(&mut self, question_id: u32, key: &str) -> Result<(), QuizError> {
        let session = self.session.as_mut().ok_or(QuizError::NoSession)?;
        if let Err(e) = session.select(question_id, key) {
            tracing::debug!("ignored selection of {key} for question {question_id}: {e}");
            return Err(e);
        }
        self.persist();
        self.notify_change();
        Ok(())
    }

    /// Answer the question currently shown.
    pub fn select_current(&mut self, key: &str) -> Result<(), QuizError> {
        let question_id = self
            .session
            .as_ref()
            .ok_or(QuizError::NoSession)?
            .current_question()
            .id;
        self.select_option(question_id, key)
    }

    /// Jump to a 0-based position. Out-of-range indexes are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        let moved = self
            .session
            .as_mut()
            .is_some_and(|session| session.go_to(index));
        if moved {
            self.notify_change();
        }
        moved
    }

    pub fn next(&mut self) -> bool {
        match self.session.as_ref() {
            Some(session) => self.go_to(session.current_index() + 1),
            None => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        match self
            .session
            .as_ref()
            .and_then(|s| s.current_index().checked_sub(1))
        {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    /// Submit the session and return its score.
    ///
    /// Submitting an already-submitted session returns the same score again.
    pub fn submit(&mut self) -> Result<ScoreSummary, QuizError> {
        self.submit_inner(false)
    }

    fn submit_inner(&mut self, forced: bool) -> Result<ScoreSummary, QuizError> {
        let session = self.session.as_mut().ok_or(QuizError::NoSession)?;
        let first = session.mark_submitted();
        let summary = score(session)?;

        if first {
            self.timer.stop();
            self.clear_saved();
            tracing::info!(
                "quiz submitted{}: {}/{} correct ({}%)",
                if forced { " (time expired)" } else { "" },
                summary.correct,
                summary.total,
                summary.percentage
            );
            self.observer.on_submitted(&summary, forced);
        }
        Ok(summary)
    }

    /// Advance the timer by one second, force-submitting on expiry.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.timer.tick();
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Running { .. } => {
                if let Some(text) = self.timer.display() {
                    self.observer.on_tick(&TimerView {
                        text,
                        urgent: self.timer.is_urgent(),
                    });
                }
            }
            TickOutcome::Expired => {
                if let Err(e) = self.submit_inner(true) {
                    tracing::warn!("timer expired without a session to submit: {e}");
                }
            }
        }
        outcome
    }

    /// Adopt a saved snapshot as the current, unsubmitted session.
    pub fn restore(&mut self, snapshot: ProgressSnapshot) -> Result<(), QuizError> {
        let session = Session::from_parts(
            snapshot.questions,
            snapshot.selected_options,
            snapshot.current_question_index,
        )?;

        match snapshot.time_left {
            Some(secs) if secs > 0 => self.timer.arm(secs),
            _ => self.timer.disarm(),
        }
        tracing::info!(
            "restored quiz {} at question {} of {}",
            snapshot.quiz_file_name,
            session.current_index() + 1,
            session.len()
        );
        self.session = Some(session);
        self.quiz_name = snapshot.quiz_file_name;
        self.notify_change();
        Ok(())
    }

    /// Restore from the store's progress slot.
    pub fn resume(&mut self) -> Result<(), QuizError> {
        let snapshot = load_snapshot(self.store.as_ref())
            .ok_or_else(|| QuizError::Restore("no saved progress found".into()))?;
        self.restore(snapshot)
    }

    /// Discard the session and any saved progress.
    pub fn restart(&mut self) {
        self.timer.disarm();
        self.session = None;
        self.quiz_name.clear();
        self.clear_saved();
        self.observer.on_reset();
    }

    /// Resumable state of the current session, if it is still in progress.
    pub fn snapshot(&self) -> Option<ProgressSnapshot> {
        self.session
            .as_ref()
            .filter(|s| !s.is_submitted())
            .map(|s| ProgressSnapshot::capture(s, &self.quiz_name, self.timer.remaining()))
    }

    /// Save the current progress. Store failures are logged, not returned.
    pub fn persist(&self) {
        let Some(snapshot) = self.snapshot() else {
            return;
        };
        if let Err(e) = save_snapshot(self.store.as_ref(), &snapshot) {
            tracing::warn!("failed to save progress: {e:#}");
        }
    }

    fn clear_saved(&self) {
        if let Err(e) = clear_snapshot(self.store.as_ref()) {
            tracing::warn!("failed to clear saved progress: {e:#}");
        }
    }

    fn notify_change(&self) {
        if let Some(view) = self.view() {
            self.observer.on_change(&view);
        }
    }
}
