//! Progress reporting, throttled to one callback per wall-clock second
//! except for the forced start and end events.

use std::time::{Duration, Instant};

/// One `(steps completed, total steps)` pair per active search frame.
pub type ProgressFrame = (usize, usize);

type Callback<'a> = Box<dyn FnMut(&[ProgressFrame]) + 'a>;

/// Forwards progress snapshots to an optional sink. A reporter without
/// a callback swallows everything, which is how non-`-r` runs and the
/// test harness operate.
pub struct ProgressReporter<'a> {
    callback: Option<Callback<'a>>,
    last_report: Option<Instant>,
}

impl<'a> ProgressReporter<'a> {
    #[must_use]
    pub fn new(callback: Option<Callback<'a>>) -> Self {
        Self {
            callback,
            last_report: None,
        }
    }

    /// The conventional "starting" signal: a single `(0, 0)` frame.
    pub fn start(&mut self) {
        self.report_forced(&[(0, 0)]);
    }

    /// The conventional "done" signal: no frames at all.
    pub fn end(&mut self) {
        self.report_forced(&[]);
    }

    pub fn report(&mut self, progress: &[ProgressFrame]) {
        let due = self
            .last_report
            .map_or(true, |at| at.elapsed() >= Duration::from_secs(1));
        if due {
            self.report_forced(progress);
        }
    }

    fn report_forced(&mut self, progress: &[ProgressFrame]) {
        if let Some(callback) = &mut self.callback {
            callback(progress);
            self.last_report = Some(Instant::now());
        }
    }
}
