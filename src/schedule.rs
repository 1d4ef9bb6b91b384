//! # Render Scheduling
//!
//! Resize and zoom signals tend to arrive in bursts. Rendering is cheap and
//! idempotent, so a burst only needs one render once the inputs have settled.
//! [`Debouncer`] is the clock-driven state machine for that, and
//! [`run_debounced`] drives it from a tokio channel. Neither touches the
//! renderer itself; disabling debouncing just renders on every signal.

use tokio::sync::mpsc;
use tokio::time::{self, Duration, Instant};
use tracing::debug;

/// Collapses a burst of triggers into one firing after a quiet period.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    interval: Option<Duration>,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// `None` disables debouncing.
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval: interval.filter(|d| !d.is_zero()),
            deadline: None,
        }
    }

    pub fn from_millis(millis: Option<u64>) -> Self {
        Self::new(millis.map(Duration::from_millis))
    }

    /// Record a signal at `now`. Returns `true` if the render should run immediately.
    pub fn trigger(&mut self, now: Instant) -> bool {
        match self.interval {
            None => true,
            Some(interval) => {
                self.deadline = Some(now + interval);
                false
            }
        }
    }

    /// Returns `true` once the quiet period after the last trigger has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Feed requests from `rx` through a [`Debouncer`], calling `render` with the
/// latest request each time it fires. A request still pending when the channel
/// closes is rendered before returning. Returns the number of renders.
pub async fn run_debounced<T, R>(
    mut rx: mpsc::Receiver<T>,
    interval: Option<Duration>,
    mut render: R,
) -> usize
where
    R: FnMut(T),
{
    let mut debouncer = Debouncer::new(interval);
    let mut pending: Option<T> = None;
    let mut renders = 0;

    loop {
        let received = match debouncer.deadline() {
            Some(deadline) => {
                tokio::select! {
                    request = rx.recv() => request,
                    _ = time::sleep_until(deadline) => {
                        if debouncer.poll(Instant::now()) {
                            if let Some(request) = pending.take() {
                                render(request);
                                renders += 1;
                            }
                        }
                        continue;
                    }
                }
            }
            None => rx.recv().await,
        };

        let Some(request) = received else {
            break;
        };
        if debouncer.trigger(Instant::now()) {
            render(request);
            renders += 1;
        } else {
            pending = Some(request);
        }
    }

    if let Some(request) = pending.take() {
        render(request);
        renders += 1;
    }
    debug!(renders, "render scheduler stopped");
    renders
}
