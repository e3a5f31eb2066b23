//! Auto-dismiss timers
//!
//! Managers never sleep themselves. They hand delayed work to a
//! `TimerDriver` and keep the returned `TimerHandle` so the work can be
//! cancelled when a notification goes away early.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use log::trace;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

/// Deferred unit of work
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Cancellation handle for scheduled work
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Prevent the task from running. Cancelling twice is harmless.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Schedules delayed, cancellable work
pub trait TimerDriver: Send + Sync {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;
}

/// Timer backed by a tokio runtime
#[derive(Clone)]
pub struct TokioTimer {
    handle: Handle,
}

impl TokioTimer {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Bind to the runtime of the calling context
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current()
            .context("TokioTimer requires a running tokio runtime")?;
        Ok(Self::new(handle))
    }
}

impl TimerDriver for TokioTimer {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let token = CancellationToken::new();
        let child = token.clone();

        self.handle.spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {
                    trace!("Timer cancelled before firing");
                }
                _ = tokio::time::sleep(delay) => {
                    if !child.is_cancelled() {
                        task();
                    }
                }
            }
        });

        TimerHandle::new(token)
    }
}

struct ManualEntry {
    token: CancellationToken,
    task: TimerTask,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    sequence: u64,
    entries: BTreeMap<(Duration, u64), ManualEntry>,
}

/// Deterministic timer driven by explicit `advance` calls
#[derive(Clone, Default)]
pub struct ManualTimer {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation, as seen by this timer
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of scheduled tasks that are neither fired nor cancelled
    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .entries
            .values()
            .filter(|entry| !entry.token.is_cancelled())
            .count()
    }

    /// Move time forward and run every due task in deadline order.
    ///
    /// Tasks run without the internal lock held, so they may schedule more
    /// work; anything they schedule within the window also fires.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.lock().now + by;
        let mut fired = 0;

        loop {
            let next = {
                let mut state = self.state.lock();
                let due = state
                    .entries
                    .keys()
                    .next()
                    .copied()
                    .filter(|(deadline, _)| *deadline <= target);
                match due {
                    Some(key) => {
                        state.now = key.0;
                        state.entries.remove(&key)
                    }
                    None => {
                        state.now = target;
                        None
                    }
                }
            };

            match next {
                Some(entry) if !entry.token.is_cancelled() => {
                    (entry.task)();
                    fired += 1;
                }
                Some(_) => continue,
                None => break,
            }
        }

        fired
    }
}

impl TimerDriver for ManualTimer {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
        let token = CancellationToken::new();
        let mut state = self.state.lock();
        // Cancelled entries would otherwise linger until their deadline passes
        state.entries.retain(|_, entry| !entry.token.is_cancelled());
        let deadline = state.now + delay;
        let sequence = state.sequence;
        state.sequence += 1;
        state.entries.insert(
            (deadline, sequence),
            ManualEntry {
                token: token.clone(),
                task,
            },
        );
        TimerHandle::new(token)
    }
}
