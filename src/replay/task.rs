//! Cancellable scheduled task slot
//!
//! Holds at most one pending piece of work and the instant it becomes due.
//! Arming again replaces whatever was pending, cancelling is always safe,
//! and a task that already fired is simply gone.

use tokio::time::Instant;

#[derive(Debug)]
pub struct ScheduledTask<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for ScheduledTask<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> ScheduledTask<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` for `due`, replacing any pending task
    pub fn arm(&mut self, due: Instant, payload: T) {
        self.pending = Some((due, payload));
    }

    /// Drop the pending task, returning its payload if there was one
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    /// Fire the task if it is due at `now`
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.due().map_or(false, |due| due <= now) {
            self.cancel()
        } else {
            None
        }
    }
}
