use std::time::{Duration, Instant};

/// Identifies one scheduled task; never reused within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskTicket(u64);

impl TaskTicket {
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct PendingTask<T> {
    ticket: TaskTicket,
    due_at: Instant,
    payload: T,
}

/// Holds at most one pending task that fires once its deadline has passed.
///
/// Time is supplied by the caller, so the scheduler never reads a clock.
/// Scheduling while a task is pending replaces (and reports) the old one.
#[derive(Debug)]
pub struct OneShotScheduler<T> {
    next_ticket: u64,
    pending: Option<PendingTask<T>>,
}

impl<T> Default for OneShotScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OneShotScheduler<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_ticket: 1,
            pending: None,
        }
    }

    /// Arms a task due at `now + delay`. Returns its ticket and the ticket of
    /// the task it superseded, if one was still pending.
    pub fn schedule(
        &mut self,
        now: Instant,
        delay: Duration,
        payload: T,
    ) -> (TaskTicket, Option<TaskTicket>) {
        let ticket = TaskTicket(self.next_ticket);
        self.next_ticket += 1;
        let superseded = self.pending.replace(PendingTask {
            ticket,
            due_at: now + delay,
            payload,
        });
        (ticket, superseded.map(|task| task.ticket))
    }

    /// Drops the pending task without firing it.
    pub fn cancel(&mut self) -> Option<TaskTicket> {
        self.pending.take().map(|task| task.ticket)
    }

    /// Fires the pending task once `now` has reached its deadline.
    pub fn poll(&mut self, now: Instant) -> Option<(TaskTicket, T)> {
        if self.pending.as_ref()?.due_at > now {
            return None;
        }
        self.pending.take().map(|task| (task.ticket, task.payload))
    }

    #[must_use]
    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|task| task.due_at)
    }

    #[must_use]
    pub fn pending_ticket(&self) -> Option<TaskTicket> {
        self.pending.as_ref().map(|task| task.ticket)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::OneShotScheduler;

    #[test]
    fn fires_only_after_deadline() {
        let start = Instant::now();
        let mut scheduler = OneShotScheduler::new();
        let (ticket, superseded) = scheduler.schedule(start, Duration::from_millis(100), "x");
        assert!(superseded.is_none());

        assert!(scheduler.poll(start + Duration::from_millis(99)).is_none());
        assert_eq!(
            scheduler.poll(start + Duration::from_millis(100)),
            Some((ticket, "x"))
        );
        assert!(scheduler.poll(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn rescheduling_supersedes_pending_task() {
        let start = Instant::now();
        let mut scheduler = OneShotScheduler::new();
        let (first, _) = scheduler.schedule(start, Duration::from_millis(10), 1);
        let (second, superseded) = scheduler.schedule(start, Duration::from_millis(10), 2);

        assert_eq!(superseded, Some(first));
        assert_eq!(scheduler.pending_ticket(), Some(second));
        assert_ne!(first, second);
        assert_eq!(
            scheduler.poll(start + Duration::from_millis(10)),
            Some((second, 2))
        );
    }

    #[test]
    fn cancel_clears_pending_task() {
        let start = Instant::now();
        let mut scheduler = OneShotScheduler::new();
        let (ticket, _) = scheduler.schedule(start, Duration::ZERO, ());
        assert_eq!(scheduler.cancel(), Some(ticket));
        assert!(!scheduler.is_pending());
        assert!(scheduler.poll(start).is_none());
    }
}
