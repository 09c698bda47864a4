//! One-shot timers driven by an injected clock
//!
//! Nothing here reads the wall clock: callers pass `now_ms` (the browser's
//! `Date.now()` in epoch milliseconds, or a test value) and collect due timers from
//! [`TimerQueue::take_due`].

use crate::content::ContentEvent;
use crate::window::WindowId;

/// Timer handle
pub type TimerId = u64;

/// Owner of timers that belong to the page rather than a window
pub const PAGE_OWNER: WindowId = 0;

/// What happens when a timer fires
#[derive(Clone, Debug, PartialEq)]
pub enum TimerAction {
    /// End a minimize flash
    RevertMinimize,
    /// Deliver a delayed event to the window's content
    Content(ContentEvent),
    /// Reload the page at `path` with a cache-busting query
    Reload { path: String },
}

#[derive(Clone, Debug)]
struct Timer {
    id: TimerId,
    owner: WindowId,
    due_ms: f64,
    action: TimerAction,
}

/// Pending timers, each owned by a window
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_id: TimerId,
}

impl TimerQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire `delay_ms` after `now_ms`
    pub fn schedule(&mut self, owner: WindowId, now_ms: f64, delay_ms: f64, action: TimerAction) -> TimerId {
        self.next_id += 1;
        let id = self.next_id;
        self.timers.push(Timer {
            id,
            owner,
            due_ms: now_ms + delay_ms.max(0.0),
            action,
        });
        id
    }

    /// Cancel one timer; returns whether it was pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        before != self.timers.len()
    }

    /// Cancel every timer `owner` scheduled; returns how many were pending
    pub fn cancel_owned(&mut self, owner: WindowId) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.owner != owner);
        before - self.timers.len()
    }

    /// Cancel `owner`'s pending timers matching `pred`
    pub fn cancel_where<P>(&mut self, owner: WindowId, pred: P) -> usize
    where
        P: Fn(&TimerAction) -> bool,
    {
        let before = self.timers.len();
        self.timers.retain(|t| t.owner != owner || !pred(&t.action));
        before - self.timers.len()
    }

    /// Remove and return every timer due at `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(WindowId, TimerAction)> {
        let mut due: Vec<Timer> = Vec::new();
        let mut i = 0;
        while i < self.timers.len() {
            if self.timers[i].due_ms <= now_ms {
                due.push(self.timers.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)));
        due.into_iter().map(|t| (t.owner, t.action)).collect()
    }

    /// Pending timers owned by `owner`
    pub fn owned_by(&self, owner: WindowId) -> usize {
        self.timers.iter().filter(|t| t.owner == owner).count()
    }

    /// Total pending timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// No pending timers
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_when_due() {
        let mut q = TimerQueue::new();
        q.schedule(1, 0.0, 300.0, TimerAction::RevertMinimize);

        assert!(q.take_due(299.0).is_empty());
        let fired = q.take_due(300.0);
        assert_eq!(fired, vec![(1, TimerAction::RevertMinimize)]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_due_timers_in_order() {
        let mut q = TimerQueue::new();
        q.schedule(2, 0.0, 500.0, TimerAction::RevertMinimize);
        q.schedule(1, 0.0, 100.0, TimerAction::RevertMinimize);

        let fired: Vec<WindowId> = q.take_due(1000.0).into_iter().map(|(w, _)| w).collect();
        assert_eq!(fired, vec![1, 2]);
    }

    #[test]
    fn test_cancel_owned() {
        let mut q = TimerQueue::new();
        q.schedule(1, 0.0, 100.0, TimerAction::RevertMinimize);
        q.schedule(1, 0.0, 200.0, TimerAction::Content(ContentEvent::Unmute));
        q.schedule(2, 0.0, 100.0, TimerAction::RevertMinimize);

        assert_eq!(q.cancel_owned(1), 2);
        assert_eq!(q.owned_by(1), 0);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_cancel_where() {
        let mut q = TimerQueue::new();
        q.schedule(1, 0.0, 100.0, TimerAction::RevertMinimize);
        q.schedule(1, 0.0, 200.0, TimerAction::Content(ContentEvent::Unmute));

        let removed = q.cancel_where(1, |a| matches!(a, TimerAction::RevertMinimize));
        assert_eq!(removed, 1);
        assert_eq!(q.owned_by(1), 1);
    }

    #[test]
    fn test_cancel_single() {
        let mut q = TimerQueue::new();
        let id = q.schedule(1, 0.0, 100.0, TimerAction::RevertMinimize);
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
    }
}
