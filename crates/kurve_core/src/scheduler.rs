//! Timer scheduling
//!
//! Every self-advancing component (animation clock, sprite player, drag loop)
//! drives itself through one-shot timers requested from a [`Scheduler`]. Each
//! request returns a [`TimerId`] the component stores so it can cancel the
//! pending callback before issuing a new one.
//!
//! [`VirtualScheduler`] is a deterministic implementation on virtual time: it
//! only moves when told to, which makes timing behavior testable without
//! sleeping.

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

new_key_type! {
    /// Handle to a pending one-shot timer
    pub struct TimerId;
}

/// Callback invoked when a timer fires
pub type TimerCallback = Box<dyn FnOnce()>;

/// Single-threaded one-shot timer service.
///
/// Methods take `&self` so callbacks may schedule and cancel timers while the
/// scheduler is dispatching.
pub trait Scheduler {
    /// Current time on this scheduler's clock
    fn now(&self) -> Duration;

    /// Run `callback` once after `delay`
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending timer.
    ///
    /// Returns `false` if the timer already fired or was already cancelled. A
    /// callback that is currently running is not interrupted.
    fn cancel(&self, id: TimerId) -> bool;
}

struct PendingTimer {
    deadline: Duration,
    /// Insertion order, breaks ties between equal deadlines
    seq: u64,
    callback: TimerCallback,
}

struct SchedulerState {
    now: Duration,
    next_seq: u64,
    timers: SlotMap<TimerId, PendingTimer>,
    /// Fire order; entries of cancelled timers linger until they reach the top
    queue: BinaryHeap<Reverse<(Duration, u64, TimerId)>>,
}

impl SchedulerState {
    /// Drop cancelled entries from the top of the queue and return the live
    /// earliest one
    fn peek_live(&mut self) -> Option<(Duration, u64, TimerId)> {
        while let Some(&Reverse((deadline, seq, id))) = self.queue.peek() {
            if self.timers.get(id).is_some_and(|timer| timer.seq == seq) {
                return Some((deadline, seq, id));
            }
            self.queue.pop();
        }
        None
    }
}

/// Deterministic scheduler running on virtual time.
///
/// Timers fire in `(deadline, insertion order)` order. Time only advances
/// through [`advance`](Self::advance), [`advance_to`](Self::advance_to) and
/// [`fire_next`](Self::fire_next).
pub struct VirtualScheduler {
    state: RefCell<SchedulerState>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(SchedulerState {
                now: Duration::ZERO,
                next_seq: 0,
                timers: SlotMap::with_key(),
                queue: BinaryHeap::new(),
            }),
        }
    }

    /// Number of timers waiting to fire
    pub fn pending_count(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Check if a specific timer is still waiting to fire
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.state.borrow().timers.contains_key(id)
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state
            .borrow_mut()
            .peek_live()
            .map(|(deadline, _, _)| deadline)
    }

    /// Advance virtual time by `by`, firing every timer that comes due.
    ///
    /// Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        self.advance_to(target)
    }

    /// Advance virtual time to `target`, firing every timer that comes due.
    ///
    /// Timers scheduled by callbacks are fired too if their deadline is not
    /// after `target`. Returns the number of callbacks run.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        while let Some(callback) = self.take_due(target) {
            callback();
            fired += 1;
        }

        let mut state = self.state.borrow_mut();
        if target > state.now {
            state.now = target;
        }
        if fired > 0 {
            tracing::trace!(fired, now = ?state.now, "virtual scheduler advanced");
        }
        fired
    }

    /// Jump to the earliest pending deadline and fire that single timer.
    ///
    /// Returns the new time, or `None` if nothing was pending.
    pub fn fire_next(&self) -> Option<Duration> {
        let deadline = self.next_deadline()?;
        let callback = self.take_due(deadline)?;
        callback();
        Some(self.now())
    }

    /// Remove the earliest timer due at or before `target` and move the clock
    /// to its deadline. The state borrow is released before returning so the
    /// callback can reach back into the scheduler.
    fn take_due(&self, target: Duration) -> Option<TimerCallback> {
        let mut state = self.state.borrow_mut();
        let (deadline, _, id) = state.peek_live()?;
        if deadline > target {
            return None;
        }
        state.queue.pop();
        let timer = state.timers.remove(id)?;
        if timer.deadline > state.now {
            state.now = timer.deadline;
        }
        Some(timer.callback)
    }
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> Duration {
        self.state.borrow().now
    }

    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let mut state = self.state.borrow_mut();
        let deadline = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        let id = state.timers.insert(PendingTimer {
            deadline,
            seq,
            callback,
        });
        state.queue.push(Reverse((deadline, seq, id)));
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        // Dropped after the borrow ends: the callback may own state whose
        // destructor cancels other timers.
        let removed = {
            let mut state = self.state.borrow_mut();
            let removed = state.timers.remove(id);
            if state.timers.is_empty() {
                state.queue.clear();
            }
            removed
        };
        removed.is_some()
    }
}

impl std::fmt::Debug for VirtualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("VirtualScheduler")
            .field("now", &state.now)
            .field("pending", &state.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let scheduler = VirtualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, tag) in [(30, "c"), (10, "a"), (20, "b"), (10, "a2")] {
            let log = log.clone();
            scheduler.schedule_once(ms(delay), Box::new(move || log.borrow_mut().push(tag)));
        }

        assert_eq!(scheduler.advance(ms(100)), 4);
        assert_eq!(*log.borrow(), vec!["a", "a2", "b", "c"]);
        assert_eq!(scheduler.now(), ms(100));
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let scheduler = VirtualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        let id = scheduler.schedule_once(ms(10), Box::new(move || l.borrow_mut().push(1)));
        assert!(scheduler.is_pending(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));

        scheduler.advance(ms(50));
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_callbacks_can_reschedule() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let count = Rc::new(RefCell::new(0u32));

        fn tick(scheduler: Rc<VirtualScheduler>, count: Rc<RefCell<u32>>) {
            *count.borrow_mut() += 1;
            let s = scheduler.clone();
            scheduler.schedule_once(ms(25), Box::new(move || tick(s, count)));
        }

        let s = scheduler.clone();
        let c = count.clone();
        scheduler.schedule_once(ms(25), Box::new(move || tick(s, c)));

        scheduler.advance(ms(100));
        assert_eq!(*count.borrow(), 4);
        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(scheduler.next_deadline(), Some(ms(125)));
    }

    #[test]
    fn test_timer_times_observe_deadline() {
        let scheduler = Rc::new(VirtualScheduler::new());
        let seen = Rc::new(RefCell::new(None));

        let s = scheduler.clone();
        let seen_clone = seen.clone();
        scheduler.schedule_once(
            ms(40),
            Box::new(move || *seen_clone.borrow_mut() = Some(s.now())),
        );

        scheduler.advance(ms(1000));
        assert_eq!(*seen.borrow(), Some(ms(40)));
    }

    #[test]
    fn test_cancelled_timers_do_not_block_order() {
        let scheduler = VirtualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut cancelled = Vec::new();
        for delay in 1..=1000 {
            cancelled.push(scheduler.schedule_once(ms(delay), Box::new(|| {})));
        }
        let l = log.clone();
        scheduler.schedule_once(ms(500), Box::new(move || l.borrow_mut().push("kept")));
        for id in cancelled.drain(..999) {
            assert!(scheduler.cancel(id));
        }

        assert_eq!(scheduler.next_deadline(), Some(ms(500)));
        assert_eq!(scheduler.advance(ms(2000)), 2);
        assert_eq!(*log.borrow(), vec!["kept"]);
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn test_fire_next_jumps_time() {
        let scheduler = VirtualScheduler::new();
        scheduler.schedule_once(ms(70), Box::new(|| {}));
        scheduler.schedule_once(ms(30), Box::new(|| {}));

        assert_eq!(scheduler.fire_next(), Some(ms(30)));
        assert_eq!(scheduler.fire_next(), Some(ms(70)));
        assert_eq!(scheduler.fire_next(), None);
    }
}
