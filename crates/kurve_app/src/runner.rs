//! Virtual time driver for headless runs

use kurve_core::{Scheduler, VirtualScheduler};
use std::time::{Duration, Instant};

/// How virtual time relates to wall-clock time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pacing {
    /// Fire timers back to back
    #[default]
    Immediate,
    /// Sleep until each timer's deadline
    Realtime,
}

/// Run the scheduler for `duration` of virtual time. Returns the number of
/// callbacks fired.
pub fn drive(scheduler: &VirtualScheduler, duration: Duration, pacing: Pacing) -> usize {
    let end = scheduler.now() + duration;
    match pacing {
        Pacing::Immediate => scheduler.advance_to(end),
        Pacing::Realtime => {
            let origin = Instant::now();
            let base = scheduler.now();
            let mut fired = 0;
            while let Some(deadline) = scheduler.next_deadline().filter(|d| *d <= end) {
                let wall = origin + (deadline - base);
                if let Some(wait) = wall.checked_duration_since(Instant::now()) {
                    std::thread::sleep(wait);
                }
                fired += scheduler.advance_to(deadline);
            }
            fired + scheduler.advance_to(end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_both_pacings_fire_the_same_timers() {
        for pacing in [Pacing::Immediate, Pacing::Realtime] {
            let scheduler = VirtualScheduler::new();
            let count = Rc::new(Cell::new(0));
            for delay in [1, 3, 5, 50] {
                let count = count.clone();
                scheduler.schedule_once(
                    Duration::from_millis(delay),
                    Box::new(move || count.set(count.get() + 1)),
                );
            }

            assert_eq!(drive(&scheduler, Duration::from_millis(10), pacing), 3);
            assert_eq!(count.get(), 3);
            assert_eq!(scheduler.now(), Duration::from_millis(10));
            assert_eq!(scheduler.pending_count(), 1);
        }
    }
}
