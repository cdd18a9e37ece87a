//! Repeating timers on a virtual clock.

use core_types::TimerId;
use std::collections::BTreeMap;
use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// `setInterval` / `clearInterval`.
pub trait IntervalTimers {
    fn set_interval(&mut self, period: Duration) -> TimerId;

    /// Returns whether the timer was live.
    fn clear_interval(&mut self, id: TimerId) -> bool;
}

#[derive(Clone, Copy, Debug)]
struct Interval {
    period: Duration,
    due: Duration,
}

/// Intervals ordered by deadline. Time only moves when the owner advances it,
/// one deadline at a time, so each tick can be handled before the next is
/// computed.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    intervals: BTreeMap<TimerId, Interval>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn live_count(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_live(&self, id: TimerId) -> bool {
        self.intervals.contains_key(&id)
    }

    /// Pop the earliest deadline at or before `until`, moving the clock to it
    /// and rescheduling that interval one period later. Ties fire in creation
    /// order.
    pub fn next_due(&mut self, until: Duration) -> Option<TimerId> {
        let (id, interval) = self
            .intervals
            .iter_mut()
            .filter(|(_, i)| i.due <= until)
            .min_by_key(|(id, i)| (i.due, **id))?;
        self.now = self.now.max(interval.due);
        interval.due += interval.period;
        Some(*id)
    }

    /// Move the clock forward without firing anything.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl IntervalTimers for TimerQueue {
    fn set_interval(&mut self, period: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let period = period.max(MIN_PERIOD);
        self.intervals.insert(
            id,
            Interval {
                period,
                due: self.now + period,
            },
        );
        id
    }

    fn clear_interval(&mut self, id: TimerId) -> bool {
        self.intervals.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn interval_fires_once_per_period() {
        let mut timers = TimerQueue::new();
        let id = timers.set_interval(SECOND);

        assert_eq!(timers.next_due(Duration::from_millis(999)), None);
        assert_eq!(timers.next_due(3 * SECOND), Some(id));
        assert_eq!(timers.now(), SECOND);
        assert_eq!(timers.next_due(3 * SECOND), Some(id));
        assert_eq!(timers.next_due(3 * SECOND), Some(id));
        assert_eq!(timers.next_due(3 * SECOND), None);
        assert_eq!(timers.now(), 3 * SECOND);
    }

    #[test]
    fn cleared_intervals_stop_firing() {
        let mut timers = TimerQueue::new();
        let id = timers.set_interval(SECOND);
        assert!(timers.clear_interval(id));
        assert!(!timers.clear_interval(id));
        assert_eq!(timers.next_due(10 * SECOND), None);
        assert_eq!(timers.live_count(), 0);
    }

    #[test]
    fn earliest_deadline_wins_and_ties_keep_creation_order() {
        let mut timers = TimerQueue::new();
        let slow = timers.set_interval(2 * SECOND);
        let fast = timers.set_interval(SECOND);
        let also_slow = timers.set_interval(2 * SECOND);

        let fired: Vec<_> = std::iter::from_fn(|| timers.next_due(2 * SECOND)).collect();
        assert_eq!(fired, vec![fast, slow, fast, also_slow]);
    }

    #[test]
    fn new_intervals_start_from_the_current_time() {
        let mut timers = TimerQueue::new();
        timers.settle(5 * SECOND);
        let id = timers.set_interval(SECOND);
        assert_eq!(timers.next_due(5 * SECOND), None);
        assert_eq!(timers.next_due(6 * SECOND), Some(id));
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut timers = TimerQueue::new();
        let id = timers.set_interval(Duration::ZERO);
        assert_eq!(timers.next_due(Duration::ZERO), None);
        assert_eq!(timers.next_due(MIN_PERIOD), Some(id));
    }
}
