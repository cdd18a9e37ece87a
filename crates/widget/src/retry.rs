use crate::timers::IntervalTimers;
use core_types::TimerId;
use std::time::Duration;

pub const RETRY_PERIOD: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryPhase {
    Idle,
    Polling,
}

/// Holds at most one live repeating timer. Per widget instance.
#[derive(Debug)]
pub struct RetryScheduler {
    timer: Option<TimerId>,
    period: Duration,
}

impl RetryScheduler {
    pub fn new() -> Self {
        Self::with_period(RETRY_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            timer: None,
            period,
        }
    }

    pub fn phase(&self) -> RetryPhase {
        if self.timer.is_some() {
            RetryPhase::Polling
        } else {
            RetryPhase::Idle
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Whether a tick from `id` belongs to the live timer.
    pub fn is_live(&self, id: TimerId) -> bool {
        self.timer == Some(id)
    }

    /// Idle -> Polling. Returns `false` (and creates nothing) when already
    /// polling.
    pub fn start<T: IntervalTimers + ?Sized>(&mut self, timers: &mut T) -> bool {
        if self.timer.is_some() {
            return false;
        }
        let id = timers.set_interval(self.period);
        log::debug!(target: "widget.retry", "polling every {:?} with {id:?}", self.period);
        self.timer = Some(id);
        true
    }

    /// Polling -> Idle. Returns `false` when already idle.
    pub fn stop<T: IntervalTimers + ?Sized>(&mut self, timers: &mut T) -> bool {
        let Some(id) = self.timer.take() else {
            return false;
        };
        timers.clear_interval(id);
        log::debug!(target: "widget.retry", "stopped polling {id:?}");
        true
    }
}

impl Default for RetryScheduler {
    fn default() -> Self {
        Self::new()
    }
}
