use chrono::{Local, NaiveTime};
use core_types::Severity;

/// Where pipeline components send human-readable progress.
pub trait StatusSink {
    /// `append = false` clears prior entries first.
    fn report(&mut self, message: &str, severity: Severity, append: bool);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusEntry {
    pub at: NaiveTime,
    pub severity: Severity,
    pub message: String,
}

impl StatusEntry {
    pub fn class_name(&self) -> String {
        format!("status-entry status-{}", self.severity)
    }

    /// `[HH:MM:SS] message`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

pub trait Clock {
    fn now(&self) -> NaiveTime;
}

pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Always reports the same time.
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

pub(crate) fn log_entry(entry: &StatusEntry) {
    let level = match entry.severity {
        Severity::Error => log::Level::Error,
        Severity::Warning => log::Level::Warn,
        Severity::Success | Severity::Info => log::Level::Info,
    };
    log::log!(target: "widget.status", level, "{}", entry.message);
}
