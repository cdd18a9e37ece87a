//! An embedded widget that finds the host page's nearest textbox and button
//! and keeps the button disabled until the textbox matches a pattern.

pub mod capability;
pub mod config;
pub mod discovery;
pub mod gate;
pub mod page;
pub mod retry;
pub mod runtime;
pub mod status;
pub mod timers;

mod error;
mod widget;

pub use capability::{AccessDenied, AccessPolicy, EmbeddedFrame, FrameHost};
pub use config::{ConfigError, Defaults, JsonValues, TomlValues, ValuesResolver, WidgetValues};
pub use discovery::{DiscoveryError, FoundControls};
pub use error::WidgetError;
pub use gate::{ValidationGate, Verdict};
pub use page::WidgetPage;
pub use retry::{RetryPhase, RetryScheduler};
pub use runtime::Runtime;
pub use status::{Clock, FixedClock, LocalClock, StatusEntry, StatusSink};
pub use timers::{IntervalTimers, TimerQueue};
pub use widget::Widget;
