use core_types::{EventKind, TimerId};
use dom::{DomEvent, Id};
use std::sync::mpsc::{self, Receiver, Sender};

/// Re-entry points into the widget. Delivered one at a time; handlers never
/// overlap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetEvent {
    // Host page -> widget
    Dom { kind: EventKind, target: Id },
    // Timer queue -> widget
    RetryTick { timer: TimerId },
}

impl From<DomEvent> for WidgetEvent {
    fn from(event: DomEvent) -> Self {
        WidgetEvent::Dom {
            kind: event.kind,
            target: event.target,
        }
    }
}

pub struct Bus {
    pub evt_tx: Sender<WidgetEvent>, // shareable for event sources
    pub evt_rx: Receiver<WidgetEvent>,
}

impl Bus {
    pub fn new() -> Self {
        let (evt_tx, evt_rx) = mpsc::channel();
        Self { evt_tx, evt_rx }
    }

    pub fn send(&self, event: WidgetEvent) {
        // The receiver lives as long as `self`, so sending cannot fail.
        let _ = self.evt_tx.send(event);
    }

    /// Next queued event without blocking.
    pub fn try_next(&self) -> Option<WidgetEvent> {
        self.evt_rx.try_recv().ok()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
