//! Single-threaded driver: owns the frame, the timer queue and the bus, and
//! feeds events to the widget one at a time.

use crate::capability::{EmbeddedFrame, FrameHost};
use crate::config::WidgetValues;
use crate::error::WidgetError;
use crate::status::Clock;
use crate::timers::TimerQueue;
use crate::widget::Widget;
use bus::{Bus, WidgetEvent};
use core_types::WindowId;
use dom::{Id, TreeError};
use std::time::Duration;

pub struct Runtime {
    frame: EmbeddedFrame,
    timers: TimerQueue,
    bus: Bus,
    widget: Widget,
}

impl Runtime {
    /// Construct the widget inside `frame` and run the first discovery pass.
    pub fn start(
        frame: EmbeddedFrame,
        values: WidgetValues,
        clock: Box<dyn Clock>,
    ) -> Result<Self, WidgetError> {
        let widget = Widget::new(values, clock)?;
        let mut runtime = Self {
            frame,
            timers: TimerQueue::new(),
            bus: Bus::new(),
            widget,
        };
        if let Err(err) = runtime.widget.discover(&mut runtime.frame, &mut runtime.timers) {
            log::info!(target: "widget.runtime", "initial discovery incomplete: {err}");
        }
        Ok(runtime)
    }

    /// Forward queued host events to the bus and handle everything on it.
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        for event in self.frame.host_mut().take_events() {
            self.bus.send(event.into());
        }
        let mut handled = 0;
        while let Some(event) = self.bus.try_next() {
            self.widget
                .handle_event(&event, &mut self.frame, &mut self.timers);
            handled += 1;
            // Handlers may have queued more host events.
            for event in self.frame.host_mut().take_events() {
                self.bus.send(event.into());
            }
        }
        handled
    }

    /// Move the virtual clock forward by `by`, delivering every tick that
    /// falls due on the way.
    pub fn advance(&mut self, by: Duration) {
        let until = self.timers.now() + by;
        while let Some(timer) = self.timers.next_due(until) {
            self.bus.send(WidgetEvent::RetryTick { timer });
            self.pump();
        }
        self.timers.settle(until);
    }

    /// A user edit on a host element, followed by event delivery.
    pub fn type_text(&mut self, id: Id, value: &str) -> Result<(), TreeError> {
        self.frame.host_mut().type_text(id, value)?;
        self.pump();
        Ok(())
    }

    /// The user commits the value of a host element.
    pub fn commit(&mut self, id: Id) -> Result<(), TreeError> {
        self.frame.host_mut().commit(id)?;
        self.pump();
        Ok(())
    }

    /// Run another discovery pass outside the timer, as a host re-render
    /// would.
    pub fn rediscover(&mut self) {
        let _ = self.widget.discover(&mut self.frame, &mut self.timers);
        self.pump();
    }

    pub fn frame(&self) -> &EmbeddedFrame {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut EmbeddedFrame {
        &mut self.frame
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn window(&self) -> WindowId {
        self.frame.window()
    }
}
