//! The discovery pipeline, its reporting and the retry loop, per instance.

use crate::capability::FrameHost;
use crate::config::WidgetValues;
use crate::discovery::{
    DiscoveryError, DiscoveryResult, FoundControls, describe, find_controls, locate_own_iframe,
};
use crate::error::WidgetError;
use crate::gate::{ValidationGate, Verdict};
use crate::page::WidgetPage;
use crate::retry::{RetryPhase, RetryScheduler};
use crate::status::{Clock, StatusSink};
use crate::timers::IntervalTimers;
use bus::WidgetEvent;
use core_types::Severity;
use dom::{DomTree, HostDocument};

const REMEDIATION: &str =
    "This widget requires 'allow-same-origin' in iframe sandbox or same-origin pages.";

pub struct Widget {
    values: WidgetValues,
    page: WidgetPage,
    gate: ValidationGate,
    retry: RetryScheduler,
    attempts: u32,
}

impl Widget {
    /// Compile the pattern and render the configured values. Discovery is
    /// started separately.
    pub fn new(values: WidgetValues, clock: Box<dyn Clock>) -> Result<Self, WidgetError> {
        let gate = ValidationGate::compile(&values.validation_pattern).map_err(|err| {
            WidgetError::InvalidPattern {
                pattern: values.validation_pattern.clone(),
                reason: err.to_string(),
            }
        })?;
        let mut page = WidgetPage::new(clock);
        page.render_values(&values);
        Ok(Self {
            values,
            page,
            gate,
            retry: RetryScheduler::new(),
            attempts: 0,
        })
    }

    /// One full pass. Success installs the gate (once) and stops polling;
    /// retryable failures start polling; denied access stops everything.
    pub fn discover<F, T>(&mut self, frame: &mut F, timers: &mut T) -> Result<FoundControls, DiscoveryError>
    where
        F: FrameHost + ?Sized,
        T: IntervalTimers + ?Sized,
    {
        self.attempts += 1;
        let own = frame.window();
        log::debug!(target: "widget.discovery", "attempt {} for {own:?}", self.attempts);

        let doc = match frame.parent_document() {
            Ok(doc) => doc,
            Err(denied) => {
                self.page.report(
                    &format!("Cannot access parent DOM: {denied}"),
                    Severity::Error,
                    false,
                );
                self.page.report(REMEDIATION, Severity::Warning, true);
                self.stop_polling(timers, false);
                return Err(denied.into());
            }
        };

        let Some(iframe) = locate_own_iframe(doc, own) else {
            self.page.report(
                "Could not find the widget iframe in the parent document",
                Severity::Error,
                false,
            );
            self.start_polling(timers);
            return Err(DiscoveryError::IframeNotFound);
        };
        self.page
            .report("Found the widget iframe element", Severity::Success, false);

        match find_controls(doc.tree(), iframe) {
            Ok(found) => {
                self.report_partial(doc.tree(), &DiscoveryResult {
                    textbox: Some(found.textbox),
                    button: Some(found.button),
                });
                self.install_gate(doc, found);
                self.stop_polling(timers, true);
                Ok(found)
            }
            Err(err) => {
                if let DiscoveryError::IncompleteElementSet { partial, .. } = &err {
                    self.report_partial(doc.tree(), partial);
                }
                self.page.report(&err.to_string(), Severity::Error, true);
                self.start_polling(timers);
                Err(err)
            }
        }
    }

    /// Handle one event from the bus.
    pub fn handle_event<F, T>(&mut self, event: &WidgetEvent, frame: &mut F, timers: &mut T)
    where
        F: FrameHost + ?Sized,
        T: IntervalTimers + ?Sized,
    {
        match *event {
            WidgetEvent::Dom { kind, target } => {
                let Ok(doc) = frame.parent_document() else {
                    log::debug!(target: "widget", "dropping {} event: parent not readable", kind.as_str());
                    return;
                };
                if let Some(verdict) = self.gate.on_event(doc, kind, target) {
                    self.show_verdict(verdict);
                }
            }
            WidgetEvent::RetryTick { timer } => {
                if !self.retry.is_live(timer) {
                    log::trace!(target: "widget.retry", "stale tick from {timer:?}");
                    return;
                }
                self.page
                    .report("Retrying element search...", Severity::Info, true);
                // Failures are reported and rescheduled inside `discover`.
                let _ = self.discover(frame, timers);
            }
        }
    }

    pub fn retry_phase(&self) -> RetryPhase {
        self.retry.phase()
    }

    pub fn retry(&self) -> &RetryScheduler {
        &self.retry
    }

    /// Discovery passes run so far, the first one included.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn gate(&self) -> &ValidationGate {
        &self.gate
    }

    pub fn page(&self) -> &WidgetPage {
        &self.page
    }

    pub fn values(&self) -> &WidgetValues {
        &self.values
    }

    fn report_partial(&mut self, tree: &DomTree, partial: &DiscoveryResult) {
        if let Some(textbox) = partial.textbox {
            let label = describe(tree, textbox.id);
            self.page
                .report(&format!("Found input: {label}"), Severity::Success, true);
        }
        if let Some(button) = partial.button {
            let label = describe(tree, button.id);
            self.page
                .report(&format!("Found button: {label}"), Severity::Success, true);
        }
    }

    fn install_gate(&mut self, doc: &mut HostDocument, found: FoundControls) {
        match self.gate.install(doc, found.textbox.id, found.button.id) {
            Ok(Some(verdict)) => {
                self.page.report(
                    "Textbox validation handler attached - button will be enabled when validation passes",
                    Severity::Success,
                    true,
                );
                self.show_verdict(verdict);
            }
            Ok(None) => {}
            Err(err) => {
                self.page.report(
                    &format!("Cannot attach validation handler: {err}"),
                    Severity::Error,
                    true,
                );
            }
        }
    }

    fn show_verdict(&mut self, verdict: Verdict) {
        let message = self.values.validation_message.clone();
        self.page
            .show_validation_result(&message, verdict.is_valid());
    }

    fn start_polling<T: IntervalTimers + ?Sized>(&mut self, timers: &mut T) {
        if self.retry.start(timers) {
            self.page.report(
                "Will retry finding elements every second...",
                Severity::Info,
                true,
            );
        }
    }

    fn stop_polling<T: IntervalTimers + ?Sized>(&mut self, timers: &mut T, found: bool) {
        if self.retry.stop(timers) && found {
            self.page.report(
                "Retry interval stopped - elements found",
                Severity::Success,
                true,
            );
        }
    }
}
