//! Enables the host button only while the textbox value matches the pattern.

use core_types::{EventKind, ListenerId};
use dom::{HostDocument, Id, TreeError};
use regress::Regex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        self == Verdict::Valid
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    pub textbox: Id,
    pub button: Id,
    pub listeners: [ListenerId; 2],
}

pub struct ValidationGate {
    pattern: Regex,
    binding: Option<Binding>,
}

impl ValidationGate {
    pub fn new(pattern: Regex) -> Self {
        Self {
            pattern,
            binding: None,
        }
    }

    /// Compile an ECMAScript pattern source with no flags, as `new RegExp(source)`
    /// would.
    pub fn compile(source: &str) -> Result<Self, regress::Error> {
        Ok(Self::new(Regex::new(source)?))
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn is_installed(&self) -> bool {
        self.binding.is_some()
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn check(&self, value: &str) -> Verdict {
        if self.pattern.find(value).is_some() {
            Verdict::Valid
        } else {
            Verdict::Invalid
        }
    }

    /// Bind to `textbox`/`button`, listen for `input` and `change` on the
    /// textbox and evaluate once. `Ok(None)` when already installed; the
    /// first binding is kept.
    pub fn install(
        &mut self,
        doc: &mut HostDocument,
        textbox: Id,
        button: Id,
    ) -> Result<Option<Verdict>, TreeError> {
        if self.binding.is_some() {
            return Ok(None);
        }

        let on_input = doc.add_event_listener(textbox, EventKind::Input)?;
        let on_change = match doc.add_event_listener(textbox, EventKind::Change) {
            Ok(id) => id,
            Err(err) => {
                doc.remove_event_listener(on_input);
                return Err(err);
            }
        };
        self.binding = Some(Binding {
            textbox,
            button,
            listeners: [on_input, on_change],
        });
        log::debug!(target: "widget.gate", "installed on {textbox:?} -> {button:?}");

        Ok(self.evaluate(doc))
    }

    /// React to a host event. Events for other elements are ignored.
    pub fn on_event(&self, doc: &mut HostDocument, kind: EventKind, target: Id) -> Option<Verdict> {
        let binding = self.binding?;
        if target != binding.textbox {
            log::trace!(target: "widget.gate", "ignoring {} on {target:?}", kind.as_str());
            return None;
        }
        self.evaluate(doc)
    }

    /// Recompute validity from the current value and apply it to the button.
    /// `None` when not installed or when a bound element has left the
    /// document.
    pub fn evaluate(&self, doc: &mut HostDocument) -> Option<Verdict> {
        let binding = self.binding?;
        let tree = doc.tree();
        if !tree.is_connected(binding.textbox) || !tree.is_connected(binding.button) {
            log::warn!(
                target: "widget.gate",
                "bound element left the document; skipping validation"
            );
            return None;
        }

        let value = doc.value(binding.textbox).unwrap_or_default();
        let verdict = self.check(&value);
        if let Err(err) = apply(doc, binding.button, verdict) {
            log::warn!(target: "widget.gate", "cannot update button: {err}");
            return None;
        }
        Some(verdict)
    }
}

fn apply(doc: &mut HostDocument, button: Id, verdict: Verdict) -> Result<(), TreeError> {
    let (opacity, cursor) = match verdict {
        Verdict::Valid => ("1", "pointer"),
        Verdict::Invalid => ("0.5", "not-allowed"),
    };
    doc.set_disabled(button, !verdict.is_valid())?;
    doc.set_style_property(button, "opacity", opacity)?;
    doc.set_style_property(button, "cursor", cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{DomTree, Node};

    const PATTERN: &str = r"^ABC-\d+-DEF$";

    fn host(value: &str) -> (HostDocument, Id, Id) {
        let tree = DomTree::from_nodes(&[Node::element("body").with_children([
            Node::element("input")
                .with_attr("id", "code")
                .with_attr("value", value),
            Node::element("button").with_attr("id", "send"),
        ])]);
        let textbox = tree.element_by_id("code").unwrap();
        let button = tree.element_by_id("send").unwrap();
        (HostDocument::new(tree), textbox, button)
    }

    fn button_state(doc: &HostDocument, button: Id) -> (bool, Option<&str>, Option<&str>) {
        (
            doc.is_disabled(button),
            doc.style_property(button, "opacity"),
            doc.style_property(button, "cursor"),
        )
    }

    #[test]
    fn matching_value_enables_the_button() {
        let (mut doc, textbox, button) = host("ABC-123-DEF");
        let mut gate = ValidationGate::compile(PATTERN).unwrap();

        assert_eq!(gate.install(&mut doc, textbox, button).unwrap(), Some(Verdict::Valid));
        assert_eq!(button_state(&doc, button), (false, Some("1"), Some("pointer")));
    }

    #[test]
    fn non_matching_value_disables_the_button() {
        let (mut doc, textbox, button) = host("xyz");
        let mut gate = ValidationGate::compile(PATTERN).unwrap();

        assert_eq!(gate.install(&mut doc, textbox, button).unwrap(), Some(Verdict::Invalid));
        assert_eq!(
            button_state(&doc, button),
            (true, Some("0.5"), Some("not-allowed"))
        );
    }

    #[test]
    fn re_evaluating_is_idempotent() {
        let (mut doc, textbox, button) = host("xyz");
        let mut gate = ValidationGate::compile(PATTERN).unwrap();
        gate.install(&mut doc, textbox, button).unwrap();

        let before = button_state(&doc, button);
        let before = (before.0, before.1.map(str::to_owned), before.2.map(str::to_owned));
        assert_eq!(gate.evaluate(&mut doc), Some(Verdict::Invalid));
        assert_eq!(gate.evaluate(&mut doc), Some(Verdict::Invalid));
        let after = button_state(&doc, button);
        assert_eq!(
            before,
            (after.0, after.1.map(str::to_owned), after.2.map(str::to_owned))
        );
    }

    #[test]
    fn install_is_one_shot() {
        let (mut doc, textbox, button) = host("");
        let mut gate = ValidationGate::compile(PATTERN).unwrap();

        assert!(gate.install(&mut doc, textbox, button).unwrap().is_some());
        assert_eq!(gate.install(&mut doc, textbox, button).unwrap(), None);
        assert_eq!(doc.listener_count(textbox, EventKind::Input), 1);
        assert_eq!(doc.listener_count(textbox, EventKind::Change), 1);
    }

    #[test]
    fn events_follow_the_current_value() {
        let (mut doc, textbox, button) = host("");
        let mut gate = ValidationGate::compile(PATTERN).unwrap();
        gate.install(&mut doc, textbox, button).unwrap();

        doc.set_value(textbox, "ABC-9-DEF").unwrap();
        assert_eq!(gate.on_event(&mut doc, EventKind::Input, textbox), Some(Verdict::Valid));
        assert!(!doc.is_disabled(button));

        doc.set_value(textbox, "ABC-9-DEFG").unwrap();
        assert_eq!(gate.on_event(&mut doc, EventKind::Change, textbox), Some(Verdict::Invalid));
        assert!(doc.is_disabled(button));
    }

    #[test]
    fn foreign_targets_are_ignored() {
        let (mut doc, textbox, button) = host("xyz");
        let mut gate = ValidationGate::compile(PATTERN).unwrap();
        gate.install(&mut doc, textbox, button).unwrap();

        assert_eq!(gate.on_event(&mut doc, EventKind::Input, button), None);
    }

    #[test]
    fn detached_textbox_skips_evaluation() {
        let (mut doc, textbox, button) = host("ABC-1-DEF");
        let mut gate = ValidationGate::compile(PATTERN).unwrap();
        gate.install(&mut doc, textbox, button).unwrap();

        doc.tree_mut().remove(textbox).unwrap();
        assert_eq!(gate.evaluate(&mut doc), None);
        assert!(!doc.is_disabled(button));
    }

    #[test]
    fn uninstalled_gate_does_nothing() {
        let (mut doc, textbox, _) = host("ABC-1-DEF");
        let gate = ValidationGate::compile(PATTERN).unwrap();
        assert_eq!(gate.on_event(&mut doc, EventKind::Input, textbox), None);
        assert_eq!(gate.evaluate(&mut doc), None);
    }

    #[test]
    fn invalid_patterns_fail_to_compile() {
        assert!(ValidationGate::compile("(unclosed").is_err());
    }

    #[test]
    fn lookahead_rules_compile_and_apply() {
        let gate = ValidationGate::compile(r"^(?=.*\d)[A-Z0-9-]+$").unwrap();
        assert_eq!(gate.check("AB-1"), Verdict::Valid);
        assert_eq!(gate.check("AB-C"), Verdict::Invalid);
    }

    #[test]
    fn digit_class_is_ascii_only() {
        let gate = ValidationGate::compile(PATTERN).unwrap();
        assert_eq!(gate.check("ABC-\u{661}\u{662}\u{663}-DEF"), Verdict::Invalid);
        assert_eq!(gate.check("ABC-\u{FF11}-DEF"), Verdict::Invalid);
        assert_eq!(gate.check("ABC-123-DEF"), Verdict::Valid);
    }

    #[test]
    fn unanchored_patterns_match_anywhere() {
        let gate = ValidationGate::compile("ABC").unwrap();
        assert_eq!(gate.check("xxABCxx"), Verdict::Valid);
    }
}
