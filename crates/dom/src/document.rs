//! Host page state that lives beside the tree: form-control values, nested
//! frame slots and registered event listeners.

use crate::tree::{DomTree, TreeError};
use crate::types::Id;
use core_types::{EventKind, ListenerId, WindowId};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// What an `iframe` element exposes as its content window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameSlot {
    Window(WindowId),
    /// Cross-origin frame; reading its content window throws.
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("cross-origin frame {0:?} blocked access to its content window")]
pub struct FrameBlocked(pub Id);

/// A listener invocation queued by a user edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomEvent {
    pub listener: ListenerId,
    pub kind: EventKind,
    pub target: Id,
}

#[derive(Clone, Copy, Debug)]
struct Listener {
    id: ListenerId,
    target: Id,
    kind: EventKind,
}

#[derive(Debug)]
pub struct HostDocument {
    tree: DomTree,
    frames: HashMap<Id, FrameSlot>,
    values: HashMap<Id, String>,
    listeners: Vec<Listener>,
    next_listener: u64,
    pending: VecDeque<DomEvent>,
}

impl HostDocument {
    pub fn new(tree: DomTree) -> Self {
        let mut doc = Self {
            tree,
            frames: HashMap::new(),
            values: HashMap::new(),
            listeners: Vec::new(),
            next_listener: 1,
            pending: VecDeque::new(),
        };
        doc.seed_form_values();
        doc
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Structural edits. Values of controls created afterwards are derived
    /// lazily from their markup until first written.
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    fn seed_form_values(&mut self) {
        let controls: Vec<Id> = self
            .tree
            .descendants(self.tree.document())
            .filter(|id| self.tree.has_tag(*id, "input") || self.tree.has_tag(*id, "textarea"))
            .collect();
        for id in controls {
            let initial = self.default_value(id);
            self.values.insert(id, initial);
        }
        log::trace!(target: "dom.document", "seeded {} form values", self.values.len());
    }

    fn default_value(&self, id: Id) -> String {
        if self.tree.has_tag(id, "textarea") {
            normalize_textarea_newlines(&self.tree.text_content(id))
        } else {
            self.tree.attr(id, "value").unwrap_or("").to_string()
        }
    }

    // --- frames ---

    pub fn attach_frame(&mut self, iframe: Id, slot: FrameSlot) -> Result<(), TreeError> {
        if !self.tree.has_tag(iframe, "iframe") {
            return Err(TreeError::WrongNodeKind(iframe));
        }
        self.frames.insert(iframe, slot);
        Ok(())
    }

    /// All `iframe` elements in document order.
    pub fn iframes(&self) -> Vec<Id> {
        self.tree.elements_by_tag("iframe")
    }

    /// `Ok(None)` for an iframe that has no browsing context yet.
    pub fn content_window(&self, iframe: Id) -> Result<Option<WindowId>, FrameBlocked> {
        match self.frames.get(&iframe) {
            Some(FrameSlot::Window(window)) => Ok(Some(*window)),
            Some(FrameSlot::Blocked) => Err(FrameBlocked(iframe)),
            None => Ok(None),
        }
    }

    // --- form values ---

    /// Current value of an `input` or `textarea`; `None` for anything else.
    pub fn value(&self, id: Id) -> Option<String> {
        if !(self.tree.has_tag(id, "input") || self.tree.has_tag(id, "textarea")) {
            return None;
        }
        Some(match self.values.get(&id) {
            Some(value) => value.clone(),
            None => self.default_value(id),
        })
    }

    /// Script-style assignment; fires no events.
    pub fn set_value(&mut self, id: Id, value: &str) -> Result<(), TreeError> {
        if !self.tree.contains(id) {
            return Err(TreeError::UnknownNode(id));
        }
        if !(self.tree.has_tag(id, "input") || self.tree.has_tag(id, "textarea")) {
            return Err(TreeError::WrongNodeKind(id));
        }
        let value = if self.tree.has_tag(id, "textarea") {
            normalize_textarea_newlines(value)
        } else {
            value.replace(['\r', '\n'], "")
        };
        self.values.insert(id, value);
        Ok(())
    }

    /// A user edit: replaces the value and queues `input` listeners.
    pub fn type_text(&mut self, id: Id, value: &str) -> Result<(), TreeError> {
        self.set_value(id, value)?;
        self.queue(id, EventKind::Input);
        Ok(())
    }

    /// The user committed the value (blur / enter): queues `change` listeners.
    pub fn commit(&mut self, id: Id) -> Result<(), TreeError> {
        if !self.tree.contains(id) {
            return Err(TreeError::UnknownNode(id));
        }
        self.queue(id, EventKind::Change);
        Ok(())
    }

    fn queue(&mut self, target: Id, kind: EventKind) {
        for listener in &self.listeners {
            if listener.target == target && listener.kind == kind {
                self.pending.push_back(DomEvent {
                    listener: listener.id,
                    kind,
                    target,
                });
            }
        }
    }

    // --- listeners ---

    pub fn add_event_listener(&mut self, target: Id, kind: EventKind) -> Result<ListenerId, TreeError> {
        if !self.tree.is_element(target) {
            return Err(TreeError::WrongNodeKind(target));
        }
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener { id, target, kind });
        Ok(id)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self, target: Id, kind: EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .count()
    }

    /// Drain queued listener invocations in dispatch order.
    pub fn take_events(&mut self) -> Vec<DomEvent> {
        self.pending.drain(..).collect()
    }

    // --- presentation ---

    pub fn is_disabled(&self, id: Id) -> bool {
        self.tree.has_attr(id, "disabled")
    }

    pub fn set_disabled(&mut self, id: Id, disabled: bool) -> Result<(), TreeError> {
        if disabled {
            self.tree.set_attr(id, "disabled", None)
        } else {
            self.tree.remove_attr(id, "disabled").map(|_| ())
        }
    }

    pub fn style_property(&self, id: Id, property: &str) -> Option<&str> {
        self.tree.style_property(id, property)
    }

    pub fn set_style_property(&mut self, id: Id, property: &str, value: &str) -> Result<(), TreeError> {
        self.tree.set_style_property(id, property, value)
    }
}

fn normalize_textarea_newlines(s: &str) -> String {
    // Textarea values store LF newlines only.
    if !s.contains('\r') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut it = s.chars().peekable();
    while let Some(ch) = it.next() {
        match ch {
            '\r' => {
                if it.peek() == Some(&'\n') {
                    let _ = it.next();
                }
                out.push('\n');
            }
            _ => out.push(ch),
        }
    }
    out
}
