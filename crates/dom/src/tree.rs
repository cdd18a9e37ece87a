//! Arena-backed document tree.
//!
//! Invariants:
//! - `Id::DOCUMENT` is always live and is the only parentless node that is
//!   considered connected.
//! - A node has at most one parent; operations never create cycles.
//! - Removed nodes stay in the arena but are no longer live; their ids are
//!   never reused.
//! - Element and attribute names are canonical ASCII-lowercase.

use crate::types::{Id, Node};
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown node {0:?}")]
    UnknownNode(Id),
    #[error("node {0:?} cannot have children")]
    InvalidParent(Id),
    #[error("node {0:?} already has a parent")]
    AlreadyAttached(Id),
    #[error("{before:?} is not a child of {parent:?}")]
    InvalidSibling { parent: Id, before: Id },
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: Id, child: Id },
    #[error("node {0:?} is not an element")]
    WrongNodeKind(Id),
}

#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<NodeRecord>,
}

#[derive(Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<Id>,
    children: Vec<Id>,
    live: bool,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element { .. })
    }
}

#[derive(Debug)]
enum NodeKind {
    Document,
    Element {
        name: Arc<str>,
        attributes: Vec<(Arc<str>, Option<String>)>,
        style: Vec<(String, String)>,
    },
    Text {
        text: String,
    },
    Comment {
        #[allow(dead_code)]
        text: String,
    },
}

impl DomTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
                live: true,
            }],
        }
    }

    /// Build a tree whose document node holds `roots` in order.
    pub fn from_nodes(roots: &[Node]) -> Self {
        let mut tree = Self::new();
        for root in roots {
            tree.materialize_under(Id::DOCUMENT, root);
        }
        tree
    }

    pub fn document(&self) -> Id {
        Id::DOCUMENT
    }

    // --- construction ---

    pub fn create_element(&mut self, name: &str) -> Id {
        self.insert(NodeKind::Element {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes: Vec::new(),
            style: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> Id {
        self.insert(NodeKind::Text { text: text.into() })
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> Id {
        self.insert(NodeKind::Comment { text: text.into() })
    }

    /// Materialize an owned node subtree and append it to `parent`.
    pub fn append_node(&mut self, parent: Id, node: &Node) -> Result<Id, TreeError> {
        let parent_record = self.record(parent).ok_or(TreeError::UnknownNode(parent))?;
        if !parent_record.allows_children() {
            return Err(TreeError::InvalidParent(parent));
        }
        Ok(self.materialize_under(parent, node))
    }

    fn materialize_under(&mut self, parent: Id, node: &Node) -> Id {
        let mut stack: Vec<(Id, &Node)> = vec![(parent, node)];
        let mut first = None;
        while let Some((parent, node)) = stack.pop() {
            let id = match node {
                Node::Element {
                    name,
                    attributes,
                    children,
                } => {
                    let id = self.insert(NodeKind::Element {
                        name: Arc::clone(name),
                        attributes: attributes.clone(),
                        style: Vec::new(),
                    });
                    for child in children.iter().rev() {
                        stack.push((id, child));
                    }
                    id
                }
                Node::Text { text } => self.insert(NodeKind::Text { text: text.clone() }),
                Node::Comment { text } => self.insert(NodeKind::Comment { text: text.clone() }),
            };
            self.link(parent, id);
            first.get_or_insert(id);
        }
        // The stack always starts non-empty, so the first pop assigns.
        first.unwrap_or(parent)
    }

    /// Arena slots handed out so far, retired ones included.
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }

    fn insert(&mut self, kind: NodeKind) -> Id {
        let id = Id(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
            live: true,
        });
        id
    }

    fn link(&mut self, parent: Id, child: Id) {
        self.nodes[parent.0 as usize].children.push(child);
        self.nodes[child.0 as usize].parent = Some(parent);
    }

    pub fn append_child(&mut self, parent: Id, child: Id) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        self.link(parent, child);
        Ok(())
    }

    pub fn insert_before(&mut self, parent: Id, child: Id, before: Id) -> Result<(), TreeError> {
        self.check_attach(parent, child)?;
        let pos = self.nodes[parent.0 as usize]
            .children
            .iter()
            .position(|k| *k == before)
            .ok_or(TreeError::InvalidSibling { parent, before })?;
        self.nodes[parent.0 as usize].children.insert(pos, child);
        self.nodes[child.0 as usize].parent = Some(parent);
        Ok(())
    }

    fn check_attach(&self, parent: Id, child: Id) -> Result<(), TreeError> {
        let parent_record = self.record(parent).ok_or(TreeError::UnknownNode(parent))?;
        let child_record = self.record(child).ok_or(TreeError::UnknownNode(child))?;
        if !parent_record.allows_children() {
            return Err(TreeError::InvalidParent(parent));
        }
        if child == Id::DOCUMENT || child_record.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(TreeError::CycleDetected { parent, child });
        }
        Ok(())
    }

    fn is_inclusive_ancestor(&self, ancestor: Id, node: Id) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Unlink `id` from its parent. The subtree stays live and can be
    /// attached again. A no-op for nodes without a parent.
    pub fn detach(&mut self, id: Id) -> Result<(), TreeError> {
        if id == Id::DOCUMENT {
            return Err(TreeError::InvalidParent(id));
        }
        let parent = self.record(id).ok_or(TreeError::UnknownNode(id))?.parent;
        if let Some(parent) = parent {
            self.nodes[parent.0 as usize].children.retain(|k| *k != id);
            self.nodes[id.0 as usize].parent = None;
        }
        Ok(())
    }

    /// Detach `id` from its parent and retire its whole subtree.
    pub fn remove(&mut self, id: Id) -> Result<(), TreeError> {
        if id == Id::DOCUMENT {
            return Err(TreeError::InvalidParent(id));
        }
        let parent = self.record(id).ok_or(TreeError::UnknownNode(id))?.parent;
        if let Some(parent) = parent {
            self.nodes[parent.0 as usize].children.retain(|k| *k != id);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let record = &mut self.nodes[current.0 as usize];
            record.live = false;
            record.parent = None;
            stack.extend(record.children.drain(..));
        }
        Ok(())
    }

    // --- navigation ---

    fn record(&self, id: Id) -> Option<&NodeRecord> {
        self.nodes.get(id.0 as usize).filter(|r| r.live)
    }

    fn record_mut(&mut self, id: Id) -> Option<&mut NodeRecord> {
        self.nodes.get_mut(id.0 as usize).filter(|r| r.live)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.record(id).is_some()
    }

    /// Live and reachable from the document node.
    pub fn is_connected(&self, id: Id) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(Id::DOCUMENT, id)
    }

    pub fn parent(&self, id: Id) -> Option<Id> {
        self.record(id).and_then(|r| r.parent)
    }

    pub fn parent_element(&self, id: Id) -> Option<Id> {
        self.parent(id).filter(|p| self.is_element(*p))
    }

    pub fn children(&self, id: Id) -> &[Id] {
        self.record(id).map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    pub fn element_children(&self, id: Id) -> impl DoubleEndedIterator<Item = Id> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
    }

    pub fn previous_element_sibling(&self, id: Id) -> Option<Id> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|k| *k == id)?;
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .find(|s| self.is_element(*s))
    }

    /// Element descendants of `root` in pre-order, `root` excluded.
    pub fn descendants(&self, root: Id) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.element_children(root).rev().collect(),
        }
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<Id> {
        self.descendants(Id::DOCUMENT)
            .filter(|id| self.has_tag(*id, tag))
            .collect()
    }

    /// First element in document order whose `id` attribute equals `value`.
    pub fn element_by_id(&self, value: &str) -> Option<Id> {
        self.descendants(Id::DOCUMENT)
            .find(|id| self.attr(*id, "id") == Some(value))
    }

    /// The first `body` element, if any.
    pub fn body(&self) -> Option<Id> {
        self.descendants(Id::DOCUMENT)
            .find(|id| self.has_tag(*id, "body"))
    }

    // --- element data ---

    pub fn is_element(&self, id: Id) -> bool {
        matches!(
            self.record(id).map(|r| &r.kind),
            Some(NodeKind::Element { .. })
        )
    }

    pub fn element_name(&self, id: Id) -> Option<&str> {
        match &self.record(id)?.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn has_tag(&self, id: Id, tag: &str) -> bool {
        self.element_name(id)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    fn attributes(&self, id: Id) -> Option<&[(Arc<str>, Option<String>)]> {
        match &self.record(id)?.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Value of the first attribute named `name`; `None` for missing or
    /// value-less attributes.
    pub fn attr(&self, id: Id, name: &str) -> Option<&str> {
        self.attributes(id)?
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn has_attr(&self, id: Id, name: &str) -> bool {
        self.attributes(id)
            .is_some_and(|attrs| attrs.iter().any(|(k, _)| k.eq_ignore_ascii_case(name)))
    }

    pub fn set_attr(&mut self, id: Id, name: &str, value: Option<String>) -> Result<(), TreeError> {
        let NodeKind::Element { attributes, .. } = self.element_kind_mut(id)? else {
            return Err(TreeError::WrongNodeKind(id));
        };
        match attributes.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value,
            None => attributes.push((Arc::from(name.to_ascii_lowercase()), value)),
        }
        Ok(())
    }

    /// Returns whether the attribute was present.
    pub fn remove_attr(&mut self, id: Id, name: &str) -> Result<bool, TreeError> {
        let NodeKind::Element { attributes, .. } = self.element_kind_mut(id)? else {
            return Err(TreeError::WrongNodeKind(id));
        };
        let before = attributes.len();
        attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        Ok(attributes.len() != before)
    }

    pub fn style_property(&self, id: Id, property: &str) -> Option<&str> {
        match &self.record(id)?.kind {
            NodeKind::Element { style, .. } => style
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(property))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn set_style_property(
        &mut self,
        id: Id,
        property: &str,
        value: &str,
    ) -> Result<(), TreeError> {
        let NodeKind::Element { style, .. } = self.element_kind_mut(id)? else {
            return Err(TreeError::WrongNodeKind(id));
        };
        match style.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(property)) {
            Some((_, v)) => {
                v.clear();
                v.push_str(value);
            }
            None => style.push((property.to_ascii_lowercase(), value.to_string())),
        }
        Ok(())
    }

    fn element_kind_mut(&mut self, id: Id) -> Result<&mut NodeKind, TreeError> {
        let record = self.record_mut(id).ok_or(TreeError::UnknownNode(id))?;
        if matches!(record.kind, NodeKind::Element { .. }) {
            Ok(&mut record.kind)
        } else {
            Err(TreeError::WrongNodeKind(id))
        }
    }

    /// Text of a text node.
    pub fn text(&self, id: Id) -> Option<&str> {
        match &self.record(id)?.kind {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: Id) -> String {
        let mut out = String::new();
        let mut stack: Vec<Id> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if let Some(text) = self.text(current) {
                out.push_str(text);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Replace all children of `id` with a single text node. A lone text
    /// child is rewritten in place.
    pub fn set_text_content(&mut self, id: Id, text: &str) -> Result<(), TreeError> {
        self.element_kind_mut(id)?;
        if let [only] = *self.children(id) {
            if !text.is_empty() {
                if let NodeKind::Text { text: current } = &mut self.nodes[only.0 as usize].kind {
                    current.clear();
                    current.push_str(text);
                    return Ok(());
                }
            }
        }
        let children = self.children(id).to_vec();
        for child in children {
            self.remove(child)?;
        }
        if !text.is_empty() {
            let text_id = self.create_text(text);
            self.link(id, text_id);
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<Id>,
}

impl Iterator for Descendants<'_> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let id = self.stack.pop()?;
        let before = self.stack.len();
        self.stack.extend(self.tree.element_children(id));
        self.stack[before..].reverse();
        Some(id)
    }
}

#[cfg(test)]
mod tests;
