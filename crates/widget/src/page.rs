//! The widget's own document.

use crate::config::WidgetValues;
use crate::status::{Clock, StatusEntry, StatusSink, log_entry};
use core_types::Severity;
use dom::{DomTree, Id, Node};

const STATUS_ID: &str = "status";
const RESULT_ID: &str = "validation-result";

fn default_markup() -> Node {
    Node::element("html").with_child(
        Node::element("body").with_children([
            Node::element("h2").with_child(Node::text("Form gate")),
            Node::element("div").with_children([
                Node::element("span").with_child(Node::text("Pattern: ")),
                Node::element("code").with_attr("id", "values.validationPattern"),
            ]),
            Node::element("div").with_children([
                Node::element("span").with_child(Node::text("Rule: ")),
                Node::element("span").with_attr("id", "values.validationMessage"),
            ]),
            Node::element("div")
                .with_attr("id", RESULT_ID)
                .with_attr("class", "validation-result"),
            Node::element("div").with_attr("id", STATUS_ID),
        ]),
    )
}

pub struct WidgetPage {
    tree: DomTree,
    clock: Box<dyn Clock>,
    entries: Vec<StatusEntry>,
    // Status rows detached by a replace, reused by later entries.
    spare_rows: Vec<Id>,
}

impl WidgetPage {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self::from_tree(DomTree::from_nodes(&[default_markup()]), clock)
    }

    /// Use caller-provided markup. Missing well-known elements are tolerated;
    /// status entries are still recorded and logged.
    pub fn from_tree(tree: DomTree, clock: Box<dyn Clock>) -> Self {
        Self {
            tree,
            clock,
            entries: Vec::new(),
            spare_rows: Vec::new(),
        }
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    /// Rendered status lines, oldest first.
    pub fn status_lines(&self) -> Vec<String> {
        self.entries.iter().map(StatusEntry::render).collect()
    }

    /// Text of every `values.<key>` element.
    pub fn render_values(&mut self, values: &WidgetValues) {
        for (key, value) in values.entries() {
            let Some(id) = self.tree.element_by_id(&format!("values.{key}")) else {
                continue;
            };
            if let Err(err) = self.tree.set_text_content(id, value) {
                log::warn!(target: "widget.page", "cannot render values.{key}: {err}");
            }
        }
    }

    pub fn show_validation_result(&mut self, message: &str, valid: bool) {
        let Some(id) = self.tree.element_by_id(RESULT_ID) else {
            return;
        };
        let class = if valid {
            "validation-result valid"
        } else {
            "validation-result invalid"
        };
        let text = if valid { "Valid" } else { message };
        let applied = self
            .tree
            .set_text_content(id, text)
            .and_then(|()| self.tree.set_attr(id, "class", Some(class.to_string())))
            .and_then(|()| self.tree.set_style_property(id, "display", "block"));
        if let Err(err) = applied {
            log::warn!(target: "widget.page", "cannot show validation result: {err}");
        }
    }

    /// Text of the validation-result element, if shown.
    pub fn validation_result(&self) -> Option<String> {
        let id = self.tree.element_by_id(RESULT_ID)?;
        (self.tree.style_property(id, "display") == Some("block"))
            .then(|| self.tree.text_content(id))
    }

    fn status_container(&self) -> Option<Id> {
        self.tree.element_by_id(STATUS_ID)
    }

    fn clear_status(&mut self) {
        self.entries.clear();
        let Some(container) = self.status_container() else {
            return;
        };
        let rows = self.tree.children(container).to_vec();
        for row in rows {
            match self.tree.detach(row) {
                Ok(()) => self.spare_rows.push(row),
                Err(err) => log::warn!(target: "widget.page", "cannot clear status row: {err}"),
            }
        }
    }

    fn render_entry(&mut self, entry: &StatusEntry) {
        let Some(container) = self.status_container() else {
            return;
        };
        let rendered = match self.spare_rows.pop() {
            Some(row) => self
                .tree
                .set_attr(row, "class", Some(entry.class_name()))
                .and_then(|()| self.tree.set_text_content(row, &entry.render()))
                .and_then(|()| self.tree.append_child(container, row)),
            None => {
                let node = Node::element("div")
                    .with_attr("class", entry.class_name())
                    .with_child(Node::text(entry.render()));
                self.tree.append_node(container, &node).map(|_| ())
            }
        };
        if let Err(err) = rendered {
            log::warn!(target: "widget.page", "cannot render status entry: {err}");
        }
    }
}

impl StatusSink for WidgetPage {
    fn report(&mut self, message: &str, severity: Severity, append: bool) {
        if !append {
            self.clear_status();
        }
        let entry = StatusEntry {
            at: self.clock.now(),
            severity,
            message: message.to_string(),
        };
        log_entry(&entry);
        self.render_entry(&entry);
        self.entries.push(entry);
    }
}
