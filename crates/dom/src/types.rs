use std::sync::Arc;

pub type NodeId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

impl Id {
    /// The document node of every [`DomTree`](crate::DomTree).
    pub const DOCUMENT: Id = Id(0);
}

/// Owned node description, materialized into a [`DomTree`](crate::DomTree).
///
/// Element and attribute names are stored ASCII-lowercase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element {
        name: Arc<str>,
        attributes: Vec<(Arc<str>, Option<String>)>,
        children: Vec<Node>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl Node {
    pub fn element(name: &str) -> Self {
        Node::Element {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Node::Comment { text: text.into() }
    }

    pub fn with_attr(self, name: &str, value: impl Into<String>) -> Self {
        self.push_attr(name, Some(value.into()))
    }

    /// Boolean attribute without a value, e.g. `disabled`.
    pub fn with_flag(self, name: &str) -> Self {
        self.push_attr(name, None)
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.push(child);
        } else {
            debug_assert!(false, "only elements can have children");
        }
        self
    }

    pub fn with_children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.extend(nodes);
        } else {
            debug_assert!(false, "only elements can have children");
        }
        self
    }

    fn push_attr(mut self, name: &str, value: Option<String>) -> Self {
        if let Node::Element { attributes, .. } = &mut self {
            attributes.push((Arc::from(name.to_ascii_lowercase()), value));
        } else {
            debug_assert!(false, "only elements carry attributes");
        }
        self
    }
}
