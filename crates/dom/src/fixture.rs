//! Declarative host page descriptions (TOML or JSON).
//!
//! ```toml
//! [[frames]]
//! id = "widget"
//! window = 7
//!
//! [root]
//! tag = "body"
//! [[root.children]]
//! tag = "input"
//! attrs = { id = "code" }
//! ```

use crate::document::{FrameSlot, HostDocument};
use crate::tree::{DomTree, TreeError};
use crate::types::Node;
use core_types::WindowId;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MAX_FIXTURE_DEPTH: usize = 512;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML fixture: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON fixture: {0}")]
    Json(#[from] serde_json::Error),
    #[error("node needs exactly one of `tag` or `text`")]
    AmbiguousNode,
    #[error("fixture nesting exceeds {MAX_FIXTURE_DEPTH} levels")]
    TooDeep,
    #[error("frame {0:?} does not name an iframe element")]
    MissingFrame(String),
    #[error("frame {0:?} needs exactly one of `window` or `blocked = true`")]
    InvalidFrame(String),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

#[derive(Clone, Debug, Deserialize)]
pub struct PageFixture {
    #[serde(default)]
    pub frames: Vec<FrameFixture>,
    pub root: NodeFixture,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FrameFixture {
    /// Value of the iframe's `id` attribute.
    pub id: String,
    #[serde(default)]
    pub window: Option<u64>,
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeFixture {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<NodeFixture>,
}

impl PageFixture {
    pub fn from_toml_str(src: &str) -> Result<Self, FixtureError> {
        Ok(toml::from_str(src)?)
    }

    pub fn from_json_str(src: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(src)?)
    }

    /// Load by extension: `.json` is JSON, anything else TOML.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let src = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&src),
            _ => Self::from_toml_str(&src),
        }
    }

    pub fn build(&self) -> Result<HostDocument, FixtureError> {
        let root = self.root.to_node(0)?;
        let mut doc = HostDocument::new(DomTree::from_nodes(&[root]));
        for frame in &self.frames {
            let slot = match (frame.window, frame.blocked) {
                (Some(window), false) => FrameSlot::Window(WindowId(window)),
                (None, true) => FrameSlot::Blocked,
                _ => return Err(FixtureError::InvalidFrame(frame.id.clone())),
            };
            let iframe = doc
                .tree()
                .element_by_id(&frame.id)
                .filter(|id| doc.tree().has_tag(*id, "iframe"))
                .ok_or_else(|| FixtureError::MissingFrame(frame.id.clone()))?;
            doc.attach_frame(iframe, slot)?;
        }
        log::debug!(
            target: "dom.fixture",
            "built host page with {} frame slot(s)",
            self.frames.len()
        );
        Ok(doc)
    }
}

impl NodeFixture {
    fn to_node(&self, depth: usize) -> Result<Node, FixtureError> {
        if depth > MAX_FIXTURE_DEPTH {
            return Err(FixtureError::TooDeep);
        }
        match (&self.tag, &self.text) {
            (Some(tag), None) => {
                let mut node = Node::element(tag);
                for (k, v) in &self.attrs {
                    node = node.with_attr(k, v.clone());
                }
                for child in &self.children {
                    node = node.with_child(child.to_node(depth + 1)?);
                }
                Ok(node)
            }
            (None, Some(text)) if self.attrs.is_empty() && self.children.is_empty() => {
                Ok(Node::text(text.clone()))
            }
            _ => Err(FixtureError::AmbiguousNode),
        }
    }
}
