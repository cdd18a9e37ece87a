//! # dom
//!
//! Host document model for the form gate widget.
//!
//! - [`DomTree`]: arena tree with parent/sibling navigation and explicit-stack
//!   traversal, safe on arbitrarily deep pages
//! - [`HostDocument`]: the tree plus form-control values, iframe frame slots
//!   and event listeners
//! - [`fixture`]: TOML/JSON page descriptions for tests and the CLI

pub mod fixture;

mod document;
mod tree;
mod types;

pub use crate::document::{DomEvent, FrameBlocked, FrameSlot, HostDocument};
pub use crate::fixture::{FixtureError, PageFixture};
pub use crate::tree::{Descendants, DomTree, TreeError};
pub use crate::types::{Id, Node, NodeId};
