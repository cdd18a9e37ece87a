//! One discovery pass: locate the widget iframe in the parent document,
//! collect the elements around it, pick the first textbox and button, and
//! check their relative position.

mod classify;
mod locate;
mod ordering;
mod proximity;

pub use classify::{ControlKind, DiscoveryResult, classify, control_kind};
pub use locate::locate_own_iframe;
pub use ordering::{FoundControls, MissingControl, validate_order};
pub use proximity::{Candidate, collect_candidates};

use crate::capability::AccessDenied;
use core_types::WindowId;
use dom::{DomTree, HostDocument, Id};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// Terminal: a timer cannot lift an origin or sandbox restriction.
    #[error("cannot access parent document: {0}")]
    AccessDenied(#[from] AccessDenied),
    #[error("could not find the widget iframe in the parent document")]
    IframeNotFound,
    #[error("no {missing} found before the widget iframe")]
    IncompleteElementSet {
        missing: MissingControl,
        partial: DiscoveryResult,
    },
    #[error("input field must appear before the button (input at {textbox}, button at {button})")]
    OrderingViolation { textbox: usize, button: usize },
}

impl DiscoveryError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, DiscoveryError::AccessDenied(_))
    }
}

/// Collect, classify and validate the controls around a located iframe.
pub fn find_controls(tree: &DomTree, iframe: Id) -> Result<FoundControls, DiscoveryError> {
    let candidates = collect_candidates(tree, iframe);
    validate_order(classify(&candidates))
}

/// Everything after the capability check, without reporting.
pub fn run_pass(doc: &HostDocument, own: WindowId) -> Result<(Id, FoundControls), DiscoveryError> {
    let iframe = locate_own_iframe(doc, own).ok_or(DiscoveryError::IframeNotFound)?;
    let found = find_controls(doc.tree(), iframe)?;
    Ok((iframe, found))
}

/// `tag#id`, falling back to the `name` attribute.
pub fn describe(tree: &DomTree, id: Id) -> String {
    let tag = tree.element_name(id).unwrap_or("?");
    let key = tree
        .attr(id, "id")
        .filter(|s| !s.is_empty())
        .or_else(|| tree.attr(id, "name").filter(|s| !s.is_empty()))
        .unwrap_or("(no id)");
    format!("{tag}#{key}")
}
