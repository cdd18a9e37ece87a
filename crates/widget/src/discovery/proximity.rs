use super::classify::{ControlKind, control_kind};
use dom::{DomTree, Id};

/// An element "around" the iframe and its position in proximity order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub id: Id,
    pub index: usize,
    pub kind: ControlKind,
}

/// Collect the elements preceding `iframe`, nearest first.
///
/// At each level the previous element siblings are visited from the nearest
/// outward; each sibling is emitted before its descendants (pre-order). Once
/// a level is exhausted the walk climbs to the parent element and repeats,
/// stopping below `body`.
///
/// The result is ordered by closeness to the iframe, not by page position:
/// of two siblings in the same group, the one textually earlier in the page
/// comes later in the sequence.
pub fn collect_candidates(tree: &DomTree, iframe: Id) -> Vec<Candidate> {
    let body = tree.body();
    let mut out = Vec::new();
    let mut level = Some(iframe);

    while let Some(node) = level {
        if let Some(parent) = tree.parent(node) {
            let siblings = tree.children(parent);
            let pos = siblings.iter().position(|k| *k == node).unwrap_or(0);
            for &sibling in siblings[..pos].iter().rev() {
                if !tree.is_element(sibling) {
                    continue;
                }
                push(tree, &mut out, sibling);
                for descendant in tree.descendants(sibling) {
                    push(tree, &mut out, descendant);
                }
            }
        }
        level = tree.parent_element(node).filter(|p| Some(*p) != body);
    }

    log::trace!(
        target: "widget.discovery",
        "collected {} candidates around {iframe:?}",
        out.len()
    );
    out
}

fn push(tree: &DomTree, out: &mut Vec<Candidate>, id: Id) {
    out.push(Candidate {
        id,
        index: out.len(),
        kind: control_kind(tree, id),
    });
}
