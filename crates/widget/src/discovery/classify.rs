use super::proximity::Candidate;
use dom::{DomTree, Id};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Textbox,
    Button,
    Other,
}

pub fn control_kind(tree: &DomTree, id: Id) -> ControlKind {
    let Some(name) = tree.element_name(id) else {
        return ControlKind::Other;
    };

    if name.eq_ignore_ascii_case("textarea") {
        return ControlKind::Textbox;
    }
    if name.eq_ignore_ascii_case("button") {
        return ControlKind::Button;
    }
    if !name.eq_ignore_ascii_case("input") {
        return ControlKind::Other;
    }

    // Matched untrimmed, like the browser's enumerated attribute lookup.
    let ty = tree.attr(id, "type").filter(|s| !s.is_empty());

    match ty {
        Some(t) if t.eq_ignore_ascii_case("button") || t.eq_ignore_ascii_case("submit") => {
            ControlKind::Button
        }
        Some(t) if t.eq_ignore_ascii_case("hidden") => ControlKind::Other,
        _ => ControlKind::Textbox, // missing type defaults to text
    }
}

/// First textbox and first button among the candidates, each possibly absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiscoveryResult {
    pub textbox: Option<Candidate>,
    pub button: Option<Candidate>,
}

pub fn classify(candidates: &[Candidate]) -> DiscoveryResult {
    let mut result = DiscoveryResult::default();
    for candidate in candidates {
        match candidate.kind {
            ControlKind::Textbox if result.textbox.is_none() => result.textbox = Some(*candidate),
            ControlKind::Button if result.button.is_none() => result.button = Some(*candidate),
            _ => {}
        }
        if result.textbox.is_some() && result.button.is_some() {
            break;
        }
    }
    result
}
