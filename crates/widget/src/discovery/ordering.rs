use super::DiscoveryError;
use super::classify::DiscoveryResult;
use super::proximity::Candidate;
use std::fmt;

/// A complete, accepted discovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoundControls {
    pub textbox: Candidate,
    pub button: Candidate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingControl {
    Textbox,
    Button,
    Both,
}

impl fmt::Display for MissingControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MissingControl::Textbox => "input field",
            MissingControl::Button => "button",
            MissingControl::Both => "input field or button",
        })
    }
}

/// The textbox must not be farther from the iframe than the button.
pub fn validate_order(result: DiscoveryResult) -> Result<FoundControls, DiscoveryError> {
    match (result.textbox, result.button) {
        (Some(textbox), Some(button)) if textbox.index <= button.index => {
            Ok(FoundControls { textbox, button })
        }
        (Some(textbox), Some(button)) => Err(DiscoveryError::OrderingViolation {
            textbox: textbox.index,
            button: button.index,
        }),
        (textbox, button) => Err(DiscoveryError::IncompleteElementSet {
            missing: match (textbox, button) {
                (Some(_), None) => MissingControl::Button,
                (None, Some(_)) => MissingControl::Textbox,
                _ => MissingControl::Both,
            },
            partial: result,
        }),
    }
}
