//! Cross-document access as an explicit, fallible capability.

use core_types::WindowId;
use dom::HostDocument;
use thiserror::Error;

/// The parent document refused access (same-origin policy or a sandbox
/// without `allow-same-origin`).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct AccessDenied {
    pub reason: String,
}

/// The widget's view of the frame it is embedded in.
pub trait FrameHost {
    /// This widget's own window.
    fn window(&self) -> WindowId;

    /// Read the parent document. Pure read attempt; no side effects.
    fn parent_document(&mut self) -> Result<&mut HostDocument, AccessDenied>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessPolicy {
    SameOrigin,
    CrossOrigin { reason: String },
}

/// A widget window embedded in a host page it may or may not be allowed to
/// read.
pub struct EmbeddedFrame {
    window: WindowId,
    host: HostDocument,
    policy: AccessPolicy,
}

impl EmbeddedFrame {
    pub fn same_origin(window: WindowId, host: HostDocument) -> Self {
        Self {
            window,
            host,
            policy: AccessPolicy::SameOrigin,
        }
    }

    pub fn cross_origin(window: WindowId, host: HostDocument, reason: impl Into<String>) -> Self {
        Self {
            window,
            host,
            policy: AccessPolicy::CrossOrigin {
                reason: reason.into(),
            },
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: AccessPolicy) {
        self.policy = policy;
    }

    /// The host page as its own scripts and user see it, regardless of the
    /// widget's access policy.
    pub fn host(&self) -> &HostDocument {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut HostDocument {
        &mut self.host
    }
}

impl FrameHost for EmbeddedFrame {
    fn window(&self) -> WindowId {
        self.window
    }

    fn parent_document(&mut self) -> Result<&mut HostDocument, AccessDenied> {
        match &self.policy {
            AccessPolicy::SameOrigin => Ok(&mut self.host),
            AccessPolicy::CrossOrigin { reason } => Err(AccessDenied {
                reason: reason.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::DomTree;

    #[test]
    fn same_origin_frames_expose_the_parent() {
        let mut frame = EmbeddedFrame::same_origin(WindowId(1), HostDocument::new(DomTree::new()));
        assert_eq!(frame.window(), WindowId(1));
        assert!(frame.parent_document().is_ok());
    }

    #[test]
    fn cross_origin_frames_deny_with_reason() {
        let mut frame = EmbeddedFrame::cross_origin(
            WindowId(1),
            HostDocument::new(DomTree::new()),
            "blocked a frame with origin \"https://widgets.example\"",
        );
        let err = frame.parent_document().err().unwrap();
        assert!(err.to_string().contains("widgets.example"));

        frame.set_policy(AccessPolicy::SameOrigin);
        assert!(frame.parent_document().is_ok());
    }
}
