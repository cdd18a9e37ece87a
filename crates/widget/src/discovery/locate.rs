use core_types::WindowId;
use dom::{HostDocument, Id};

/// Find the iframe whose content window is `own`.
///
/// Frames that refuse inspection (nested cross-origin siblings) are skipped.
/// `None` is an expected outcome: the host may insert the iframe element
/// after the widget has already started running.
pub fn locate_own_iframe(doc: &HostDocument, own: WindowId) -> Option<Id> {
    doc.iframes()
        .into_iter()
        .find(|iframe| match doc.content_window(*iframe) {
            Ok(window) => window == Some(own),
            Err(blocked) => {
                log::debug!(target: "widget.discovery", "skipping iframe: {blocked}");
                false
            }
        })
}
