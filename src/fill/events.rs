use crate::dom::{DomError, EventType, NodeId, Page};

/// Events a framework needs to observe a programmatic value change.
pub const COMMIT_SEQUENCE: [EventType; 4] = [
    EventType::Focus,
    EventType::Input,
    EventType::Change,
    EventType::Blur,
];

pub const CHANGE_SEQUENCE: [EventType; 2] = [EventType::Input, EventType::Change];

/// Dispatch `sequence` as bubbling events. Stops quietly if a listener
/// detaches the element part way through.
pub fn dispatch_sequence(page: &mut Page, node: NodeId, sequence: &[EventType]) -> Result<(), DomError> {
    for event_type in sequence {
        if !page.is_connected(node) {
            break;
        }
        page.dispatch_event(node, *event_type, true)?;
    }
    if sequence.contains(&EventType::Blur) {
        page.blur(node);
    }
    Ok(())
}

pub fn commit(page: &mut Page, node: NodeId) -> Result<(), DomError> {
    dispatch_sequence(page, node, &COMMIT_SEQUENCE)
}
