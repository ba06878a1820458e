use std::fmt;

use crate::dom::node::NodeId;

/// DOM exceptions raised by the arena page model.
#[derive(Debug)]
pub enum DomError {
    /// Node was removed from its document (stale handle)
    Detached(NodeId),

    /// Operation requires an element but the node is text or a root
    NotAnElement(NodeId),

    /// Frame content or history entry belongs to another origin (SecurityError)
    CrossOrigin { origin: String },

    /// Host already carries a shadow root
    ShadowRootExists(NodeId),

    /// Selector uses syntax outside the supported subset
    InvalidSelector(String),

    /// Page or frame URL could not be parsed
    InvalidUrl { url: String, source: url::ParseError },
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::Detached(node) => {
                write!(f, "Node {} is no longer connected to a document", node)
            }
            DomError::NotAnElement(node) => write!(f, "Node {} is not an element", node),
            DomError::CrossOrigin { origin } => {
                write!(f, "Blocked cross-origin access ({})", origin)
            }
            DomError::ShadowRootExists(node) => {
                write!(f, "Element {} already hosts a shadow root", node)
            }
            DomError::InvalidSelector(selector) => {
                write!(f, "Unsupported selector: {}", selector)
            }
            DomError::InvalidUrl { url, source } => write!(f, "Invalid URL '{}': {}", url, source),
        }
    }
}

impl std::error::Error for DomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DomError::InvalidUrl { source, .. } => Some(source),
            _ => None,
        }
    }
}
