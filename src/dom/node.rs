use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::dom::transfer::FileBlob;

/// Handle to a node in a `Page` arena. Cheap to copy, never owns the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A document root. `owner` is the iframe element for frame documents.
    Document { origin: String, owner: Option<NodeId> },
    ShadowRoot { host: NodeId },
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
    pub(crate) connected: bool,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, parent: Option<NodeId>, connected: bool) -> Self {
        Self {
            parent,
            children: Vec::new(),
            kind,
            connected,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_root(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Document { .. } | NodeKind::ShadowRoot { .. }
        )
    }
}

/// What an `<iframe>` exposes to script running in the parent document.
#[derive(Debug, Clone)]
pub enum FrameContent {
    SameOrigin(NodeId),
    CrossOrigin { origin: String },
}

/// Element attributes plus the live form state that diverges from them
/// once a page script (or the engine) starts writing.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub value: String,
    pub checked: bool,
    pub selected: bool,
    pub files: Vec<FileBlob>,
    pub shadow_root: Option<NodeId>,
    pub frame: Option<FrameContent>,
}

impl ElementData {
    pub fn new(tag: &str, attrs: BTreeMap<String, String>) -> Self {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let checked = attrs.contains_key("checked");
        let selected = attrs.contains_key("selected");

        Self {
            tag: tag.to_ascii_lowercase(),
            attrs,
            value,
            checked,
            selected,
            files: Vec::new(),
            shadow_root: None,
            frame: None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn input_type(&self) -> Option<String> {
        if self.tag != "input" {
            return None;
        }
        Some(
            self.attr("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string()),
        )
    }

    pub fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
