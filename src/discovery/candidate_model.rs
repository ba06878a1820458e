use serde::Serialize;

use crate::dom::NodeId;

/// Closed set of control kinds, computed once during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ControlKind {
    Text,
    Checkbox,
    Radio,
    Select,
    MultiSelect,
    File,
    CustomListbox,
    ContentEditable,
}

impl ControlKind {
    pub fn is_choice(self) -> bool {
        matches!(self, ControlKind::Checkbox | ControlKind::Radio)
    }

    pub fn is_select_like(self) -> bool {
        matches!(
            self,
            ControlKind::Select | ControlKind::MultiSelect | ControlKind::CustomListbox
        )
    }

    pub fn is_free_text(self) -> bool {
        matches!(self, ControlKind::Text | ControlKind::ContentEditable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
    /// Option element, or the group member for radio/checkbox groups.
    pub element: Option<NodeId>,
}

/// Label text by source, each whitespace-collapsed. Kept apart because the
/// scorer weighs each source differently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelSources {
    /// `<label for>` plus enclosing `<label>` text
    pub label: Option<String>,
    pub aria_label: Option<String>,
    pub aria_labelledby: Option<String>,
    pub legend: Option<String>,
    pub placeholder: Option<String>,
}

impl LabelSources {
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Sources in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            &self.label,
            &self.aria_label,
            &self.aria_labelledby,
            &self.legend,
            &self.placeholder,
        ]
        .into_iter()
        .filter_map(|s| s.as_deref())
    }
}

/// One discovered interactive element and its context.
///
/// Candidates are rebuilt on every discovery pass and hold a handle to the
/// element, never a copy of it; a stale handle shows up as a disconnected
/// node when the fill step re-validates it.
#[derive(Debug, Serialize)]
pub struct FieldCandidate {
    pub element: NodeId,
    /// Document or shadow root the element was found in
    pub root: NodeId,
    pub kind: ControlKind,
    pub tag: String,
    pub role: Option<String>,
    pub input_type: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub labels: LabelSources,
    pub surrounding_text: Option<String>,
    pub options: Vec<FieldOption>,
    pub content_editable: bool,
    pub autocomplete: Option<String>,
    pub visible: bool,
    pub required: bool,
    /// All members of a native radio/checkbox group, representative first.
    /// Empty for ungrouped controls.
    pub group: Vec<NodeId>,
}

impl FieldCandidate {
    pub fn is_group(&self) -> bool {
        self.group.len() > 1
    }

    pub fn members(&self) -> Vec<NodeId> {
        if self.group.is_empty() {
            vec![self.element]
        } else {
            self.group.clone()
        }
    }

    pub fn combined_label(&self) -> String {
        self.labels.iter().collect::<Vec<_>>().join(" ")
    }

    /// Lowercased text from every descriptive source, used by the negative
    /// signals of the scorer.
    pub fn aggregate_text(&self) -> String {
        let mut parts: Vec<&str> = self.labels.iter().collect();
        parts.extend(self.name.as_deref());
        parts.extend(self.id.as_deref());
        parts.extend(self.surrounding_text.as_deref());
        parts.join(" ").to_lowercase()
    }

    /// Short human-readable description for reports.
    pub fn display_label(&self) -> String {
        let label = self.combined_label();
        if !label.is_empty() {
            return label;
        }
        self.name
            .clone()
            .or_else(|| self.id.clone())
            .or_else(|| self.surrounding_text.clone())
            .unwrap_or_else(|| format!("<{}>", self.tag))
    }
}
