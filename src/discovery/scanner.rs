use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::discovery::candidate_model::{ControlKind, FieldCandidate, FieldOption};
use crate::discovery::labels::{group_caption, member_label, resolve_labels, surrounding_text};
use crate::discovery::options::{listbox_options, native_select_options};
use crate::discovery::visibility::is_fillable;
use crate::dom::{DomError, NodeId, Page};
use crate::fill::choice::is_checked;

// ============================================================================
// Candidate discovery
// ============================================================================

const EXCLUDED_INPUT_TYPES: [&str; 5] = ["hidden", "submit", "button", "image", "reset"];
const WIDGET_ROLES: [&str; 5] = ["textbox", "listbox", "combobox", "radio", "checkbox"];

/// Key identifying one native radio/checkbox group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    root: NodeId,
    form: Option<NodeId>,
    input_type: String,
    name: String,
}

struct Scan<'p> {
    page: &'p Page,
    visited_roots: HashSet<NodeId>,
    candidates: Vec<FieldCandidate>,
    groups: HashMap<GroupKey, usize>,
}

/// Enumerate the fillable controls under `root` (a document, shadow root or
/// element), descending into open shadow roots and same-origin frames.
///
/// Never fails: anything that cannot be inspected is skipped.
pub fn discover(page: &Page, root: NodeId) -> Vec<FieldCandidate> {
    let mut scan = Scan {
        page,
        visited_roots: HashSet::new(),
        candidates: Vec::new(),
        groups: HashMap::new(),
    };
    scan.scan_root(root);

    for candidate in &mut scan.candidates {
        if candidate.is_group() {
            finish_group(page, candidate);
        }
    }

    debug!(count = scan.candidates.len(), "Discovered field candidates");
    scan.candidates
}

impl<'p> Scan<'p> {
    fn scan_root(&mut self, root: NodeId) {
        if !self.visited_roots.insert(root) {
            return;
        }

        let page = self.page;
        for node in page.descendant_elements(root) {
            self.consider(node);

            if let Some(shadow) = page.shadow_root(node) {
                self.scan_root(shadow);
            }

            if page.tag(node) == Some("iframe") {
                match page.frame_document(node) {
                    Ok(Some(document)) => self.scan_root(document),
                    Ok(None) => {}
                    Err(DomError::CrossOrigin { origin }) => {
                        debug!(%origin, "Skipping cross-origin frame");
                    }
                    Err(err) => debug!(error = %err, "Skipping frame"),
                }
            }
        }
    }

    fn consider(&mut self, node: NodeId) {
        let page = self.page;
        let Some(kind) = control_kind(page, node) else {
            return;
        };
        if inside_widget(page, node) {
            return;
        }
        if !is_fillable(page, node) {
            return;
        }

        let root = page.root_of(node);

        if let Some(key) = group_key(page, node, kind, root) {
            if let Some(index) = self.groups.get(&key) {
                self.candidates[*index].group.push(node);
                return;
            }
            self.groups.insert(key, self.candidates.len());
            let mut candidate = build_candidate(page, node, kind, root);
            candidate.group.push(node);
            self.candidates.push(candidate);
            return;
        }

        self.candidates.push(build_candidate(page, node, kind, root));
    }
}

/// Control kind of `node`, or `None` when it is not a candidate.
pub fn control_kind(page: &Page, node: NodeId) -> Option<ControlKind> {
    let el = page.element(node)?;

    match el.tag.as_str() {
        "input" => {
            let input_type = el.input_type()?;
            if EXCLUDED_INPUT_TYPES.contains(&input_type.as_str()) {
                return None;
            }
            return Some(match input_type.as_str() {
                "checkbox" => ControlKind::Checkbox,
                "radio" => ControlKind::Radio,
                "file" => ControlKind::File,
                _ if is_input_combobox(page, node) => ControlKind::CustomListbox,
                _ => ControlKind::Text,
            });
        }
        "textarea" => return Some(ControlKind::Text),
        "select" => {
            return Some(if el.attr("multiple").is_some() {
                ControlKind::MultiSelect
            } else {
                ControlKind::Select
            });
        }
        _ => {}
    }

    if let Some(role) = el.attr("role").filter(|r| WIDGET_ROLES.contains(r)) {
        return Some(match role {
            "listbox" | "combobox" => ControlKind::CustomListbox,
            "radio" => ControlKind::Radio,
            "checkbox" => ControlKind::Checkbox,
            _ => ControlKind::ContentEditable,
        });
    }

    if is_content_editable(page, node) {
        return Some(ControlKind::ContentEditable);
    }
    None
}

/// Text input acting as a combobox: it has the role and either names its
/// popup or declares list autocompletion.
fn is_input_combobox(page: &Page, node: NodeId) -> bool {
    if !matches!(page.attr(node, "role"), Some("combobox" | "listbox")) {
        return false;
    }
    let names_popup = ["aria-controls", "aria-owns"]
        .iter()
        .any(|attr| page.attr(node, attr).is_some_and(|ids| !ids.trim().is_empty()));
    names_popup || page.attr(node, "aria-autocomplete") == Some("list")
}

fn is_content_editable(page: &Page, node: NodeId) -> bool {
    matches!(
        page.attr(node, "contenteditable").map(str::to_ascii_lowercase).as_deref(),
        Some("true" | "" | "plaintext-only")
    )
}

/// Controls nested in a custom listbox/combobox belong to that widget.
fn inside_widget(page: &Page, node: NodeId) -> bool {
    let nested = page
        .parent(node)
        .and_then(|p| {
            page.closest(p, |el| {
                matches!(el.attr("role"), Some("listbox" | "combobox"))
            })
        })
        .is_some();
    if nested {
        return true;
    }

    // A popup listbox owned by a combobox elsewhere in the same root.
    if page.attr(node, "role") == Some("listbox") {
        if let Some(id) = page.attr(node, "id").filter(|id| !id.is_empty()) {
            let root = page.root_of(node);
            return page.descendant_elements(root).into_iter().any(|other| {
                other != node
                    && ["aria-controls", "aria-owns"].iter().any(|attr| {
                        page.attr(other, attr)
                            .is_some_and(|ids| ids.split_whitespace().any(|i| i == id))
                    })
            });
        }
    }
    false
}

fn group_key(page: &Page, node: NodeId, kind: ControlKind, root: NodeId) -> Option<GroupKey> {
    if !kind.is_choice() {
        return None;
    }

    let Some(input_type) = page.element(node)?.input_type() else {
        // ARIA radios group by their enclosing radiogroup.
        if kind != ControlKind::Radio {
            return None;
        }
        let group = page.closest(node, |el| el.attr("role") == Some("radiogroup"))?;
        return Some(GroupKey {
            root,
            form: page.form_owner(node),
            input_type: "aria-radio".to_string(),
            name: group.to_string(),
        });
    };

    let name = page.attr(node, "name").filter(|n| !n.is_empty())?;
    Some(GroupKey {
        root,
        form: page.form_owner(node),
        input_type,
        name: name.to_string(),
    })
}

fn non_empty_attr(page: &Page, node: NodeId, name: &str) -> Option<String> {
    page.attr(node, name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn build_candidate(page: &Page, node: NodeId, kind: ControlKind, root: NodeId) -> FieldCandidate {
    let options = match kind {
        ControlKind::Select | ControlKind::MultiSelect => native_select_options(page, node),
        ControlKind::CustomListbox => listbox_options(page, node),
        _ => Vec::new(),
    };

    FieldCandidate {
        element: node,
        root,
        kind,
        tag: page.tag(node).unwrap_or_default().to_string(),
        role: non_empty_attr(page, node, "role"),
        input_type: non_empty_attr(page, node, "type"),
        name: non_empty_attr(page, node, "name"),
        id: non_empty_attr(page, node, "id"),
        classes: page.element(node).map(|el| el.classes()).unwrap_or_default(),
        labels: resolve_labels(page, node),
        surrounding_text: surrounding_text(page, node),
        options,
        content_editable: is_content_editable(page, node),
        autocomplete: non_empty_attr(page, node, "autocomplete"),
        visible: true,
        required: is_required(page, node),
        group: Vec::new(),
    }
}

fn is_required(page: &Page, node: NodeId) -> bool {
    page.has_attr(node, "required") || page.attr(node, "aria-required") == Some("true")
}

fn member_option(page: &Page, member: NodeId) -> FieldOption {
    let label = member_label(page, member);
    let value = page
        .attr(member, "value")
        .or_else(|| page.attr(member, "data-value"))
        .map(str::to_string)
        .unwrap_or_else(|| if label.is_empty() { "on".to_string() } else { label.clone() });
    FieldOption {
        label: if label.is_empty() { value.clone() } else { label },
        value,
        selected: is_checked(page, member),
        element: Some(member),
    }
}

/// Group representative: members become options, the shared question text
/// is combined into the label, and context spans the whole group.
fn finish_group(page: &Page, candidate: &mut FieldCandidate) {
    candidate.options = candidate
        .group
        .iter()
        .map(|member| member_option(page, *member))
        .collect();
    candidate.required = candidate.group.iter().any(|m| is_required(page, *m));

    if let Some(caption) = group_caption(page, &candidate.group) {
        let already_present = candidate
            .labels
            .legend
            .as_deref()
            .is_some_and(|legend| legend == caption);
        if !already_present {
            candidate.labels.legend = Some(match candidate.labels.legend.take() {
                Some(legend) => format!("{} {}", caption, legend),
                None => caption,
            });
        }
    }
}
