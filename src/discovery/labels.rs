use crate::discovery::candidate_model::LabelSources;
use crate::dom::page::collapse_whitespace;
use crate::dom::{NodeId, Page};

fn non_empty(text: &str) -> Option<String> {
    let collapsed = collapse_whitespace(text);
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Resolve every label source for `element`. All id lookups stay inside the
/// element's own root, so shadow-scoped ids resolve correctly.
pub fn resolve_labels(page: &Page, element: NodeId) -> LabelSources {
    let root = page.root_of(element);
    let mut label_text = String::new();

    if let Some(id) = page.attr(element, "id").filter(|id| !id.is_empty()) {
        for label in page.elements_by_tag(root, "label") {
            if page.attr(label, "for") == Some(id) {
                label_text.push_str(&page.text_content(label));
                label_text.push(' ');
            }
        }
    }

    if let Some(ancestor) = page.parent(element).and_then(|p| page.closest_tag(p, "label")) {
        label_text.push_str(&page.text_content_excluding(ancestor, Some(element)));
    }

    LabelSources {
        label: non_empty(&label_text),
        aria_label: page.attr(element, "aria-label").and_then(non_empty),
        aria_labelledby: labelledby_text(page, element),
        legend: legend_text(page, element),
        placeholder: page.attr(element, "placeholder").and_then(non_empty),
    }
}

pub fn labelledby_text(page: &Page, element: NodeId) -> Option<String> {
    let ids = page.attr(element, "aria-labelledby")?;
    let root = page.root_of(element);
    let text = ids
        .split_whitespace()
        .filter_map(|id| page.get_element_by_id(root, id))
        .map(|n| page.text_content(n))
        .collect::<Vec<_>>()
        .join(" ");
    non_empty(&text)
}

/// Legend of the nearest enclosing `<fieldset>`.
pub fn legend_text(page: &Page, element: NodeId) -> Option<String> {
    let fieldset = page.parent(element).and_then(|p| page.closest_tag(p, "fieldset"))?;
    fieldset_legend(page, fieldset)
}

fn fieldset_legend(page: &Page, fieldset: NodeId) -> Option<String> {
    let legend = page
        .element_children(fieldset)
        .into_iter()
        .find(|c| page.tag(*c) == Some("legend"))?;
    non_empty(&page.text_content(legend))
}

/// Parent element text, the "nearby context" fallback.
pub fn surrounding_text(page: &Page, element: NodeId) -> Option<String> {
    let parent = page.parent_element(element)?;
    non_empty(&page.text_content(parent))
}

/// Question text shared by a radio/checkbox group: the legend of a fieldset
/// enclosing every member, the accessible name of an enclosing
/// `role=radiogroup|group`, or heading-like siblings inside the members'
/// common ancestor.
pub fn group_caption(page: &Page, members: &[NodeId]) -> Option<String> {
    let first = *members.first()?;
    let contains_all = |ancestor: NodeId| members.iter().all(|m| page.is_ancestor_of(ancestor, *m));

    let mut current = page.parent_element(first);
    while let Some(ancestor) = current {
        if contains_all(ancestor) {
            if page.tag(ancestor) == Some("fieldset") {
                if let Some(legend) = fieldset_legend(page, ancestor) {
                    return Some(legend);
                }
            }
            if matches!(page.attr(ancestor, "role"), Some("radiogroup" | "group")) {
                if let Some(name) = labelledby_text(page, ancestor)
                    .or_else(|| page.attr(ancestor, "aria-label").and_then(non_empty))
                {
                    return Some(name);
                }
            }
            return heading_text(page, ancestor, members);
        }
        current = page.parent_element(ancestor);
    }
    None
}

fn heading_text(page: &Page, container: NodeId, members: &[NodeId]) -> Option<String> {
    let holds_member = |child: NodeId| {
        members
            .iter()
            .any(|m| *m == child || page.is_ancestor_of(child, *m))
    };
    let holds_control = |child: NodeId| {
        page.descendant_elements(child)
            .into_iter()
            .chain(std::iter::once(child))
            .any(|n| matches!(page.tag(n), Some("input" | "select" | "textarea")))
    };

    // Nearest preceding sibling that carries text but no other controls.
    page.element_children(container)
        .into_iter()
        .take_while(|child| !holds_member(*child))
        .filter(|child| !holds_control(*child))
        .filter(|child| !matches!(page.tag(*child), Some("script" | "style")))
        .filter_map(|child| non_empty(&page.text_content(child)))
        .last()
}

/// Visible label of a single group member (its own `<label>` or aria text).
pub fn member_label(page: &Page, member: NodeId) -> String {
    let sources = resolve_labels(page, member);
    sources
        .label
        .or(sources.aria_label)
        .or(sources.aria_labelledby)
        .or_else(|| non_empty(&page.text_content(member)))
        .unwrap_or_default()
}
