use crate::discovery::candidate_model::FieldOption;
use crate::dom::page::collapse_whitespace;
use crate::dom::{NodeId, Page};

pub fn native_select_options(page: &Page, select: NodeId) -> Vec<FieldOption> {
    page.options(select)
        .into_iter()
        .map(|option| FieldOption {
            value: page.option_value(option),
            label: page.option_label(option),
            selected: page.is_selected(option),
            element: Some(option),
        })
        .collect()
}

fn is_listbox_option(page: &Page, node: NodeId) -> bool {
    page.attr(node, "role") == Some("option") || page.has_attr(node, "data-value")
}

/// Option elements of a custom listbox/combobox: descendants with
/// `role=option`/`data-value`, else those of the popup named by
/// `aria-controls`/`aria-owns` in the widget's root.
pub fn listbox_option_elements(page: &Page, widget: NodeId) -> Vec<NodeId> {
    let own: Vec<NodeId> = page
        .descendant_elements(widget)
        .into_iter()
        .filter(|n| is_listbox_option(page, *n))
        .collect();
    if !own.is_empty() {
        return own;
    }

    let root = page.root_of(widget);
    ["aria-controls", "aria-owns"]
        .iter()
        .filter_map(|attr| page.attr(widget, attr))
        .flat_map(|ids| ids.split_whitespace())
        .filter_map(|id| page.get_element_by_id(root, id))
        .flat_map(|popup| {
            page.descendant_elements(popup)
                .into_iter()
                .filter(|n| is_listbox_option(page, *n))
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn listbox_option(page: &Page, option: NodeId) -> FieldOption {
    let text = collapse_whitespace(&page.text_content(option));
    let label = if text.is_empty() {
        page.attr(option, "aria-label").map(collapse_whitespace).unwrap_or_default()
    } else {
        text
    };
    let value = page
        .attr(option, "data-value")
        .map(str::to_string)
        .unwrap_or_else(|| label.clone());

    FieldOption {
        value,
        label,
        selected: page.attr(option, "aria-selected") == Some("true"),
        element: Some(option),
    }
}

pub fn listbox_options(page: &Page, widget: NodeId) -> Vec<FieldOption> {
    listbox_option_elements(page, widget)
        .into_iter()
        .map(|option| listbox_option(page, option))
        .collect()
}
