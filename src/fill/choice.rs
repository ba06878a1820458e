use crate::discovery::{ControlKind, FieldCandidate, FieldOption};
use crate::dom::{DomError, EventType, NodeId, Page};
use crate::fill::events::{CHANGE_SEQUENCE, dispatch_sequence};
use crate::fill::option_match::{best_option, option_mentions};
use crate::fill::strategy::FillStrategy;
use crate::fill::text::bring_into_view;
use crate::fill::value::FieldValue;

/// Checkboxes and radios, native or ARIA, single or grouped.
pub struct ChoiceStrategy;

impl FillStrategy for ChoiceStrategy {
    fn fill(&self, page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> Result<bool, DomError> {
        match candidate.kind {
            ControlKind::Radio => fill_radio(page, candidate, value),
            _ if candidate.is_group() || matches!(value, FieldValue::List(_)) => {
                fill_checkbox_group(page, candidate, value)
            }
            _ => fill_single_checkbox(page, candidate.element, value),
        }
    }
}

/// Native `checked`, or `aria-checked` for ARIA widgets.
pub fn is_checked(page: &Page, node: NodeId) -> bool {
    if is_native_choice(page, node) {
        page.checked(node)
    } else {
        page.attr(node, "aria-checked") == Some("true")
    }
}

fn is_native_choice(page: &Page, node: NodeId) -> bool {
    matches!(
        page.element(node).and_then(|el| el.input_type()).as_deref(),
        Some("checkbox" | "radio")
    )
}

fn force_checked(page: &mut Page, node: NodeId, checked: bool) -> Result<(), DomError> {
    if is_native_choice(page, node) {
        page.set_checked(node, checked)
    } else {
        page.set_attr(node, "aria-checked", if checked { "true" } else { "false" })
    }
}

/// Click first, since many frameworks only listen for clicks; force the
/// state and announce it if the click did not get there.
fn set_member(page: &mut Page, node: NodeId, desired: bool) -> Result<(), DomError> {
    if is_checked(page, node) == desired {
        return Ok(());
    }

    bring_into_view(page, node)?;
    page.click(node)?;

    if page.is_connected(node) && is_checked(page, node) != desired {
        force_checked(page, node, desired)?;
        dispatch_sequence(page, node, &CHANGE_SEQUENCE)?;
    }
    Ok(())
}

fn fill_single_checkbox(page: &mut Page, element: NodeId, value: &FieldValue) -> Result<bool, DomError> {
    let Some(desired) = value.as_bool() else {
        return Ok(false);
    };
    set_member(page, element, desired)?;
    Ok(true)
}

fn live_options(page: &Page, candidate: &FieldCandidate) -> Vec<FieldOption> {
    candidate
        .members()
        .into_iter()
        .enumerate()
        .map(|(index, member)| {
            let known = candidate.options.get(index).filter(|o| o.element == Some(member));
            FieldOption {
                value: known.map(|o| o.value.clone()).unwrap_or_else(|| {
                    page.attr(member, "value").unwrap_or("on").to_string()
                }),
                label: known.map(|o| o.label.clone()).unwrap_or_default(),
                selected: is_checked(page, member),
                element: Some(member),
            }
        })
        .collect()
}

fn fill_checkbox_group(page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> Result<bool, DomError> {
    let targets = value.match_targets();
    if targets.is_empty() {
        return Ok(false);
    }

    let options = live_options(page, candidate);
    let wanted: Vec<bool> = options.iter().map(|o| option_mentions(o, &targets)).collect();
    if !wanted.iter().any(|w| *w) {
        return Ok(false);
    }

    for (option, desired) in options.iter().zip(wanted) {
        if let Some(member) = option.element {
            if page.is_connected(member) {
                set_member(page, member, desired)?;
            }
        }
    }
    Ok(true)
}

fn fill_radio(page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> Result<bool, DomError> {
    let options = live_options(page, candidate);

    // A lone radio behaves like a checkbox that can only be turned on.
    if options.len() == 1 && !candidate.is_group() {
        return match value.as_bool() {
            Some(true) => {
                set_member(page, candidate.element, true)?;
                Ok(true)
            }
            _ => Ok(false),
        };
    }

    let Some(index) = best_option(&options, &value.match_targets()) else {
        return Ok(false);
    };
    let Some(winner) = options[index].element else {
        return Ok(false);
    };

    set_member(page, winner, true)?;

    for loser in options.iter().filter_map(|o| o.element).filter(|m| *m != winner) {
        if !page.is_connected(loser) {
            continue;
        }
        force_checked(page, loser, false)?;
        page.dispatch_event(loser, EventType::Change, true)?;
    }

    Ok(is_checked(page, winner))
}
