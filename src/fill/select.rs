use std::collections::HashSet;

use tracing::debug;

use crate::discovery::options::{listbox_option, listbox_option_elements, native_select_options};
use crate::discovery::{ControlKind, FieldCandidate};
use crate::dom::{DomError, Page};
use crate::fill::events::commit;
use crate::fill::option_match::best_option;
use crate::fill::strategy::FillStrategy;
use crate::fill::text::bring_into_view;
use crate::fill::value::FieldValue;

/// Native `<select>` and `<select multiple>`.
pub struct SelectStrategy;

impl FillStrategy for SelectStrategy {
    fn fill(&self, page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> Result<bool, DomError> {
        let element = candidate.element;
        let options = native_select_options(page, element);

        if candidate.kind == ControlKind::MultiSelect {
            let chosen: HashSet<usize> = value
                .match_targets()
                .into_iter()
                .filter_map(|target| best_option(&options, &[target]))
                .collect();
            if chosen.is_empty() {
                return Ok(false);
            }

            bring_into_view(page, element)?;
            page.focus(element)?;
            for (index, option) in options.iter().enumerate() {
                if let Some(node) = option.element {
                    page.set_selected(node, chosen.contains(&index))?;
                }
            }
            commit(page, element)?;
            return Ok(true);
        }

        let Some(index) = best_option(&options, &value.match_targets()) else {
            return Ok(false);
        };
        let Some(node) = options[index].element else {
            return Ok(false);
        };

        bring_into_view(page, element)?;
        page.focus(element)?;
        page.set_selected(node, true)?;
        commit(page, element)?;
        Ok(true)
    }
}

/// ARIA listbox/combobox widgets: open, pick, click.
pub struct ListboxStrategy;

impl FillStrategy for ListboxStrategy {
    fn fill(&self, page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> Result<bool, DomError> {
        let widget = candidate.element;
        let targets = value.match_targets();
        if targets.is_empty() {
            return Ok(false);
        }

        bring_into_view(page, widget)?;
        page.click(widget)?;

        // The popup may only exist once the widget is open.
        let option_nodes = listbox_option_elements(page, widget);
        let options: Vec<_> = option_nodes
            .iter()
            .map(|node| listbox_option(page, *node))
            .collect();
        debug!(widget = %widget, options = options.len(), "Opened custom listbox");

        let Some(index) = best_option(&options, &targets) else {
            return Ok(false);
        };
        let option = option_nodes[index];
        if !page.is_connected(option) {
            return Ok(false);
        }
        page.click(option)?;
        Ok(true)
    }
}
