use crate::discovery::FieldCandidate;
use crate::dom::{DomError, NodeId, Page};
use crate::fill::events::commit;
use crate::fill::strategy::FillStrategy;
use crate::fill::value::FieldValue;

/// Text inputs and textareas.
pub struct TextStrategy;

impl FillStrategy for TextStrategy {
    fn fill(&self, page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> Result<bool, DomError> {
        let Some(text) = value.as_text() else {
            return Ok(false);
        };
        let element = candidate.element;

        bring_into_view(page, element)?;
        page.focus(element)?;

        // Native setter first; plain assignment only if the value did not stick.
        page.set_value_native(element, &text)?;
        if page.value(element) != text {
            page.set_value_property(element, &text)?;
        }

        commit(page, element)?;
        Ok(true)
    }
}

pub fn bring_into_view(page: &mut Page, element: NodeId) -> Result<(), DomError> {
    if !page.is_fully_in_viewport(element) {
        page.scroll_into_view(element)?;
    }
    Ok(())
}
