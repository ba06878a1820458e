use crate::discovery::FieldCandidate;
use crate::dom::{DomError, Page};
use crate::fill::events::commit;
use crate::fill::strategy::FillStrategy;
use crate::fill::text::bring_into_view;
use crate::fill::value::FieldValue;

/// `contenteditable` regions and `role=textbox` elements.
pub struct EditableStrategy;

impl FillStrategy for EditableStrategy {
    fn fill(&self, page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> Result<bool, DomError> {
        let Some(text) = value.as_text() else {
            return Ok(false);
        };
        let element = candidate.element;

        bring_into_view(page, element)?;
        page.focus(element)?;
        page.set_text_content(element, "")?;
        page.set_text_content(element, &text)?;
        commit(page, element)?;
        Ok(true)
    }
}
