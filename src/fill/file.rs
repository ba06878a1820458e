use crate::discovery::FieldCandidate;
use crate::dom::{DataTransfer, DomError, EventType, Page};
use crate::fill::events::dispatch_sequence;
use crate::fill::strategy::FillStrategy;
use crate::fill::value::FieldValue;

/// `<input type="file">`: assign the file list through a `DataTransfer`.
pub struct FileStrategy;

impl FillStrategy for FileStrategy {
    fn fill(&self, page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> Result<bool, DomError> {
        let FieldValue::File(file) = value else {
            return Ok(false);
        };

        let mut transfer = DataTransfer::new();
        transfer.add(file.clone());
        page.set_files(candidate.element, transfer.files())?;

        dispatch_sequence(page, candidate.element, &[EventType::Change, EventType::Input])?;
        Ok(true)
    }
}
