use std::collections::HashMap;

use tracing::{debug, warn};

use crate::discovery::{ControlKind, FieldCandidate};
use crate::dom::{DomError, Page};
use crate::fill::choice::ChoiceStrategy;
use crate::fill::editable::EditableStrategy;
use crate::fill::file::FileStrategy;
use crate::fill::select::{ListboxStrategy, SelectStrategy};
use crate::fill::text::TextStrategy;
use crate::fill::value::FieldValue;

/// Writes a value into one kind of control and notifies the page.
///
/// `Ok(false)` means the strategy could not apply the value (no matching
/// option, wrong value type); DOM exceptions come back as `Err`.
pub trait FillStrategy {
    fn fill(&self, page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> Result<bool, DomError>;
}

/// Dispatch table from control kind to strategy.
pub struct StrategyTable {
    strategies: HashMap<ControlKind, Box<dyn FillStrategy>>,
}

impl Default for StrategyTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register(ControlKind::Text, TextStrategy);
        table.register(ControlKind::Checkbox, ChoiceStrategy);
        table.register(ControlKind::Radio, ChoiceStrategy);
        table.register(ControlKind::Select, SelectStrategy);
        table.register(ControlKind::MultiSelect, SelectStrategy);
        table.register(ControlKind::CustomListbox, ListboxStrategy);
        table.register(ControlKind::File, FileStrategy);
        table.register(ControlKind::ContentEditable, EditableStrategy);
        table
    }
}

impl StrategyTable {
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Install or replace the strategy for `kind`.
    pub fn register(&mut self, kind: ControlKind, strategy: impl FillStrategy + 'static) {
        self.strategies.insert(kind, Box::new(strategy));
    }

    /// Fill `candidate` with `value`. Never fails: every problem is logged
    /// and reported as `false`.
    pub fn fill(&self, page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> bool {
        if !page.is_connected(candidate.element) {
            warn!(element = %candidate.element, "Field is no longer attached, skipping");
            return false;
        }

        let Some(strategy) = self.strategies.get(&candidate.kind) else {
            warn!(kind = ?candidate.kind, "No fill strategy registered");
            return false;
        };

        match strategy.fill(page, candidate, value) {
            Ok(true) => {
                debug!(element = %candidate.element, kind = ?candidate.kind, "Filled field");
                true
            }
            Ok(false) => {
                warn!(
                    element = %candidate.element,
                    label = %candidate.display_label(),
                    value = %value,
                    "Could not apply value"
                );
                false
            }
            Err(err) => {
                warn!(element = %candidate.element, error = %err, "Fill failed");
                false
            }
        }
    }
}

/// Fill with the default strategy table.
pub fn fill_field(page: &mut Page, candidate: &FieldCandidate, value: &FieldValue) -> bool {
    StrategyTable::default().fill(page, candidate, value)
}
