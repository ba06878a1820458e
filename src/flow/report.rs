use std::collections::HashSet;

use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::canonical::CanonicalFieldType;
use crate::detector::DetectionResult;
use crate::discovery::{ControlKind, FieldCandidate};
use crate::flow::platform::Platform;
use crate::session::ApplicationSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfillReason {
    /// Matched, but the profile has no value (or generation failed)
    NoValue,
    /// A strategy could not apply the value, or the element went away
    FillRejected,
    /// Required control that no canonical type claimed
    NoMatch,
}

/// A field left for the human follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnfilledField {
    pub field_type: Option<CanonicalFieldType>,
    pub label: String,
    pub kind: ControlKind,
    pub reason: UnfillReason,
    pub required: bool,
    pub fingerprint: String,
}

impl UnfilledField {
    pub fn new(candidate: &FieldCandidate, field_type: Option<CanonicalFieldType>, reason: UnfillReason) -> Self {
        Self {
            field_type,
            label: candidate.display_label(),
            kind: candidate.kind,
            reason,
            required: candidate.required,
            fingerprint: fingerprint(candidate),
        }
    }
}

/// Stable identity of a field across discovery passes.
pub fn fingerprint(candidate: &FieldCandidate) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("{:?}", candidate.kind).as_bytes());
    hasher.update([0u8]);
    hasher.update(candidate.name.as_deref().unwrap_or_default().as_bytes());
    hasher.update([0u8]);
    hasher.update(candidate.id.as_deref().unwrap_or_default().as_bytes());
    hasher.update([0u8]);
    hasher.update(candidate.combined_label().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No forward navigation control in the current step
    NoNavigation,
    MaxSteps,
    Stopped,
    /// Clicking "next" changed neither the fields nor the visible text
    Stalled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub index: usize,
    pub scoped_to_modal: bool,
    pub candidates: usize,
    pub matched: usize,
    pub filled: usize,
    pub advanced: bool,
}

/// Outcome of one flow run.
#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    pub platform: Platform,
    pub steps: Vec<StepSummary>,
    pub filled: usize,
    pub unfilled: Vec<UnfilledField>,
    pub detection: DetectionResult,
    pub stop_reason: StopReason,
    /// Application session for the page's host as of the end of the run
    pub session: Option<ApplicationSession>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl FlowReport {
    pub fn new(platform: Platform, detection: DetectionResult) -> Self {
        Self {
            platform,
            steps: Vec::new(),
            filled: 0,
            unfilled: Vec::new(),
            detection,
            stop_reason: StopReason::NoNavigation,
            session: None,
            seen: HashSet::new(),
        }
    }

    /// Record an unfilled field once per fingerprint.
    pub fn push_unfilled(&mut self, field: UnfilledField) -> bool {
        if !self.seen.insert(field.fingerprint.clone()) {
            return false;
        }
        self.unfilled.push(field);
        true
    }

    /// Drop an earlier unfilled entry once a later step fills the field.
    pub fn resolve(&mut self, fingerprint: &str) {
        if self.seen.remove(fingerprint) {
            self.unfilled.retain(|f| f.fingerprint != fingerprint);
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
