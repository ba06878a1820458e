use serde::Serialize;

use crate::canonical::CanonicalFieldType;
use crate::flow::report::{StopReason, UnfillReason};
use crate::session::now_millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    StepStarted,
    FieldFilled,
    FieldSkipped,
    Navigated,
    FlowFinished,
}

/// One line of the JSONL flow trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u64,
    pub step: usize,
    pub kind: TraceKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<CanonicalFieldType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<usize>,
}

impl TraceEvent {
    pub fn now(step: usize, kind: TraceKind) -> Self {
        Self {
            timestamp_ms: now_millis(),
            step,
            kind,
            field_type: None,
            label: None,
            score: None,
            reason: None,
            candidates: None,
        }
    }

    pub fn with_field(mut self, field_type: Option<CanonicalFieldType>, label: impl ToString) -> Self {
        self.field_type = field_type;
        self.label = Some(label.to_string());
        self
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_unfill_reason(mut self, reason: UnfillReason) -> Self {
        self.reason = Some(format!("{:?}", reason));
        self
    }

    pub fn with_stop_reason(mut self, reason: StopReason) -> Self {
        self.reason = Some(format!("{:?}", reason));
        self
    }

    pub fn with_candidates(mut self, count: usize) -> Self {
        self.candidates = Some(count);
        self
    }
}
