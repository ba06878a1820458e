use std::collections::HashSet;

use tracing::debug;

use crate::canonical::{CanonicalFieldType, PRIORITY_ORDER};
use crate::discovery::FieldCandidate;
use crate::dom::NodeId;
use crate::matching::scorer::Scorer;

pub const DEFAULT_THRESHOLD: i32 = 40;

/// One canonical type claimed by one candidate.
#[derive(Debug, Clone, Copy)]
pub struct Assignment<'a> {
    pub field_type: CanonicalFieldType,
    pub candidate: &'a FieldCandidate,
    pub score: i32,
}

/// Result of one greedy matching pass. Borrows the candidates it was built
/// from, so it cannot outlive the discovery pass.
#[derive(Debug, Default)]
pub struct MatchResult<'a> {
    assignments: Vec<Assignment<'a>>,
    used: HashSet<NodeId>,
}

impl<'a> MatchResult<'a> {
    /// Assignments in priority order.
    pub fn assignments(&self) -> &[Assignment<'a>] {
        &self.assignments
    }

    pub fn get(&self, field_type: CanonicalFieldType) -> Option<&'a FieldCandidate> {
        self.assignments
            .iter()
            .find(|a| a.field_type == field_type)
            .map(|a| a.candidate)
    }

    pub fn is_used(&self, element: NodeId) -> bool {
        self.used.contains(&element)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Matcher {
    scorer: Scorer,
    threshold: i32,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(Scorer::default(), DEFAULT_THRESHOLD)
    }
}

impl Matcher {
    pub fn new(scorer: Scorer, threshold: i32) -> Self {
        Self { scorer, threshold }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Greedy, priority-ordered one-to-one assignment.
    ///
    /// For each type in `PRIORITY_ORDER`, the highest-scoring unused
    /// candidate wins if it reaches the threshold; ties keep the candidate
    /// discovered first.
    pub fn match_fields<'a>(&self, candidates: &'a [FieldCandidate]) -> MatchResult<'a> {
        let mut result = MatchResult::default();

        for field_type in PRIORITY_ORDER {
            let mut best: Option<(&FieldCandidate, i32)> = None;

            for candidate in candidates {
                if result.used.contains(&candidate.element) {
                    continue;
                }
                let score = self.scorer.score(candidate, field_type);
                if best.is_none_or(|(_, top)| score > top) {
                    best = Some((candidate, score));
                }
            }

            let Some((candidate, score)) = best else {
                continue;
            };
            if score < self.threshold {
                continue;
            }

            debug!(
                field_type = %field_type,
                element = %candidate.element,
                score,
                "Matched field"
            );
            result.used.insert(candidate.element);
            result.assignments.push(Assignment {
                field_type,
                candidate,
                score,
            });
        }

        result
    }
}
