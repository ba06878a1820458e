pub mod matcher;
pub mod scorer;

pub use matcher::{Assignment, DEFAULT_THRESHOLD, MatchResult, Matcher};
pub use scorer::{ScoreBreakdown, Scorer, ScoringWeights};
