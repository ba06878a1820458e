pub mod candidate_model;
pub mod labels;
pub mod options;
pub mod scanner;
pub mod visibility;

pub use candidate_model::{ControlKind, FieldCandidate, FieldOption, LabelSources};
pub use scanner::discover;
