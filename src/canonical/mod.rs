pub mod canonical_model;
pub mod synonyms;

pub use canonical_model::{CanonicalFieldType, PRIORITY_ORDER};
pub use synonyms::{SynonymEntry, synonyms};
