pub mod choice;
pub mod editable;
pub mod events;
pub mod file;
pub mod option_match;
pub mod select;
pub mod strategy;
pub mod text;
pub mod value;

pub use strategy::{FillStrategy, StrategyTable, fill_field};
pub use value::{FieldValue, parse_bool_like};
