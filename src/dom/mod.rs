pub mod error;
pub mod events;
pub mod node;
pub mod page;
pub mod parser;
pub mod selector;
pub mod style;
pub mod transfer;

pub use error::DomError;
pub use events::{Event, EventRecord, EventType};
pub use node::{ElementData, FrameContent, NodeId, NodeKind};
pub use page::Page;
pub use parser::parse_html;
pub use selector::Selector;
pub use transfer::{DataTransfer, FileBlob};
