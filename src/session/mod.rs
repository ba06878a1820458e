pub mod application_session;

pub use application_session::{ApplicationSession, SessionStatus, SessionTracker, now_millis};
