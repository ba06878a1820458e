//! Semantic form understanding for job application pages: discover the
//! fillable controls of an unknown page, infer what each one asks for, fill
//! them from a canonical profile, and drive multi-step application flows.

pub mod canonical;
pub mod cli;
pub mod detector;
pub mod discovery;
pub mod dom;
pub mod error;
pub mod fill;
pub mod flow;
pub mod matching;
pub mod profile;
pub mod session;
pub mod trace;

pub use error::EngineError;
