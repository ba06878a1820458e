use std::fmt;

use crate::dom::DomError;

#[derive(Debug)]
pub enum EngineError {
    /// Reading or writing a file failed (HTML page, profile, report)
    Io { path: String, source: std::io::Error },

    /// Profile file is not valid YAML/JSON for the profile schema
    ProfileParse { path: String, source: serde_yaml::Error },

    /// Page model rejected an operation (bad URL, cross-origin access, ...)
    Dom(DomError),

    /// Text generation collaborator could not produce an answer
    TextGeneration(String),

    /// HTTP request to the text generation backend failed
    Http { context: String, source: reqwest::Error },

    /// JSON serialization failed (report, trace event)
    JsonSerialize { context: String, source: serde_json::Error },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io { path, source } => write!(f, "I/O error on '{}': {}", path, source),
            EngineError::ProfileParse { path, source } => {
                write!(f, "Invalid profile '{}': {}", path, source)
            }
            EngineError::Dom(err) => write!(f, "DOM error: {}", err),
            EngineError::TextGeneration(msg) => write!(f, "Text generation failed: {}", msg),
            EngineError::Http { context, source } => {
                write!(f, "HTTP error ({}): {}", context, source)
            }
            EngineError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io { source, .. } => Some(source),
            EngineError::ProfileParse { source, .. } => Some(source),
            EngineError::Dom(err) => Some(err),
            EngineError::Http { source, .. } => Some(source),
            EngineError::JsonSerialize { source, .. } => Some(source),
            EngineError::TextGeneration(_) => None,
        }
    }
}

impl From<DomError> for EngineError {
    fn from(err: DomError) -> Self {
        EngineError::Dom(err)
    }
}
