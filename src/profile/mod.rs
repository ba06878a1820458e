pub mod mapping;
pub mod profile_model;

use serde::Deserialize;

use crate::error::EngineError;

pub use mapping::{RawUserProfile, UserPreferences, map_user_to_canonical};
pub use profile_model::{CanonicalProfile, ResumeFile};

/// Accepted profile file layouts: the canonical profile itself, or the
/// stored user profile with its preferences.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProfileDocument {
    Stored {
        user: RawUserProfile,
        #[serde(default)]
        preferences: UserPreferences,
    },
    Canonical(CanonicalProfile),
}

/// Parse a profile from YAML or JSON text.
pub fn parse_profile(content: &str, path: &str) -> Result<CanonicalProfile, EngineError> {
    let document: ProfileDocument =
        serde_yaml::from_str(content).map_err(|source| EngineError::ProfileParse {
            path: path.to_string(),
            source,
        })?;

    Ok(match document {
        ProfileDocument::Stored { user, preferences } => map_user_to_canonical(&user, &preferences),
        ProfileDocument::Canonical(profile) => profile,
    })
}

pub fn load_profile(path: &str) -> Result<CanonicalProfile, EngineError> {
    let content = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_profile(&content, path)
}
