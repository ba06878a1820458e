use std::fmt;

use serde::Serialize;

use crate::dom::FileBlob;

/// A value the engine can write into a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    List(Vec<String>),
    File(FileBlob),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Textual rendering for text-like controls. Files have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Bool(true) => Some("Yes".to_string()),
            FieldValue::Bool(false) => Some("No".to_string()),
            FieldValue::List(items) => Some(items.join(", ")),
            FieldValue::File(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(s) => parse_bool_like(s),
            FieldValue::List(items) => Some(!items.is_empty()),
            FieldValue::File(_) => None,
        }
    }

    /// Candidate strings to look for among a control's options. Booleans
    /// expand to their yes/no spellings.
    pub fn match_targets(&self) -> Vec<String> {
        match self {
            FieldValue::Bool(b) => bool_synonyms(*b).iter().map(|s| s.to_string()).collect(),
            FieldValue::Text(s) => {
                let mut targets = vec![s.clone()];
                if let Some(b) = parse_bool_like(s) {
                    targets.extend(
                        bool_synonyms(b)
                            .iter()
                            .filter(|syn| !syn.eq_ignore_ascii_case(s))
                            .map(|syn| syn.to_string()),
                    );
                }
                targets
            }
            FieldValue::List(items) => items.clone(),
            FieldValue::File(_) => Vec::new(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::File(file) => write!(f, "file:{}", file.name),
            other => f.write_str(&other.as_text().unwrap_or_default()),
        }
    }
}

pub fn bool_synonyms(value: bool) -> &'static [&'static str] {
    if value {
        &["Yes", "true", "Y"]
    } else {
        &["No", "false", "N"]
    }
}

/// Interpret yes/no-like text.
pub fn parse_bool_like(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" | "on" | "checked" => Some(true),
        "no" | "n" | "false" | "0" | "off" | "unchecked" => Some(false),
        _ => None,
    }
}
