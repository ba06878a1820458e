use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EngineError;

/// Authors answers for open-ended questions ("Why do you want this role?").
/// `None` leaves the field for a human; callers never retry.
pub trait TextGenerator {
    fn generate(&self, field_label: &str, profile_summary: &str) -> Option<String>;
}

/// Generator that never answers.
pub struct NoTextGenerator;

impl TextGenerator for NoTextGenerator {
    fn generate(&self, _field_label: &str, _profile_summary: &str) -> Option<String> {
        None
    }
}

/// Same canned answer for every question.
pub struct StaticTextGenerator {
    pub answer: String,
}

impl StaticTextGenerator {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
        }
    }
}

impl TextGenerator for StaticTextGenerator {
    fn generate(&self, _field_label: &str, _profile_summary: &str) -> Option<String> {
        let answer = self.answer.trim();
        (!answer.is_empty()).then(|| answer.to_string())
    }
}

// ============================================================================
// Ollama Backend
// ============================================================================

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:1.5b";
/// Upper bound on one generate call, connect included.
pub const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 60;

pub struct OllamaTextGenerator {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaTextGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL)
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaTextGenerator {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            timeout: Duration::from_secs(DEFAULT_OLLAMA_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_prompt(&self, field_label: &str, profile_summary: &str) -> String {
        format!(
r#"You are filling in a job application on behalf of a candidate.
Answer the application question below in a professional, concise way
(at most 150 words). Write in the first person. Do not use placeholders
like "[Company]". Return ONLY the answer text.

CANDIDATE SUMMARY:
{}

QUESTION:
{}"#,
            if profile_summary.trim().is_empty() { "(none)" } else { profile_summary.trim() },
            field_label.trim()
        )
    }

    /// One blocking request to the Ollama generate endpoint.
    pub fn request(&self, field_label: &str, profile_summary: &str) -> Result<String, EngineError> {
        let request = OllamaRequest {
            model: &self.model,
            prompt: self.build_prompt(field_label, profile_summary),
            stream: false,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| EngineError::Http {
                context: "build HTTP client".to_string(),
                source,
            })?;
        let response = client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|source| EngineError::Http {
                context: format!("POST {}", self.endpoint),
                source,
            })?;

        let body: OllamaResponse = response.json().map_err(|source| EngineError::Http {
            context: "decode Ollama response".to_string(),
            source,
        })?;

        let answer = body.response.trim().to_string();
        if answer.is_empty() {
            return Err(EngineError::TextGeneration(format!(
                "model '{}' returned an empty answer",
                self.model
            )));
        }
        Ok(answer)
    }
}

impl TextGenerator for OllamaTextGenerator {
    fn generate(&self, field_label: &str, profile_summary: &str) -> Option<String> {
        debug!(model = %self.model, question = field_label, "Requesting generated answer");
        match self.request(field_label, profile_summary) {
            Ok(answer) => Some(answer),
            Err(err) => {
                warn!(error = %err, question = field_label, "Text generation failed, leaving field unfilled");
                None
            }
        }
    }
}
