use serde::{Deserialize, Serialize};

use crate::canonical::{CanonicalFieldType, SynonymEntry, synonyms};
use crate::discovery::{ControlKind, FieldCandidate};

// ============================================================================
// Field scorer: additive affinity between a candidate and a canonical type
// ============================================================================

/// Tunable points. Only the relative order matters: autocomplete > exact
/// attribute > label > aria-labelledby > aria-label > legend > placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub attribute_exact: i32,
    pub attribute_token: i32,
    pub autocomplete: i32,
    pub label: i32,
    pub aria_labelledby: i32,
    pub aria_label: i32,
    pub legend: i32,
    pub placeholder: i32,
    pub surrounding_text: i32,
    pub email_type_boost: i32,
    pub tel_type_boost: i32,
    pub file_type_boost: i32,
    pub url_type_boost: i32,
    pub long_text_boost: i32,
    pub choice_boost: i32,
    pub yes_no_select_boost: i32,
    pub incompatible_penalty: i32,
    pub resume_non_file_penalty: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            attribute_exact: 50,
            attribute_token: 25,
            autocomplete: 60,
            label: 40,
            aria_labelledby: 38,
            aria_label: 35,
            legend: 32,
            placeholder: 30,
            surrounding_text: 10,
            email_type_boost: 40,
            tel_type_boost: 45,
            file_type_boost: 45,
            url_type_boost: 15,
            long_text_boost: 15,
            choice_boost: 15,
            yes_no_select_boost: 10,
            incompatible_penalty: 100,
            resume_non_file_penalty: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreContribution {
    pub signal: &'static str,
    pub points: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub total: i32,
    pub contributions: Vec<ScoreContribution>,
}

impl ScoreBreakdown {
    fn add(&mut self, signal: &'static str, points: i32) {
        self.total += points;
        self.contributions.push(ScoreContribution { signal, points });
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, candidate: &FieldCandidate, field_type: CanonicalFieldType) -> i32 {
        self.evaluate(candidate, field_type).total
    }

    /// Score with the individual signals that produced it.
    pub fn evaluate(&self, candidate: &FieldCandidate, field_type: CanonicalFieldType) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::default();
        let Some(entry) = synonyms(field_type) else {
            return breakdown;
        };
        let w = &self.weights;

        // 1. Attributes
        let name = candidate.name.as_deref().unwrap_or_default();
        let id = candidate.id.as_deref().unwrap_or_default();
        if attribute_exact(entry, name) || attribute_exact(entry, id) {
            breakdown.add("attribute_exact", w.attribute_exact);
        } else if attribute_tokens(entry, name) || attribute_tokens(entry, id) {
            breakdown.add("attribute_token", w.attribute_token);
        }

        if let Some(autocomplete) = candidate.autocomplete.as_deref() {
            if autocomplete_matches(entry, autocomplete) {
                breakdown.add("autocomplete", w.autocomplete);
            }
        }

        // 2. Label-like text, weighted per source
        let labels = &candidate.labels;
        let sources = [
            ("label", labels.label.as_deref(), w.label),
            ("aria_labelledby", labels.aria_labelledby.as_deref(), w.aria_labelledby),
            ("aria_label", labels.aria_label.as_deref(), w.aria_label),
            ("legend", labels.legend.as_deref(), w.legend),
            ("placeholder", labels.placeholder.as_deref(), w.placeholder),
        ];
        for (signal, text, points) in sources {
            if text.is_some_and(|t| contains_keyword(t, entry.labels)) {
                breakdown.add(signal, points);
            }
        }
        if labels.is_empty()
            && candidate
                .surrounding_text
                .as_deref()
                .is_some_and(|t| contains_keyword(t, entry.labels))
        {
            breakdown.add("surrounding_text", w.surrounding_text);
        }

        // 3. Control-kind boosts
        let input_type = candidate
            .input_type
            .as_deref()
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let kind = candidate.kind;

        if field_type == CanonicalFieldType::Email && input_type == "email" {
            breakdown.add("email_type", w.email_type_boost);
        }
        if field_type == CanonicalFieldType::Phone && input_type == "tel" {
            breakdown.add("tel_type", w.tel_type_boost);
        }
        if field_type == CanonicalFieldType::Resume && kind == ControlKind::File {
            breakdown.add("file_type", w.file_type_boost);
        }
        if field_type.is_url() && input_type == "url" {
            breakdown.add("url_type", w.url_type_boost);
        }
        if field_type.is_long_text() && is_long_text_control(candidate) {
            breakdown.add("long_text_control", w.long_text_boost);
        }
        if field_type.is_boolean_preference() {
            if kind.is_choice() {
                breakdown.add("choice_control", w.choice_boost);
            } else if kind == ControlKind::Select && has_yes_no_options(candidate) {
                breakdown.add("yes_no_select", w.yes_no_select_boost);
            }
        }

        // 4. Negative signals
        let penalty = -w.incompatible_penalty;
        if field_type == CanonicalFieldType::Email && input_type == "tel" {
            breakdown.add("tel_for_email", penalty);
        }
        if field_type == CanonicalFieldType::Phone && input_type == "email" {
            breakdown.add("email_for_phone", penalty);
        }
        if field_type == CanonicalFieldType::Country && contains_word(&candidate.aggregate_text(), "city") {
            breakdown.add("city_in_country", penalty);
        }
        if kind == ControlKind::File
            && !matches!(field_type, CanonicalFieldType::Resume | CanonicalFieldType::CoverLetter)
        {
            breakdown.add("file_for_text_type", penalty);
        }
        if field_type == CanonicalFieldType::Resume {
            if kind != ControlKind::File {
                breakdown.add("resume_not_file", -w.resume_non_file_penalty);
            }
            if candidate.aggregate_text().contains("cover letter") {
                breakdown.add("cover_letter_for_resume", penalty);
            }
        }
        if kind.is_choice()
            && (field_type.is_identity_or_contact() || field_type.is_url() || field_type.is_long_text())
        {
            breakdown.add("choice_for_text_type", penalty);
        }

        breakdown
    }
}

fn is_long_text_control(candidate: &FieldCandidate) -> bool {
    candidate.tag == "textarea"
        || candidate.kind == ControlKind::ContentEditable
        || candidate.role.as_deref() == Some("textbox")
}

fn has_yes_no_options(candidate: &FieldCandidate) -> bool {
    let has = |word: &str| {
        candidate.options.iter().any(|o| {
            o.label.trim().eq_ignore_ascii_case(word) || o.value.trim().eq_ignore_ascii_case(word)
        })
    };
    has("yes") && has("no")
}

/// Lowercase and keep only ASCII letters and digits.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Split an attribute into lowercase word tokens on separators and
/// camelCase boundaries (`applicantFirstName` → applicant, first, name).
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in text.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn attribute_exact(entry: &SynonymEntry, value: &str) -> bool {
    let value = normalize(value);
    !value.is_empty() && entry.attributes.iter().any(|kw| normalize(kw) == value)
}

fn attribute_tokens(entry: &SynonymEntry, value: &str) -> bool {
    let tokens = tokenize(value);
    if tokens.is_empty() {
        return false;
    }
    entry.attributes.iter().any(|kw| {
        let needle = tokenize(kw);
        !needle.is_empty() && tokens.windows(needle.len()).any(|w| w == needle.as_slice())
    })
}

fn autocomplete_matches(entry: &SynonymEntry, autocomplete: &str) -> bool {
    autocomplete
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .any(|token| entry.autocomplete.contains(&token.as_str()))
}

/// `true` when `text` contains `word` delimited by non-alphanumerics.
pub fn contains_word(text: &str, word: &str) -> bool {
    let haystack = text.to_lowercase();
    let needle = word.to_lowercase();
    if needle.is_empty() {
        return false;
    }

    let mut start = 0;
    while let Some(offset) = haystack[start..].find(&needle) {
        let begin = start + offset;
        let end = begin + needle.len();
        let before_ok = haystack[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..].chars().next().is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + haystack[begin..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

pub fn contains_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| contains_word(text, kw))
}
