use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::detector::detector_config::{DetectorConfig, TextKeywords};
use crate::dom::{NodeId, Page};

// ============================================================================
// Job-page detector: weighted heuristic signals over the whole document
// ============================================================================

/// The parts of `window.location` the detector reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub href: String,
    pub hostname: String,
}

impl Location {
    pub fn from_url(url: &Url) -> Self {
        Self {
            href: url.as_str().to_string(),
            hostname: url.host_str().unwrap_or_default().to_string(),
        }
    }

    pub fn parse(href: &str) -> Result<Self, url::ParseError> {
        Ok(Self::from_url(&Url::parse(href)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobPageSignal {
    pub name: String,
    pub weight: i32,
}

impl fmt::Display for JobPageSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{})", self.name, self.weight)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub score: i32,
    pub signals: Vec<JobPageSignal>,
    pub threshold: i32,
}

impl DetectionResult {
    pub fn is_job_page(&self) -> bool {
        self.score >= self.threshold
    }

    pub fn has_signal(&self, name: &str) -> bool {
        self.signals.iter().any(|s| s.name == name)
    }

    fn add(&mut self, name: &str, weight: i32) {
        self.score += weight;
        self.signals.push(JobPageSignal {
            name: name.to_string(),
            weight,
        });
    }
}

fn normalize_text(text: &str, max_chars: usize) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .chars()
        .take(max_chars)
        .collect()
}

fn includes_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| text.contains(k.as_str()))
}

/// Score how much the page looks like a job posting or application.
/// Read-only: never touches the page or the network.
pub fn score_page(page: &Page, location: &Location, config: &DetectorConfig) -> DetectionResult {
    let weights = &config.weights;
    let href = location.href.to_lowercase();
    let host = location.hostname.to_lowercase();
    let mut result = DetectionResult {
        score: 0,
        signals: Vec::new(),
        threshold: config.threshold,
    };

    if includes_any(&href, &config.url_keywords) {
        result.add("url_keyword", weights.url_keyword);
    }

    let on_ats = config
        .ats_domains
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)));
    if on_ats {
        result.add("known_ats_domain", weights.ats_domain);
    }

    let document = page.document();
    if has_structured_job_data(page, document) {
        result.add("structured_data_jobposting", weights.structured_data);
    }

    let body = page.find_first_tag(document, "body").unwrap_or(document);
    let body_text = normalize_text(&page.inner_text(body), config.max_text_length);
    let keywords = &config.text_keywords;
    let job_description = includes_any(&body_text, &keywords.job_description);
    let apply = includes_any(&body_text, &keywords.apply_actions);
    let resume = includes_any(&body_text, &keywords.resume);

    if job_description {
        result.add("text_job_description", weights.text_job_description);
    }
    if apply {
        result.add("text_apply", weights.text_apply);
    }
    if resume {
        result.add("text_resume", weights.text_resume);
    }
    if job_description && apply {
        result.add("text_job_apply_combo", weights.text_combo_bonus);
    }

    let forms = evaluate_forms(page, document, keywords, config);
    if forms.large_form {
        result.add("form_multiple_fields", weights.form_large);
    }
    if forms.file_input {
        result.add("form_cv_upload", weights.form_file_input);
    }
    if forms.resume_text {
        result.add("form_resume_text", weights.form_resume_text);
    }
    if forms.apply_button {
        result.add("form_apply_button", weights.form_apply_button);
    }

    debug!(
        score = result.score,
        threshold = result.threshold,
        signals = result.signals.len(),
        "Scored job page"
    );
    result
}

/// `JobPosting` in JSON-LD (including `@graph` and nested objects) or in
/// microdata `itemtype`.
pub fn has_structured_job_data(page: &Page, root: NodeId) -> bool {
    for script in page.elements_by_tag(root, "script") {
        let is_ld_json = page
            .attr(script, "type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if !is_ld_json {
            continue;
        }
        match serde_json::from_str::<Value>(&page.text_content(script)) {
            Ok(value) if has_job_posting_type(&value, 0) => return true,
            Ok(_) => {}
            Err(err) => debug!(error = %err, "Ignoring malformed JSON-LD"),
        }
    }

    page.descendant_elements(root).into_iter().any(|node| {
        page.has_attr(node, "itemscope")
            && page
                .attr(node, "itemtype")
                .is_some_and(|t| t.to_lowercase().contains("jobposting"))
    })
}

fn is_job_posting_type(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower == "jobposting" || lower.ends_with("/jobposting")
}

/// Depth-limited search for `@type` (or `type`) naming `JobPosting`.
pub fn has_job_posting_type(value: &Value, depth: usize) -> bool {
    if depth > 4 {
        return false;
    }

    match value {
        Value::Array(items) => items.iter().any(|item| has_job_posting_type(item, depth + 1)),
        Value::Object(map) => {
            let type_field = map.get("@type").or_else(|| map.get("type"));
            match type_field {
                Some(Value::String(t)) if is_job_posting_type(t) => return true,
                Some(Value::Array(types))
                    if types
                        .iter()
                        .any(|t| t.as_str().is_some_and(is_job_posting_type)) =>
                {
                    return true;
                }
                _ => {}
            }

            // `@graph`, `mainEntity` and any other nested node.
            map.values()
                .filter(|child| child.is_object() || child.is_array())
                .any(|child| has_job_posting_type(child, depth + 1))
        }
        _ => false,
    }
}

#[derive(Debug, Default)]
struct FormSignals {
    large_form: bool,
    file_input: bool,
    resume_text: bool,
    apply_button: bool,
}

fn evaluate_forms(page: &Page, root: NodeId, keywords: &TextKeywords, config: &DetectorConfig) -> FormSignals {
    let mut signals = FormSignals::default();

    for form in page.elements_by_tag(root, "form") {
        let elements = page.descendant_elements(form);
        let input_type = |node: NodeId| page.element(node).and_then(|el| el.input_type());

        let visible_fields = elements
            .iter()
            .filter(|n| matches!(page.tag(**n), Some("input" | "textarea" | "select")))
            .filter(|n| input_type(**n).as_deref() != Some("hidden"))
            .filter(|n| page.is_rendered(**n) && page.effective_visibility(**n) != "hidden")
            .count();
        if visible_fields >= config.form_min_fields {
            signals.large_form = true;
        }

        if elements.iter().any(|n| input_type(*n).as_deref() == Some("file")) {
            signals.file_input = true;
        }

        let form_text = normalize_text(&page.inner_text(form), config.max_form_text_length);
        if includes_any(&form_text, &keywords.resume) {
            signals.resume_text = true;
        }

        let has_apply_control = elements.iter().any(|n| {
            let is_control = page.tag(*n) == Some("button")
                || matches!(input_type(*n).as_deref(), Some("submit" | "button"));
            if !is_control {
                return false;
            }
            let text = normalize_text(&page.inner_text(*n), config.max_form_text_length);
            let label = if text.is_empty() {
                page.attr(*n, "value").unwrap_or_default().to_lowercase()
            } else {
                text
            };
            includes_any(&label, &config.form_apply_texts)
        });
        if has_apply_control {
            signals.apply_button = true;
        }
    }

    signals
}
