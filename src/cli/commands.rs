use std::time::Duration;

use tracing::{info, warn};

use crate::cli::config::{AppConfig, resolve_ollama};
use crate::detector::{DetectionResult, Location, score_page};
use crate::discovery::discover;
use crate::dom::{Page, parse_html};
use crate::error::EngineError;
use crate::flow::text_generation::DEFAULT_OLLAMA_TIMEOUT_SECS;
use crate::flow::{
    FlowController, FlowReport, NoTextGenerator, NoopSleeper, OllamaTextGenerator, StaticTextGenerator,
    ThreadSleeper,
};
use crate::profile::load_profile;
use crate::session::SessionTracker;
use crate::trace::TraceLogger;

/// Read a saved HTML document and build its page model.
pub fn load_page(html_path: &str, url: &str) -> Result<Page, EngineError> {
    let html = std::fs::read_to_string(html_path).map_err(|source| EngineError::Io {
        path: html_path.to_string(),
        source,
    })?;
    Ok(parse_html(&html, url)?)
}

// ============================================================================
// detect subcommand
// ============================================================================

pub fn cmd_detect(
    html_path: &str,
    url: &str,
    config: &AppConfig,
) -> Result<DetectionResult, Box<dyn std::error::Error>> {
    let page = load_page(html_path, url)?;
    let location = Location::from_url(page.url());
    let result = score_page(&page, &location, &config.detector);

    println!("Score: {} (threshold {})", result.score, result.threshold);
    for signal in &result.signals {
        println!("  - {}", signal);
    }
    println!(
        "Verdict: {}",
        if result.is_job_page() { "job page" } else { "not a job page" }
    );

    Ok(result)
}

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(
    html_path: &str,
    url: &str,
    explain: bool,
    config: &AppConfig,
) -> Result<usize, Box<dyn std::error::Error>> {
    let page = load_page(html_path, url)?;
    let candidates = discover(&page, page.document());
    let matcher = config.matching.matcher();
    let matches = matcher.match_fields(&candidates);

    println!("Discovered {} fields:", candidates.len());
    for candidate in &candidates {
        let required = if candidate.required { " *" } else { "" };
        println!(
            "  [{}] {:?} '{}'{}{}",
            candidate.element,
            candidate.kind,
            candidate.display_label(),
            required,
            if candidate.is_group() {
                format!(" ({} options)", candidate.options.len())
            } else {
                String::new()
            }
        );
    }

    println!("Matched {} canonical types:", matches.len());
    for assignment in matches.assignments() {
        println!(
            "  {} -> [{}] '{}' (score {})",
            assignment.field_type,
            assignment.candidate.element,
            assignment.candidate.display_label(),
            assignment.score
        );
        if explain {
            let breakdown = matcher.scorer().evaluate(assignment.candidate, assignment.field_type);
            for contribution in &breakdown.contributions {
                println!("      {:+} {}", contribution.points, contribution.signal);
            }
        }
    }

    Ok(matches.len())
}

// ============================================================================
// fill subcommand
// ============================================================================

pub struct FillOptions<'a> {
    pub html_path: &'a str,
    pub url: &'a str,
    pub profile_path: &'a str,
    pub output: Option<&'a str>,
    pub max_steps: Option<usize>,
    pub generator: &'a str,
    pub answer: Option<&'a str>,
    pub trace: Option<&'a str>,
    pub no_wait: bool,
    pub sessions: Option<&'a str>,
    pub ollama_endpoint: Option<&'a str>,
    pub ollama_model: Option<&'a str>,
}

pub fn cmd_fill(options: &FillOptions<'_>, config: &AppConfig) -> Result<FlowReport, Box<dyn std::error::Error>> {
    let mut page = load_page(options.html_path, options.url)?;
    let profile = load_profile(options.profile_path)?;

    let mut flow_config = config.flow.clone();
    if let Some(max_steps) = options.max_steps {
        flow_config.max_steps = max_steps;
    }

    let mut controller = FlowController::new(flow_config)
        .with_detector(config.detector.clone())
        .with_matcher(config.matching.matcher());

    controller = match options.generator {
        "ollama" => {
            let (endpoint, model) =
                resolve_ollama(options.ollama_endpoint, options.ollama_model, &config.ollama);
            let timeout = config.ollama.timeout_secs.unwrap_or(DEFAULT_OLLAMA_TIMEOUT_SECS);
            info!(endpoint = %endpoint, model = %model, timeout_secs = timeout, "Using Ollama for free-text answers");
            controller.with_generator(
                OllamaTextGenerator::new(&endpoint, &model).with_timeout(Duration::from_secs(timeout)),
            )
        }
        "static" => controller.with_generator(StaticTextGenerator::new(options.answer.unwrap_or_default())),
        _ => controller.with_generator(NoTextGenerator),
    };

    controller = if options.no_wait {
        controller.with_sleeper(NoopSleeper)
    } else {
        controller.with_sleeper(ThreadSleeper)
    };

    if let Some(trace_path) = options.trace {
        controller = controller.with_tracer(TraceLogger::new(trace_path));
    }

    if let Some(path) = options.sessions {
        controller = controller.with_sessions(load_sessions(path));
    }

    let report = controller.run(&mut page, &profile);

    if let Some(path) = options.sessions {
        save_sessions(path, &controller.sessions())?;
    }

    let json = serde_json::to_string_pretty(&report).map_err(|source| EngineError::JsonSerialize {
        context: "flow report".to_string(),
        source,
    })?;

    match options.output {
        Some(path) => std::fs::write(path, &json).map_err(|source| EngineError::Io {
            path: path.to_string(),
            source,
        })?,
        None => println!("{}", json),
    }

    Ok(report)
}

// ============================================================================
// Session store
// ============================================================================

/// Sessions saved by an earlier run. A missing file starts empty; a
/// malformed one is replaced.
pub fn load_sessions(path: &str) -> SessionTracker {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path, error = %e, "Malformed session store, starting fresh");
            SessionTracker::new()
        }),
        Err(_) => SessionTracker::new(),
    }
}

pub fn save_sessions(path: &str, sessions: &SessionTracker) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(sessions).map_err(|source| EngineError::JsonSerialize {
        context: "session store".to_string(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| EngineError::Io {
        path: path.to_string(),
        source,
    })
}
