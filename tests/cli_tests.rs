use clap::Parser;
use job_autofill::cli::commands::{FillOptions, cmd_detect, cmd_fill, cmd_scan, load_page, load_sessions};
use job_autofill::cli::config::{AppConfig, Cli, Commands, OllamaConfig, load_config, resolve_ollama};
use job_autofill::flow::StopReason;
use job_autofill::flow::text_generation::{DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL};
use job_autofill::session::SessionStatus;
use job_autofill::trace::{TraceEvent, TraceKind, TraceLogger};

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_detect() {
    let cli = Cli::parse_from([
        "job-autofill",
        "detect",
        "--html",
        "page.html",
        "--url",
        "https://jobs.lever.co/acme/1",
    ]);
    match cli.command {
        Commands::Detect { html, url } => {
            assert_eq!(html, "page.html");
            assert_eq!(url, "https://jobs.lever.co/acme/1");
        }
        _ => panic!("Expected Detect command"),
    }
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_parse_scan_with_explain() {
    let cli = Cli::parse_from([
        "job-autofill",
        "scan",
        "--html",
        "form.html",
        "--url",
        "https://example.com/apply",
        "--explain",
    ]);
    match cli.command {
        Commands::Scan { explain, .. } => assert!(explain),
        _ => panic!("Expected Scan command"),
    }
}

#[test]
fn cli_parse_fill_defaults() {
    let cli = Cli::parse_from([
        "job-autofill",
        "fill",
        "--html",
        "form.html",
        "--url",
        "https://example.com/apply",
        "--profile",
        "me.yaml",
    ]);
    match cli.command {
        Commands::Fill {
            profile,
            output,
            max_steps,
            generator,
            answer,
            trace,
            no_wait,
            ..
        } => {
            assert_eq!(profile, "me.yaml");
            assert!(output.is_none());
            assert!(max_steps.is_none());
            assert_eq!(generator, "none");
            assert!(answer.is_none());
            assert!(trace.is_none());
            assert!(!no_wait);
        }
        _ => panic!("Expected Fill command"),
    }
}

#[test]
fn cli_parse_fill_all_args_and_globals() {
    let cli = Cli::parse_from([
        "job-autofill",
        "-vv",
        "fill",
        "--html",
        "form.html",
        "--url",
        "https://example.com/apply",
        "--profile",
        "me.yaml",
        "-o",
        "report.json",
        "--max-steps",
        "4",
        "--generator",
        "ollama",
        "--trace",
        "trace.jsonl",
        "--no-wait",
        "--ollama-model",
        "llama3",
        "--config",
        "custom.yaml",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.ollama_model.as_deref(), Some("llama3"));
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    match cli.command {
        Commands::Fill {
            output,
            max_steps,
            generator,
            trace,
            no_wait,
            ..
        } => {
            assert_eq!(output.as_deref(), Some("report.json"));
            assert_eq!(max_steps, Some(4));
            assert_eq!(generator, "ollama");
            assert_eq!(trace.as_deref(), Some("trace.jsonl"));
            assert!(no_wait);
        }
        _ => panic!("Expected Fill command"),
    }
}

#[test]
fn cli_fill_requires_profile() {
    let result = Cli::try_parse_from([
        "job-autofill",
        "fill",
        "--html",
        "form.html",
        "--url",
        "https://example.com/apply",
    ]);
    assert!(result.is_err());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_missing_file_uses_defaults() {
    let config = load_config(Some("/nonexistent/job-autofill.yaml"));
    assert_eq!(config.detector.threshold, 6);
    assert_eq!(config.flow.max_steps, 10);
    assert_eq!(config.matching.threshold, 40);
    assert_eq!(config.matching.weights.autocomplete, 60);
    assert!(config.ollama.endpoint.is_none());
}

#[test]
fn config_partial_yaml_overrides_only_named_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job-autofill.yaml");
    std::fs::write(
        &path,
        r#"
detector:
  threshold: 9
flow:
  max_steps: 4
  next_keywords: ["weiter", "next"]
matching:
  weights:
    placeholder: 20
ollama:
  model: llama3
"#,
    )
    .unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.detector.threshold, 9);
    assert_eq!(config.detector.weights.structured_data, 8);
    assert_eq!(config.flow.max_steps, 4);
    assert_eq!(config.flow.next_keywords, vec!["weiter".to_string(), "next".to_string()]);
    assert_eq!(config.flow.fill_settle_ms, 1_000);
    assert_eq!(config.matching.threshold, 40);
    assert_eq!(config.matching.weights.placeholder, 20);
    assert_eq!(config.matching.weights.label, 40);
    assert_eq!(config.ollama.model.as_deref(), Some("llama3"));
}

#[test]
fn config_malformed_yaml_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "flow: [not, a, map").unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.flow.max_steps, 10);
}

#[test]
fn ollama_settings_prefer_cli_then_config() {
    let config = OllamaConfig {
        endpoint: Some("http://gpu-box:11434/api/generate".into()),
        model: None,
        timeout_secs: None,
    };

    let (endpoint, model) = resolve_ollama(None, None, &config);
    assert_eq!(endpoint, "http://gpu-box:11434/api/generate");
    assert_eq!(model, DEFAULT_OLLAMA_MODEL);

    let (endpoint, model) = resolve_ollama(Some("http://local:1/api/generate"), Some("phi3"), &config);
    assert_eq!(endpoint, "http://local:1/api/generate");
    assert_eq!(model, "phi3");

    let (endpoint, _) = resolve_ollama(None, None, &OllamaConfig::default());
    assert_eq!(endpoint, DEFAULT_OLLAMA_ENDPOINT);
}

// ============================================================================
// Command Tests
// ============================================================================

const FORM_HTML: &str = r#"<html><body><form>
    <label for="first">First name</label><input id="first" name="first">
    <label for="email">Email</label><input id="email" name="email" type="email">
</form></body></html>"#;

const PROFILE_YAML: &str = "user:\n  full_name: Robin Diaz\n  email: robin@example.com\n";

#[test]
fn load_page_reports_missing_file() {
    assert!(load_page("/nonexistent/page.html", "https://example.com").is_err());
}

#[test]
fn detect_and_scan_read_saved_pages() {
    let dir = tempfile::tempdir().unwrap();
    let html = dir.path().join("page.html");
    std::fs::write(&html, FORM_HTML).unwrap();
    let html = html.to_str().unwrap();
    let config = AppConfig::default();

    let result = cmd_detect(html, "https://boards.greenhouse.io/acme/jobs/7", &config).unwrap();
    assert!(result.has_signal("known_ats_domain"));

    let matched = cmd_scan(html, "https://example.com/apply", true, &config).unwrap();
    assert_eq!(matched, 2);
}

#[test]
fn fill_writes_json_report_and_trace() {
    let dir = tempfile::tempdir().unwrap();
    let html = dir.path().join("page.html");
    let profile = dir.path().join("profile.yaml");
    let output = dir.path().join("report.json");
    let trace = dir.path().join("trace.jsonl");
    std::fs::write(&html, FORM_HTML).unwrap();
    std::fs::write(&profile, PROFILE_YAML).unwrap();

    let options = FillOptions {
        html_path: html.to_str().unwrap(),
        url: "https://example.com/apply",
        profile_path: profile.to_str().unwrap(),
        output: output.to_str(),
        max_steps: Some(2),
        generator: "none",
        answer: None,
        trace: trace.to_str(),
        no_wait: true,
        sessions: None,
        ollama_endpoint: None,
        ollama_model: None,
    };
    let report = cmd_fill(&options, &AppConfig::default()).unwrap();
    assert_eq!(report.filled, 2);
    assert_eq!(report.stop_reason, StopReason::NoNavigation);

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["filled"], 2);
    assert_eq!(written["stop_reason"], "no_navigation");
    assert_eq!(written["platform"], "unknown");

    let lines: Vec<serde_json::Value> = std::fs::read_to_string(&trace)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.first().map(|l| l["kind"].clone()), Some("step_started".into()));
    assert_eq!(lines.last().map(|l| l["kind"].clone()), Some("flow_finished".into()));
    let filled = lines.iter().filter(|l| l["kind"] == "field_filled").count();
    assert_eq!(filled, 2);
}

#[test]
fn fill_keeps_sessions_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let html = dir.path().join("page.html");
    let profile = dir.path().join("profile.yaml");
    let output = dir.path().join("report.json");
    let store = dir.path().join("sessions.json");
    std::fs::write(&html, FORM_HTML).unwrap();
    std::fs::write(&profile, PROFILE_YAML).unwrap();

    let options = FillOptions {
        html_path: html.to_str().unwrap(),
        url: "https://careers.acme.test/apply",
        profile_path: profile.to_str().unwrap(),
        output: output.to_str(),
        max_steps: None,
        generator: "none",
        answer: None,
        trace: None,
        no_wait: true,
        sessions: store.to_str(),
        ollama_endpoint: None,
        ollama_model: None,
    };
    let report = cmd_fill(&options, &AppConfig::default()).unwrap();
    let id = report.session.map(|s| s.id).unwrap();

    let saved = load_sessions(store.to_str().unwrap());
    let session = saved.get("careers.acme.test").unwrap();
    assert_eq!(session.id, id);
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.steps_visited, vec!["https://careers.acme.test/apply".to_string()]);
}

#[test]
fn malformed_session_store_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("sessions.json");
    std::fs::write(&store, "{not json").unwrap();

    assert!(load_sessions(store.to_str().unwrap()).is_empty());
    assert!(load_sessions("/nonexistent/sessions.json").is_empty());
}

// ============================================================================
// Trace Logger Tests
// ============================================================================

#[test]
fn trace_logger_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let logger = TraceLogger::new(path.to_str().unwrap());
    assert!(logger.is_enabled());

    logger.log(&TraceEvent::now(0, TraceKind::StepStarted).with_candidates(3));
    logger.log(&TraceEvent::now(0, TraceKind::FieldFilled).with_field(None, "Email").with_score(90));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"candidates\":3"));
    assert!(!lines[0].contains("label"), "absent fields are omitted");
    assert!(lines[1].contains("\"label\":\"Email\""));
}

#[test]
fn disabled_trace_logger_writes_nothing() {
    let logger = TraceLogger::disabled();
    assert!(!logger.is_enabled());
    logger.log(&TraceEvent::now(1, TraceKind::FlowFinished));
}
