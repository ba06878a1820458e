use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::detector::DetectorConfig;
use crate::flow::FlowConfig;
use crate::flow::text_generation::{DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL};
use crate::matching::{DEFAULT_THRESHOLD, Matcher, Scorer, ScoringWeights};

pub const DEFAULT_CONFIG_PATH: &str = "job-autofill.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "job-autofill",
    version,
    about = "Semantic form understanding and autofill for job application pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Ollama API endpoint
    #[arg(long, global = true)]
    pub ollama_endpoint: Option<String>,

    /// Ollama model name
    #[arg(long, global = true)]
    pub ollama_model: Option<String>,

    /// Path to config file (default: job-autofill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a page with the job-page detector
    Detect {
        /// Saved HTML document
        #[arg(long)]
        html: String,

        /// URL the document was loaded from
        #[arg(long)]
        url: String,
    },

    /// List discovered fields and the canonical types they match
    Scan {
        #[arg(long)]
        html: String,

        #[arg(long)]
        url: String,

        /// Print the score breakdown of every assignment
        #[arg(long, default_value_t = false)]
        explain: bool,
    },

    /// Run the application flow against a page with a profile
    Fill {
        #[arg(long)]
        html: String,

        #[arg(long)]
        url: String,

        /// Profile YAML/JSON (canonical or stored layout)
        #[arg(long)]
        profile: String,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Override the configured step limit
        #[arg(long)]
        max_steps: Option<usize>,

        /// Free-text answers: none, static or ollama
        #[arg(long, default_value = "none")]
        generator: String,

        /// Answer used by the static generator
        #[arg(long)]
        answer: Option<String>,

        /// Append JSONL trace events to this file
        #[arg(long)]
        trace: Option<String>,

        /// Skip the settle delays between actions
        #[arg(long, default_value_t = false)]
        no_wait: bool,

        /// JSON file keeping application sessions between runs
        #[arg(long)]
        sessions: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `job-autofill.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: i32,

    #[serde(default)]
    pub weights: ScoringWeights,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            weights: ScoringWeights::default(),
        }
    }
}

impl MatchingConfig {
    pub fn matcher(&self) -> Matcher {
        Matcher::new(Scorer::new(self.weights.clone()), self.threshold)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OllamaConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    /// Seconds before a generate call is abandoned
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_threshold() -> i32 { DEFAULT_THRESHOLD }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "Malformed config file, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Ollama endpoint and model: CLI flag, then config file, then defaults.
pub fn resolve_ollama(
    cli_endpoint: Option<&str>,
    cli_model: Option<&str>,
    config: &OllamaConfig,
) -> (String, String) {
    let endpoint = cli_endpoint
        .or(config.endpoint.as_deref())
        .unwrap_or(DEFAULT_OLLAMA_ENDPOINT);
    let model = cli_model
        .or(config.model.as_deref())
        .unwrap_or(DEFAULT_OLLAMA_MODEL);
    (endpoint.to_string(), model.to_string())
}
