use clap::Parser;
use job_autofill::cli::commands::{FillOptions, cmd_detect, cmd_fill, cmd_scan};
use job_autofill::cli::config::{Cli, Commands, load_config};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    // RUST_LOG wins over -v
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("job_autofill={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Detect { html, url } => {
            let result = cmd_detect(&html, &url, &config)?;
            if !result.is_job_page() {
                std::process::exit(2);
            }
        }
        Commands::Scan { html, url, explain } => {
            cmd_scan(&html, &url, explain, &config)?;
        }
        Commands::Fill {
            html,
            url,
            profile,
            output,
            max_steps,
            generator,
            answer,
            trace,
            no_wait,
            sessions,
        } => {
            let options = FillOptions {
                html_path: &html,
                url: &url,
                profile_path: &profile,
                output: output.as_deref(),
                max_steps,
                generator: &generator,
                answer: answer.as_deref(),
                trace: trace.as_deref(),
                no_wait,
                sessions: sessions.as_deref(),
                ollama_endpoint: cli.ollama_endpoint.as_deref(),
                ollama_model: cli.ollama_model.as_deref(),
            };
            cmd_fill(&options, &config)?;
        }
    }

    Ok(())
}
