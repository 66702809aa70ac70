use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linkbio_ask::ai::build_completion_service;
use linkbio_ask::genui::{extract_suggested_questions, parse_ai_response};
use linkbio_ask::models::{Config, UserContext};
use linkbio_ask::search::{SearchOrchestrator, SearchService, SearchState};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "linkbio-ask")]
#[command(about = "Ask questions about a link-in-bio profile")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask the configured AI provider a question about a profile.
    ///
    /// Without a question, prints the suggested starter questions.
    Ask {
        /// Profile export (`{"profile": {...}, "links": [...]}`).
        #[arg(long, value_name = "FILE")]
        profile: PathBuf,
        query: Option<String>,
    },
    /// Parse a completion offline and print the generated content.
    Parse {
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,
        /// Completion text to parse; reads stdin when omitted.
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn load_profile(path: &Path) -> Result<UserContext> {
    UserContext::load(path).with_context(|| format!("Failed to load profile {}", path.display()))
}

async fn run_ask(profile: &Path, query: Option<String>) -> Result<bool> {
    let config = Config::from_env()?;
    let user_context = load_profile(profile)?;
    info!(
        "Loaded profile for {} ({} links, {} social)",
        user_context.profile.display_name,
        user_context.links.len(),
        user_context.social_links.len()
    );

    let provider = build_completion_service(&config);
    let orchestrator =
        SearchOrchestrator::new(SearchService::from_config(provider, user_context, &config));

    let state = answer(&orchestrator, query.as_deref()).await;
    if query.is_none() {
        for question in &state.suggested_questions {
            println!("{}", question);
        }
        return Ok(true);
    }

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(state.error().is_none())
}

/// Starter questions are only loaded when there is nothing to search for.
async fn answer(orchestrator: &SearchOrchestrator, query: Option<&str>) -> SearchState {
    match query {
        Some(query) => orchestrator.search(query).await,
        None => orchestrator.mount().await,
    }
    orchestrator.state()
}

fn run_parse(profile: Option<&Path>, input: Option<&Path>) -> Result<()> {
    let user_context = profile.map(load_profile).transpose()?;
    let text = read_input(input)?;

    let content = parse_ai_response(&text, user_context.as_ref());
    let output = serde_json::json!({
        "content": content,
        "suggestedQuestions": extract_suggested_questions(&text),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkbio_ask=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let outcome = match args.command {
        Command::Ask { profile, query } => run_ask(&profile, query).await,
        Command::Parse { profile, input } => {
            run_parse(profile.as_deref(), input.as_deref()).map(|_| true)
        }
    };

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
