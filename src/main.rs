use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use studybuddy::config::Config;
use studybuddy::logging::init_tracing;
use studybuddy::prompt::{Difficulty, Mode, StudyRequest};
use studybuddy::remote::GeminiClient;
use studybuddy::server::StudyServer;
use studybuddy::service::{Outcome, StudyService};

#[derive(Debug, Parser)]
#[command(
    name = "studybuddy",
    version,
    about = "Explain topics, summarize notes, and generate quizzes + flashcards."
)]
struct Cli {
    /// Config file (default: ~/.config/studybuddy/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one submission and print the result
    Ask {
        #[arg(long, value_enum)]
        mode: Mode,

        /// Topic (optional if you pass notes)
        #[arg(long)]
        topic: Option<String>,

        /// Notes text
        #[arg(long, conflicts_with = "notes_file")]
        notes: Option<String>,

        /// Read notes from a file
        #[arg(long, value_name = "FILE")]
        notes_file: Option<PathBuf>,

        /// Quiz difficulty
        #[arg(long, value_enum, default_value = "medium")]
        difficulty: Difficulty,
    },

    /// Serve the JSON API
    Serve {
        /// Bind address, overrides [server].bind_addr
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    // Missing credentials are fatal before anything else happens.
    let (api_key, source) = config.model.resolve_api_key()?;
    tracing::debug!(source = source.description(), "API key resolved");

    let remote = GeminiClient::new(&config.model, api_key).context("Failed to build HTTP client")?;
    let service = Arc::new(StudyService::from_config(&config, Arc::new(remote)));

    match cli.command {
        Command::Ask {
            mode,
            topic,
            notes,
            notes_file,
            difficulty,
        } => {
            let notes = match notes_file {
                Some(path) => Some(
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read notes file '{}'", path.display()))?,
                ),
                None => notes,
            };
            let request = StudyRequest {
                mode,
                topic,
                notes,
                difficulty,
            };
            Ok(ask(&service, &request).await)
        }
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind_addr.clone());
            let addr: SocketAddr = bind
                .parse()
                .with_context(|| format!("Invalid bind address '{}'", bind))?;

            let mut server = StudyServer::new(service, addr);
            let bound = server.try_bind().await?;
            eprintln!("studybuddy listening on http://{}", bound);
            server.run().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn ask(service: &StudyService, request: &StudyRequest) -> ExitCode {
    let outcome = service.submit(request, Instant::now()).await;

    match &outcome {
        Outcome::Generated(text) => println!("{}", text),
        Outcome::EmptyResponse
        | Outcome::ValidationWarning(_)
        | Outcome::CooldownWarning(_) => eprintln!("Warning: {}", outcome.message()),
        Outcome::Error(_) => eprintln!("Error: {}", outcome.message()),
    }

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
