use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Text};
use trip_core::{Config, LookupKind, Orchestrator, QueryError};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "trip", version, about = "Weather and sights for the place you mention")]
pub struct Cli {
    /// Log lookup details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a single free-text query.
    Ask {
        /// e.g. "What's the temperature in Paris?"
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Ask queries interactively until `exit`.
    Shell,

    /// Set the base URL of a lookup endpoint.
    Configure {
        /// Lookup name: "geocoding", "weather" or "places".
        lookup: String,

        /// Go back to the public provider.
        #[arg(long)]
        reset: bool,
    },

    /// Print where the config file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Ask { query, json } => {
                let orchestrator = orchestrator_from_disk()?;
                ask(&orchestrator, &query.join(" "), json).await
            }
            Command::Shell => {
                let orchestrator = orchestrator_from_disk()?;
                shell(&orchestrator).await
            }
            Command::Configure { lookup, reset } => {
                configure(LookupKind::try_from(lookup.as_str())?, reset)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn orchestrator_from_disk() -> anyhow::Result<Orchestrator> {
    let config = Config::load()?;
    Orchestrator::from_config(&config).context("Failed to set up lookups")
}

async fn ask(orchestrator: &Orchestrator, query: &str, json: bool) -> anyhow::Result<ExitCode> {
    match orchestrator.handle(query).await {
        Ok(result) if json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(result) => {
            print!("{}", render::render_result(&result));
            Ok(ExitCode::SUCCESS)
        }
        Err(QueryError::EmptyQuery) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{}", err.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// One request at a time: the prompt only comes back once the previous
/// query has finished.
async fn shell(orchestrator: &Orchestrator) -> anyhow::Result<ExitCode> {
    loop {
        let line = match Text::new("Where to?")
            .with_help_message("e.g. \"Is it cold in Oslo?\" (type exit to leave)")
            .prompt()
        {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }

        match orchestrator.handle(line).await {
            Ok(result) => println!("{}", render::render_result(&result)),
            Err(err) if err.is_empty_query() => {}
            Err(err) => println!("{}\n", err.user_message()),
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn configure(kind: LookupKind, reset: bool) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if reset {
        config.reset_endpoint(kind);
    } else {
        let url = Text::new(&format!("Base URL for {kind} lookups:"))
            .with_default(config.endpoint_url(kind))
            .prompt()?;
        config.upsert_endpoint(kind, url)?;
    }

    config.save()?;

    let origin = if config.is_endpoint_overridden(kind) { "override" } else { "default" };
    println!("{kind} lookups now use {} ({origin})", config.endpoint_url(kind));

    Ok(())
}
