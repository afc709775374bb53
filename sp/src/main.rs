//! StudyPlanner - AI study plan generator
//!
//! CLI entry point for one-shot plan generation, history inspection,
//! export, and the interactive TUI.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use planstore::PlanStore;
use studyplanner::cli::{Cli, Command, ExportFormat, OutputFormat};
use studyplanner::config::Config;
use studyplanner::export;
use studyplanner::llm::create_client;
use studyplanner::planner::{MISSING_INPUT_MESSAGE, PlanOutcome, PlanRequest, Planner};
use studyplanner::prompts::PromptLoader;
use studyplanner::tui;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studyplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let level = if let Some(s) = level_str {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        }
    } else {
        tracing::Level::INFO
    };

    let log_file = fs::File::create(log_dir.join("studyplanner.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("StudyPlanner loaded config: model={}", config.llm.model);

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Generate {
            subjects,
            days_left,
            weak_topics,
        }) => {
            debug!(%subjects, days_left, %weak_topics, "main: matched Generate command");
            cmd_generate(&config, subjects, days_left, weak_topics).await
        }
        Some(Command::History { format, full }) => {
            debug!(?format, full, "main: matched History command");
            cmd_history(&config, format, full)
        }
        Some(Command::Export { format, output }) => {
            debug!(?format, ?output, "main: matched Export command");
            cmd_export(&config, format, output)
        }
        Some(Command::Clear) => {
            debug!("main: matched Clear command");
            cmd_clear(&config)
        }
        None => {
            debug!("main: no command specified, launching TUI");
            cmd_tui(&config).await
        }
    }
}

/// Build the planner from config (LLM client, prompt loader, history store)
fn build_planner(config: &Config) -> Result<Planner> {
    debug!("build_planner: called");
    let client = create_client(&config.llm).context("Failed to create LLM client")?;
    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let prompts = PromptLoader::new(root);
    let store = PlanStore::open(&config.storage.history_path).context("Failed to open plan history")?;
    Ok(Planner::new(client, prompts, store))
}

/// Generate a study plan without entering the TUI
async fn cmd_generate(config: &Config, subjects: String, days_left: u32, weak_topics: String) -> Result<()> {
    debug!(%subjects, days_left, %weak_topics, "cmd_generate: called");
    let planner = build_planner(config)?;
    let request = PlanRequest {
        subjects,
        days_left,
        weak_topics,
    };

    println!("Generating study plan with {}...", config.llm.model.cyan());

    let outcome = planner.generate(&request).await?;
    debug!(?outcome, "cmd_generate: planner finished");
    match outcome {
        PlanOutcome::Saved {
            record,
            prompt_tokens,
            completion_tokens,
        } => {
            println!();
            println!("📅 AI Generated Study Plan");
            println!();
            println!("{}", record.plan);
            println!();
            if prompt_tokens + completion_tokens > 0 {
                println!(
                    "{}",
                    format!("{} prompt + {} completion tokens", prompt_tokens, completion_tokens).dimmed()
                );
            }
            println!("{} Plan saved to history ({})", "✓".green(), record.timestamp);
            Ok(())
        }
        PlanOutcome::MissingInput => {
            println!("{} {}", "✗".red(), MISSING_INPUT_MESSAGE);
            std::process::exit(1);
        }
        PlanOutcome::Failed { message } => {
            println!("{} {}", "✗".red(), message);
            std::process::exit(1);
        }
    }
}

/// List stored study plans, most recent first
fn cmd_history(config: &Config, format: OutputFormat, full: bool) -> Result<()> {
    debug!(?format, full, "cmd_history: called");
    let store = PlanStore::open(&config.storage.history_path)?;
    let records = store.load()?;

    if records.is_empty() {
        debug!("cmd_history: store is empty");
        println!("No study plan history found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            debug!("cmd_history: format is Json");
            let newest_first: Vec<_> = records.iter().rev().collect();
            println!("{}", serde_json::to_string_pretty(&newest_first)?);
        }
        OutputFormat::Text => {
            debug!(count = records.len(), "cmd_history: format is Text");
            // Plan 1 is always the most recent entry
            for (n, record) in records.iter().rev().enumerate() {
                println!(
                    "{} {} {}",
                    format!("Plan {}", n + 1).cyan(),
                    "|".dimmed(),
                    record.timestamp
                );
                println!("  Subjects: {}", record.subjects);
                println!("  Days left: {}", record.days_left);
                println!("  Weak topics: {}", record.weak_topics);
                if full {
                    println!();
                    for line in record.plan.lines() {
                        println!("  {}", line);
                    }
                    println!();
                }
            }
        }
    }

    Ok(())
}

/// Export the most recent study plan to TXT or PDF
fn cmd_export(config: &Config, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    debug!(?format, ?output, "cmd_export: called");
    let store = PlanStore::open(&config.storage.history_path)?;
    let records = store.load()?;

    let Some(record) = records.last() else {
        debug!("cmd_export: store is empty");
        return Err(eyre::eyre!("No study plan history found"));
    };

    let path = match format {
        ExportFormat::Txt => {
            let path = output.unwrap_or_else(|| config.export.text_path.clone());
            export::write_text(&record.plan, &path)?;
            path
        }
        ExportFormat::Pdf => {
            let path = output.unwrap_or_else(|| config.export.pdf_path.clone());
            export::write_pdf(&record.plan, &path)?;
            path
        }
    };

    println!("{} Exported plan from {} to {}", "✓".green(), record.timestamp, path.display());
    Ok(())
}

/// Delete all stored study plans
fn cmd_clear(config: &Config) -> Result<()> {
    debug!("cmd_clear: called");
    let store = PlanStore::open(&config.storage.history_path)?;

    if store.clear()? {
        debug!("cmd_clear: history file removed");
        println!("{} History deleted successfully", "✓".green());
    } else {
        debug!("cmd_clear: nothing to remove");
        println!("No study plan history found");
    }

    Ok(())
}

/// Launch the interactive TUI
async fn cmd_tui(config: &Config) -> Result<()> {
    debug!("cmd_tui: called");
    let planner = build_planner(config)?;

    debug!("cmd_tui: launching TUI");
    tui::run(planner, config.clone()).await
}
