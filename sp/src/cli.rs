//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// StudyPlanner - AI study plan generator
#[derive(Parser)]
#[command(
    name = "sp",
    about = "Generate day-wise study plans with a local Ollama model",
    version,
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (none launches the TUI)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a study plan without entering the TUI
    Generate {
        /// Subjects to study (comma separated)
        #[arg(short, long)]
        subjects: String,

        /// Days left until the exam
        #[arg(short, long)]
        days_left: u32,

        /// Topics that need extra attention
        #[arg(short, long)]
        weak_topics: String,
    },

    /// List stored study plans, most recent first
    History {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Show the full plan text for each entry
        #[arg(long)]
        full: bool,
    },

    /// Export the most recent study plan
    Export {
        /// Export format (txt, pdf)
        #[arg(value_name = "FORMAT")]
        format: ExportFormat,

        /// Output path (defaults to the configured export path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete all stored study plans
    Clear,
}

/// Output format for the history command
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => {
                debug!("OutputFormat::from_str: matched Text");
                Ok(Self::Text)
            }
            "json" => {
                debug!("OutputFormat::from_str: matched Json");
                Ok(Self::Json)
            }
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Export format for the export command
#[derive(Clone, Debug)]
pub enum ExportFormat {
    Txt,
    Pdf,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "ExportFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "txt" | "text" => {
                debug!("ExportFormat::from_str: matched Txt");
                Ok(Self::Txt)
            }
            "pdf" => {
                debug!("ExportFormat::from_str: matched Pdf");
                Ok(Self::Pdf)
            }
            _ => {
                debug!(%s, "ExportFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: txt or pdf", s))
            }
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Txt => write!(f, "txt"),
            Self::Pdf => write!(f, "pdf"),
        }
    }
}
