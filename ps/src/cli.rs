//! CLI argument parsing for planstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ps")]
#[command(author, version, about = "Inspect the study plan history store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored plans, most recent first
    List,

    /// Display one stored plan in full
    Show {
        /// Plan number as printed by `list` (1 = most recent)
        #[arg(required = true)]
        number: usize,
    },

    /// Delete the entire history
    Clear,
}
