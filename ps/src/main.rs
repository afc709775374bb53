use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use planstore::PlanStore;
use planstore::cli::{Cli, Command};
use planstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("planstore starting");

    let store = PlanStore::open(&config.history_path)?;

    match cli.command {
        Command::List => {
            let records = store.load()?;
            if records.is_empty() {
                println!("No study plan history found");
            } else {
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
                }
            }
        }
        Command::Show { number } => {
            let records = store.load()?;
            if number == 0 || number > records.len() {
                return Err(eyre::eyre!("Plan {} not found", number));
            }
            let record = &records[records.len() - number];
            println!(
                "{} {} {}",
                format!("Plan {}", number).cyan(),
                "|".dimmed(),
                record.timestamp
            );
            println!("Subjects: {}", record.subjects);
            println!("Days left: {}", record.days_left);
            println!("Weak topics: {}", record.weak_topics);
            println!();
            println!("{}", record.plan);
        }
        Command::Clear => {
            if store.clear()? {
                println!("{} History deleted successfully", "✓".green());
            } else {
                println!("No study plan history found");
            }
        }
    }

    Ok(())
}
