mod commands;
mod input;
mod output;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::batch::BatchArgs;
use commands::plan::PlanArgs;
use commands::schedule::ScheduleArgs;
use commands::simulate::SimulateArgs;
use loan_sim_core::LoanSimError;

/// Age-banded loan repayment simulations
#[derive(Parser)]
#[command(
    name = "loansim",
    version,
    about = "Age-banded loan repayment simulations",
    long_about = "A CLI for simulating fixed-rate loans with decimal precision. The annual \
                  rate is picked from the borrower's age bracket and repaid in level \
                  monthly installments. Supports single quotes, batches of up to 10,000 \
                  simulations and full repayment schedules."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Date ages are measured on, YYYY-MM-DD (defaults to today)
    #[arg(long, env = "LOANSIM_AS_OF", global = true)]
    as_of: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a single loan
    Simulate(SimulateArgs),
    /// Simulate a batch of loans from JSON input
    Batch(BatchArgs),
    /// Print the month-by-month repayment schedule of a loan
    Schedule(ScheduleArgs),
    /// Show the execution plan chosen for a batch size
    Plan(PlanArgs),
    /// Print the age-bracket rate table
    Rates,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulate::run_simulate(args, as_of),
        Commands::Batch(args) => commands::batch::run_batch(args, as_of),
        Commands::Schedule(args) => commands::schedule::run_schedule(args, as_of),
        Commands::Plan(args) => commands::plan::run_plan(args),
        Commands::Rates => commands::rates::run_rates(),
        Commands::Version => {
            println!("loansim {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            match e.downcast_ref::<LoanSimError>() {
                Some(sim_err) => eprintln!("{}: [{}] {}", "error".red().bold(), sim_err.code(), sim_err),
                None => eprintln!("{}: {}", "error".red().bold(), e),
            }
            process::exit(1);
        }
    }
}
