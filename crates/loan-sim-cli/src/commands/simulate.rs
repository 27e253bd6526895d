use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_sim_core::api::{self, SimulationInput};

use crate::input;

/// Arguments for a single loan simulation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SimulateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub value: Option<Decimal>,

    /// Borrower birth date, DD-MM-YYYY
    #[arg(long, alias = "dob")]
    pub date_of_birth: Option<String>,

    /// Term in months
    #[arg(long, alias = "months")]
    pub payment_deadline: Option<u32>,
}

pub fn run_simulate(args: SimulateArgs, as_of: NaiveDate) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input: SimulationInput = match (args.input, args.value) {
        (Some(path), _) => input::file::read_json(&path)?,
        (None, Some(value)) => SimulationInput {
            value,
            date_of_birth: args
                .date_of_birth
                .ok_or("--date-of-birth is required (or provide --input)")?,
            payment_deadline: args
                .payment_deadline
                .ok_or("--payment-deadline is required (or provide --input)")?,
        },
        (None, None) => {
            let data = input::stdin::read_stdin()?
                .ok_or("--value is required (or provide --input or piped JSON)")?;
            serde_json::from_value(data)?
        }
    };

    let result = api::simulate(&sim_input, as_of)?;
    Ok(serde_json::to_value(result)?)
}
