use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use loan_sim_core::api::{self, BatchInput};

use crate::input;

/// Arguments for a batch of simulations
#[derive(Args)]
pub struct BatchArgs {
    /// Path to JSON input file with a `simulations` array
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_batch(args: BatchArgs, as_of: NaiveDate) -> Result<Value, Box<dyn std::error::Error>> {
    let batch_input: BatchInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input file or piped JSON is required for batch simulation".into());
    };

    let result = api::simulate_batch(&batch_input, as_of)?;
    Ok(serde_json::to_value(result)?)
}
