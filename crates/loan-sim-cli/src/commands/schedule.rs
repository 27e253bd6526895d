use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_sim_core::amortization;
use loan_sim_core::rates::{self, RateTable};

/// Arguments for a month-by-month repayment schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Loan amount
    #[arg(long)]
    pub value: Decimal,

    /// Term in months
    #[arg(long, alias = "months")]
    pub payment_deadline: u32,

    /// Annual interest rate as a decimal (e.g. 0.03)
    #[arg(long, conflicts_with = "date_of_birth")]
    pub rate: Option<Decimal>,

    /// Borrower birth date, DD-MM-YYYY; picks the rate from the age table
    #[arg(long, alias = "dob")]
    pub date_of_birth: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs, as_of: NaiveDate) -> Result<Value, Box<dyn std::error::Error>> {
    let annual_rate = match (args.rate, args.date_of_birth) {
        (Some(rate), _) => rate,
        (None, Some(dob)) => {
            let age = rates::age_on(rates::parse_birth_date(&dob)?, as_of)?;
            RateTable::STANDARD.rate_for_age(age)
        }
        (None, None) => return Err("--rate or --date-of-birth is required".into()),
    };

    let result = amortization::build_schedule(args.value, annual_rate, args.payment_deadline)?;
    Ok(serde_json::to_value(result)?)
}
