//! Wire-level request and response types, plus the two public entry points
//! used by transport layers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::LoanResult;
use crate::rates::{self, RateTable};
use crate::simulation::{self, LoanRequest};
use crate::types::*;
use crate::LoanSimResult;

/// Single simulation request as received on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Loan amount
    pub value: Money,
    /// Borrower birth date, `DD-MM-YYYY`
    pub date_of_birth: String,
    /// Term in months
    pub payment_deadline: u32,
}

impl SimulationInput {
    /// Parse the birth date and validate the amounts.
    pub fn to_request(&self) -> LoanSimResult<LoanRequest> {
        let birth_date = rates::parse_birth_date(&self.date_of_birth)?;
        LoanRequest::new(self.value, birth_date, self.payment_deadline)
    }
}

/// Single simulation response; figures are JSON numbers rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value_to_pay: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_payment_amount: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_interest: Money,
}

impl From<&LoanResult> for SimulationOutput {
    fn from(result: &LoanResult) -> Self {
        Self {
            total_value_to_pay: result.total_payable,
            monthly_payment_amount: result.installment,
            total_interest: result.total_interest,
        }
    }
}

/// Run one simulation against the standard rate table.
pub fn simulate(
    input: &SimulationInput,
    as_of: NaiveDate,
) -> LoanSimResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();

    let request = input.to_request()?;
    let quote = simulation::simulate_loan(&request, as_of, &RateTable::STANDARD)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Age-banded level-payment amortization",
        &serde_json::json!({
            "as_of": as_of,
            "customer_age": quote.age,
            "age_bracket": quote.bracket.label(),
            "annual_interest_rate": quote.annual_rate.to_string(),
            "payment_deadline_months": request.term_months(),
        }),
        Vec::new(),
        elapsed,
        SimulationOutput::from(&quote.result),
    ))
}

#[cfg(feature = "batch")]
pub use self::batch_api::*;

#[cfg(feature = "batch")]
mod batch_api {
    use super::*;
    use crate::batch::{self, BatchSummary};

    /// Batch simulation request
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BatchInput {
        pub simulations: Vec<SimulationInput>,
    }

    /// Batch summary as sent on the wire
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct SummaryOutput {
        pub total_simulations: usize,
        pub processing_time_ms: f64,
        #[serde(with = "rust_decimal::serde::float")]
        pub average_loan_value: Money,
        #[serde(with = "rust_decimal::serde::float")]
        pub average_monthly_payment: Money,
    }

    impl From<&BatchSummary> for SummaryOutput {
        fn from(summary: &BatchSummary) -> Self {
            Self {
                total_simulations: summary.total_simulations,
                processing_time_ms: summary.processing_time_ms,
                average_loan_value: summary.average_loan_value,
                average_monthly_payment: summary.average_monthly_payment,
            }
        }
    }

    /// Batch simulation response; `results[i]` answers `simulations[i]`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BatchOutput {
        pub results: Vec<SimulationOutput>,
        pub summary: SummaryOutput,
    }

    /// Run a batch of simulations against the standard rate table.
    ///
    /// The batch size is checked before any input is parsed; a malformed
    /// simulation fails the whole batch and is reported by index.
    pub fn simulate_batch(
        input: &BatchInput,
        as_of: NaiveDate,
    ) -> LoanSimResult<ComputationOutput<BatchOutput>> {
        let start = Instant::now();

        batch::validate_batch_size(input.simulations.len())?;
        let requests = input
            .simulations
            .iter()
            .enumerate()
            .map(|(index, sim)| sim.to_request().map_err(|e| e.at_index(index)))
            .collect::<LoanSimResult<Vec<_>>>()?;

        let outcome = batch::run_batch(&requests, as_of, &RateTable::STANDARD)?;

        let output = BatchOutput {
            results: outcome
                .quotes
                .iter()
                .map(|q| SimulationOutput::from(&q.result))
                .collect(),
            summary: SummaryOutput::from(&outcome.summary),
        };

        let elapsed = start.elapsed().as_micros() as u64;
        Ok(with_metadata(
            "Age-banded level-payment amortization (batch)",
            &serde_json::json!({
                "as_of": as_of,
                "strategy": outcome.plan.strategy_name(),
                "plan": outcome.plan,
                "rate_table": RateTable::STANDARD,
            }),
            Vec::new(),
            elapsed,
            output,
        ))
    }
}
