//! Batch simulation: plan selection, parallel execution and aggregation.

pub mod executor;
pub mod strategy;
pub mod summary;

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Instant;

use crate::rates::RateTable;
use crate::simulation::{LoanQuote, LoanRequest};
use crate::LoanSimResult;

pub use strategy::{select_plan, validate_batch_size, BatchMode, BatchPlan, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
pub use summary::BatchSummary;

/// Everything produced by one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub plan: BatchPlan,
    pub quotes: Vec<LoanQuote>,
    pub summary: BatchSummary,
}

/// Select a plan for `requests`, execute it and summarise the results.
///
/// Size errors are returned before any work starts; a failing request fails
/// the whole batch.
pub fn run_batch(
    requests: &[LoanRequest],
    as_of: NaiveDate,
    table: &RateTable,
) -> LoanSimResult<BatchOutcome> {
    let plan = select_plan(requests.len()).inspect_err(|e| {
        warn!("Rejected batch of {} simulations: {e}", requests.len());
    })?;
    debug!(
        "Batch of {} simulations using {} plan ({:?})",
        requests.len(),
        plan.strategy_name(),
        plan
    );

    let start = Instant::now();
    let quotes = executor::execute(&plan, requests, as_of, table).inspect_err(|e| {
        warn!("Batch of {} simulations failed: {e}", requests.len());
    })?;
    let elapsed = start.elapsed();

    let summary = summary::summarize(requests, &quotes, elapsed)?;
    info!(
        "Completed {} simulations with {} plan in {:.3} ms",
        summary.total_simulations,
        plan.strategy_name(),
        summary.processing_time_ms
    );

    Ok(BatchOutcome {
        plan,
        quotes,
        summary,
    })
}
