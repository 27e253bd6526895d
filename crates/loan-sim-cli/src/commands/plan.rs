use clap::Args;
use serde_json::{json, Value};

use loan_sim_core::batch;

/// Arguments for previewing a batch execution plan
#[derive(Args)]
pub struct PlanArgs {
    /// Number of simulations in the batch
    #[arg(long)]
    pub size: usize,
}

pub fn run_plan(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan = batch::select_plan(args.size)?;
    Ok(json!({
        "result": {
            "batch_size": args.size,
            "strategy": plan.strategy_name(),
            "mode": plan.mode,
            "worker_count": plan.worker_count,
            "chunk_size": plan.chunk_size,
        }
    }))
}
