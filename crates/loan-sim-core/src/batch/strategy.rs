use serde::{Deserialize, Serialize};

use crate::error::LoanSimError;
use crate::LoanSimResult;

/// Smallest batch accepted by [`select_plan`].
pub const MIN_BATCH_SIZE: usize = 1;

/// Largest batch accepted by [`select_plan`].
pub const MAX_BATCH_SIZE: usize = 10_000;

const SEQUENTIAL_MAX: usize = 20;
const PARALLEL_SMALL_MAX: usize = 100;
const PARALLEL_MEDIUM_MAX: usize = 500;

const PARALLEL_SMALL_WORKERS: usize = 4;
const PARALLEL_MEDIUM_WORKERS: usize = 6;
const CHUNKED_WORKERS: usize = 8;

/// How a batch is spread across workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// In-order loop on the calling thread
    Sequential,
    /// One unit of work per request on a fixed pool
    Parallel,
    /// Contiguous chunks, sequential inside a chunk, concurrent across chunks
    Chunked,
}

/// Execution plan chosen for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub mode: BatchMode,
    pub worker_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
}

impl BatchPlan {
    fn sequential() -> Self {
        Self {
            mode: BatchMode::Sequential,
            worker_count: 1,
            chunk_size: None,
        }
    }

    fn parallel(worker_count: usize) -> Self {
        Self {
            mode: BatchMode::Parallel,
            worker_count,
            chunk_size: None,
        }
    }

    fn chunked(batch_size: usize, worker_count: usize) -> Self {
        Self {
            mode: BatchMode::Chunked,
            worker_count,
            chunk_size: Some(batch_size.div_ceil(worker_count)),
        }
    }

    /// Stable label for logs and response metadata.
    pub fn strategy_name(&self) -> &'static str {
        match self.mode {
            BatchMode::Sequential => "sequential",
            BatchMode::Parallel if self.worker_count <= PARALLEL_SMALL_WORKERS => "parallel_small",
            BatchMode::Parallel => "parallel_medium",
            BatchMode::Chunked => "parallel_chunked",
        }
    }
}

/// Check a batch size against [`MIN_BATCH_SIZE`]..=[`MAX_BATCH_SIZE`].
pub fn validate_batch_size(size: usize) -> LoanSimResult<()> {
    if size < MIN_BATCH_SIZE {
        return Err(LoanSimError::EmptyBatch {
            min: MIN_BATCH_SIZE,
        });
    }
    if size > MAX_BATCH_SIZE {
        return Err(LoanSimError::BatchTooLarge {
            size,
            max: MAX_BATCH_SIZE,
        });
    }
    Ok(())
}

/// Choose the execution plan for a batch of `size` requests.
///
/// | size | plan |
/// |---|---|
/// | 1–20 | sequential |
/// | 21–100 | parallel, 4 workers |
/// | 101–500 | parallel, 6 workers |
/// | 501–10000 | chunked, 8 workers, `ceil(size / 8)` per chunk |
pub fn select_plan(size: usize) -> LoanSimResult<BatchPlan> {
    validate_batch_size(size)?;

    let plan = if size <= SEQUENTIAL_MAX {
        BatchPlan::sequential()
    } else if size <= PARALLEL_SMALL_MAX {
        BatchPlan::parallel(PARALLEL_SMALL_WORKERS)
    } else if size <= PARALLEL_MEDIUM_MAX {
        BatchPlan::parallel(PARALLEL_MEDIUM_WORKERS)
    } else {
        BatchPlan::chunked(size, CHUNKED_WORKERS)
    };
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sequential_range() {
        for size in [1, 5, 20] {
            let plan = select_plan(size).unwrap();
            assert_eq!(plan.mode, BatchMode::Sequential);
            assert_eq!(plan.worker_count, 1);
            assert_eq!(plan.chunk_size, None);
        }
    }

    #[test]
    fn test_parallel_thresholds() {
        assert_eq!(select_plan(21).unwrap(), BatchPlan::parallel(4));
        assert_eq!(select_plan(100).unwrap(), BatchPlan::parallel(4));
        assert_eq!(select_plan(101).unwrap(), BatchPlan::parallel(6));
        assert_eq!(select_plan(500).unwrap(), BatchPlan::parallel(6));
    }

    #[test]
    fn test_chunked_range() {
        let plan = select_plan(501).unwrap();
        assert_eq!(plan.mode, BatchMode::Chunked);
        assert_eq!(plan.worker_count, 8);
        assert_eq!(plan.chunk_size, Some(63));

        let plan = select_plan(10_000).unwrap();
        assert_eq!(plan.mode, BatchMode::Chunked);
        assert_eq!(plan.chunk_size, Some(1250));
    }

    #[test]
    fn test_out_of_bounds() {
        assert_eq!(select_plan(0).unwrap_err().code(), "EMPTY_BATCH");
        assert_eq!(select_plan(10_001).unwrap_err().code(), "BATCH_TOO_LARGE");
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(select_plan(10).unwrap().strategy_name(), "sequential");
        assert_eq!(select_plan(50).unwrap().strategy_name(), "parallel_small");
        assert_eq!(select_plan(200).unwrap().strategy_name(), "parallel_medium");
        assert_eq!(select_plan(1000).unwrap().strategy_name(), "parallel_chunked");
    }

    #[test]
    fn test_plan_serializes_without_empty_chunk() {
        let json = serde_json::to_value(select_plan(50).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "mode": "parallel", "worker_count": 4 }));
    }
}
