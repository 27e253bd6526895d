use chrono::NaiveDate;
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::strategy::{BatchMode, BatchPlan};
use crate::error::LoanSimError;
use crate::rates::RateTable;
use crate::simulation::{simulate_loan, LoanQuote, LoanRequest};
use crate::LoanSimResult;

fn worker_pool(worker_count: usize) -> LoanSimResult<ThreadPool> {
    debug!("Building worker pool with {worker_count} threads");
    ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .thread_name(|i| format!("loan-sim-worker-{i}"))
        .build()
        .map_err(|e| LoanSimError::WorkerPool(e.to_string()))
}

/// Run every request through [`simulate_loan`] according to `plan`.
///
/// Output position `i` always holds the quote for `requests[i]`. If any
/// request fails the whole batch fails with the lowest failing index.
pub fn execute(
    plan: &BatchPlan,
    requests: &[LoanRequest],
    as_of: NaiveDate,
    table: &RateTable,
) -> LoanSimResult<Vec<LoanQuote>> {
    let unit = |request: &LoanRequest| simulate_loan(request, as_of, table);

    let outcomes: Vec<LoanSimResult<LoanQuote>> = match plan.mode {
        BatchMode::Sequential => requests.iter().map(&unit).collect(),
        BatchMode::Parallel => {
            // indexed collect writes each outcome into its input slot
            worker_pool(plan.worker_count)?.install(|| requests.par_iter().map(&unit).collect())
        }
        BatchMode::Chunked => {
            let chunk_size = plan.chunk_size.unwrap_or(requests.len()).max(1);
            let chunks: Vec<Vec<LoanSimResult<LoanQuote>>> = worker_pool(plan.worker_count)?
                .install(|| {
                    requests
                        .par_chunks(chunk_size)
                        .map(|chunk| chunk.iter().map(&unit).collect::<Vec<_>>())
                        .collect()
                });
            chunks.into_iter().flatten().collect()
        }
    };

    outcomes
        .into_iter()
        .enumerate()
        .map(|(index, outcome)| outcome.map_err(|e| e.at_index(index)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::strategy::select_plan;
    use rust_decimal::Decimal;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn requests(n: usize) -> Vec<LoanRequest> {
        let dob = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        (0..n)
            .map(|i| LoanRequest::new(Decimal::from(1000 + i as i64 * 10), dob, 24).unwrap())
            .collect()
    }

    fn forced(mode: BatchMode, worker_count: usize, chunk_size: Option<usize>) -> BatchPlan {
        BatchPlan {
            mode,
            worker_count,
            chunk_size,
        }
    }

    #[test]
    fn test_modes_agree() {
        let reqs = requests(37);
        let table = RateTable::STANDARD;
        let seq = execute(&forced(BatchMode::Sequential, 1, None), &reqs, as_of(), &table).unwrap();
        let par = execute(&forced(BatchMode::Parallel, 4, None), &reqs, as_of(), &table).unwrap();
        let chk = execute(&forced(BatchMode::Chunked, 3, Some(5)), &reqs, as_of(), &table).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq, chk);
    }

    #[test]
    fn test_order_preserved_in_chunked_plan() {
        let reqs = requests(750);
        let plan = select_plan(reqs.len()).unwrap();
        let quotes = execute(&plan, &reqs, as_of(), &RateTable::STANDARD).unwrap();
        assert_eq!(quotes.len(), reqs.len());
        for pair in quotes.windows(2) {
            // principals increase with index, so installments must too
            assert!(pair[0].result.installment < pair[1].result.installment);
        }
    }

    #[test]
    fn test_lowest_failing_index_reported() {
        let mut reqs = requests(40);
        let future = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        reqs[31] = LoanRequest::new(Decimal::from(500), future, 12).unwrap();
        reqs[12] = LoanRequest::new(Decimal::from(500), future, 12).unwrap();

        let err = execute(&forced(BatchMode::Parallel, 4, None), &reqs, as_of(), &RateTable::STANDARD)
            .unwrap_err();
        match err {
            LoanSimError::BatchItem { index, ref source } => {
                assert_eq!(index, 12);
                assert_eq!(source.code(), "INVALID_DATE");
            }
            other => panic!("expected BatchItem, got {other:?}"),
        }
    }

    #[test]
    fn test_lowest_failing_index_reported_across_chunks() {
        let mut reqs = requests(40);
        let future = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        reqs[35] = LoanRequest::new(Decimal::from(500), future, 12).unwrap();
        reqs[6] = LoanRequest::new(Decimal::from(500), future, 12).unwrap();

        let err = execute(&forced(BatchMode::Chunked, 4, Some(5)), &reqs, as_of(), &RateTable::STANDARD)
            .unwrap_err();
        match err {
            LoanSimError::BatchItem { index, .. } => assert_eq!(index, 6),
            other => panic!("expected BatchItem, got {other:?}"),
        }
    }

    #[test]
    fn test_chunk_size_larger_than_batch() {
        let reqs = requests(3);
        let quotes = execute(
            &forced(BatchMode::Chunked, 2, Some(100)),
            &reqs,
            as_of(),
            &RateTable::STANDARD,
        )
        .unwrap();
        assert_eq!(quotes.len(), 3);
    }
}
