use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanSimError {
    #[error("Invalid principal: {0} — loan value must be positive")]
    InvalidPrincipal(String),

    #[error("Invalid term: {months} months — {reason}")]
    InvalidTerm { months: u32, reason: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid rate: {0} — annual rate must not be negative")]
    InvalidRate(String),

    #[error("Empty batch: at least {min} simulation is required")]
    EmptyBatch { min: usize },

    #[error("Batch too large: {size} simulations exceeds the maximum of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Calculation overflow in {context}")]
    CalculationOverflow { context: String },

    #[error("Simulation {index}: {source}")]
    BatchItem {
        index: usize,
        #[source]
        source: Box<LoanSimError>,
    },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl LoanSimError {
    /// Stable identifier for the error kind. Batch item failures report the
    /// code of the underlying error.
    pub fn code(&self) -> &'static str {
        match self {
            LoanSimError::InvalidPrincipal(_) => "INVALID_PRINCIPAL",
            LoanSimError::InvalidTerm { .. } => "INVALID_TERM",
            LoanSimError::InvalidDate(_) => "INVALID_DATE",
            LoanSimError::InvalidRate(_) => "INVALID_RATE",
            LoanSimError::EmptyBatch { .. } => "EMPTY_BATCH",
            LoanSimError::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            LoanSimError::CalculationOverflow { .. } => "CALCULATION_OVERFLOW",
            LoanSimError::BatchItem { source, .. } => source.code(),
            LoanSimError::WorkerPool(_) => "WORKER_POOL",
        }
    }

    pub(crate) fn at_index(self, index: usize) -> Self {
        LoanSimError::BatchItem {
            index,
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_item_reports_inner_code() {
        let err = LoanSimError::InvalidDate("31-02-1990".into()).at_index(7);
        assert_eq!(err.code(), "INVALID_DATE");
        assert!(err.to_string().starts_with("Simulation 7:"));
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            LoanSimError::InvalidPrincipal("0".into()),
            LoanSimError::InvalidTerm {
                months: 0,
                reason: "x".into(),
            },
            LoanSimError::InvalidDate("x".into()),
            LoanSimError::EmptyBatch { min: 1 },
            LoanSimError::BatchTooLarge { size: 10_001, max: 10_000 },
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
