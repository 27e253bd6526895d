pub mod amortization;
pub mod api;
pub mod error;
pub mod rates;
pub mod simulation;
pub mod types;

#[cfg(feature = "batch")]
pub mod batch;

pub use error::LoanSimError;
pub use types::*;

/// Standard result type for all loan-sim operations
pub type LoanSimResult<T> = Result<T, LoanSimError>;
