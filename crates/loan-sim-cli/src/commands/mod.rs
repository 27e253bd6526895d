pub mod batch;
pub mod plan;
pub mod rates;
pub mod schedule;
pub mod simulate;
