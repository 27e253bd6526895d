use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::LoanSimError;
use crate::simulation::{LoanQuote, LoanRequest};
use crate::types::Money;
use crate::LoanSimResult;

/// Aggregate statistics for one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_simulations: usize,
    /// Wall-clock time of the execution phase only.
    pub processing_time_ms: f64,
    /// Exact means; unlike per-loan figures these are not rounded to cents.
    pub average_loan_value: Money,
    pub average_monthly_payment: Money,
}

fn mean(mut values: impl Iterator<Item = Money>, count: usize, context: &str) -> LoanSimResult<Money> {
    if count == 0 {
        return Ok(Decimal::ZERO);
    }
    let total = values
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| LoanSimError::CalculationOverflow {
            context: context.into(),
        })?;
    Ok(total / Decimal::from(count))
}

pub fn summarize(
    requests: &[LoanRequest],
    quotes: &[LoanQuote],
    elapsed: Duration,
) -> LoanSimResult<BatchSummary> {
    let average_loan_value = mean(
        requests.iter().map(LoanRequest::principal),
        requests.len(),
        "average loan value",
    )?;
    let average_monthly_payment = mean(
        quotes.iter().map(|q| q.result.installment),
        quotes.len(),
        "average monthly payment",
    )?;

    Ok(BatchSummary {
        total_simulations: requests.len(),
        processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        average_loan_value,
        average_monthly_payment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateTable;
    use crate::simulation::simulate_loan;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_averages() {
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let requests = vec![
            LoanRequest::new(dec!(10000), NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(), 12).unwrap(),
            LoanRequest::new(dec!(20000), NaiveDate::from_ymd_opt(1985, 3, 20).unwrap(), 24).unwrap(),
        ];
        let quotes: Vec<_> = requests
            .iter()
            .map(|r| simulate_loan(r, as_of, &RateTable::STANDARD).unwrap())
            .collect();

        let summary = summarize(&requests, &quotes, Duration::from_micros(1500)).unwrap();
        assert_eq!(summary.total_simulations, 2);
        assert_eq!(summary.average_loan_value, dec!(15000));
        // (846.94 + 859.62) / 2
        assert_eq!(summary.average_monthly_payment, dec!(853.28));
        assert!((summary.processing_time_ms - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_averages_are_not_rounded() {
        let dob = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let requests: Vec<_> = [dec!(1), dec!(2), dec!(2)]
            .into_iter()
            .map(|p| LoanRequest::new(p, dob, 12).unwrap())
            .collect();

        let summary = summarize(&requests, &[], Duration::ZERO).unwrap();
        let exact = dec!(5) / dec!(3);
        assert!((summary.average_loan_value - exact).abs() < dec!(0.000001));
        assert_ne!(summary.average_loan_value, dec!(1.67));
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let summary = summarize(&[], &[], Duration::ZERO).unwrap();
        assert_eq!(summary.total_simulations, 0);
        assert_eq!(summary.average_loan_value, Decimal::ZERO);
        assert_eq!(summary.processing_time_ms, 0.0);
    }
}
