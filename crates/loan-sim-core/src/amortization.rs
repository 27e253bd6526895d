use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanSimError;
use crate::types::*;
use crate::LoanSimResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest schedule [`build_schedule`] will lay out (100 years).
pub const MAX_SCHEDULE_MONTHS: u32 = 1_200;

/// Repayment figures for a fixed-rate, level-payment loan, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanResult {
    pub installment: Money,
    pub total_payable: Money,
    pub total_interest: Money,
}

/// A single month in an amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub month: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Month-by-month amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub installment: Money,
    pub periods: Vec<SchedulePeriod>,
    pub total_interest: Money,
    pub total_paid: Money,
}

fn validate(principal: Money, annual_rate: Rate, term_months: u32) -> LoanSimResult<()> {
    if principal <= Decimal::ZERO {
        return Err(LoanSimError::InvalidPrincipal(principal.to_string()));
    }
    if term_months == 0 {
        return Err(LoanSimError::InvalidTerm {
            months: term_months,
            reason: "payment deadline must be at least 1 month".into(),
        });
    }
    if annual_rate < Decimal::ZERO {
        return Err(LoanSimError::InvalidRate(annual_rate.to_string()));
    }
    Ok(())
}

/// Unrounded level payment: P·m·(1+m)^n / ((1+m)^n − 1), or P/n when m = 0.
fn level_payment(principal: Money, monthly_rate: Rate, term_months: u32) -> LoanSimResult<Money> {
    let periods = Decimal::from(term_months);
    if monthly_rate.is_zero() {
        return Ok(principal / periods);
    }

    let growth = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(term_months))
        .ok_or_else(|| LoanSimError::CalculationOverflow {
            context: format!("compounding factor over {term_months} months"),
        })?;
    let annuity = growth - Decimal::ONE;

    // rate too small to register at 28 significant digits
    if annuity.is_zero() {
        return Ok(principal / periods);
    }

    principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(growth))
        .and_then(|v| v.checked_div(annuity))
        .ok_or_else(|| LoanSimError::CalculationOverflow {
            context: "level payment".into(),
        })
}

/// Installment, total payable and total interest for a level-payment loan.
///
/// Totals are derived from the unrounded installment; every figure is then
/// rounded half-up to cents.
pub fn amortize(principal: Money, annual_rate: Rate, term_months: u32) -> LoanSimResult<LoanResult> {
    validate(principal, annual_rate, term_months)?;

    let installment = level_payment(principal, annual_rate / MONTHS_PER_YEAR, term_months)?;
    let total_payable = installment
        .checked_mul(Decimal::from(term_months))
        .ok_or_else(|| LoanSimError::CalculationOverflow {
            context: "total payable".into(),
        })?;
    let total_interest = total_payable - principal;

    Ok(LoanResult {
        installment: round_money(installment),
        total_payable: round_money(total_payable),
        total_interest: round_money(total_interest),
    })
}

/// Build the month-by-month repayment schedule for a level-payment loan.
///
/// Interest and principal are rounded to cents each month; the final month
/// absorbs the residual so the loan closes at exactly zero.
pub fn build_schedule(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
) -> LoanSimResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(principal, annual_rate, term_months)?;
    if term_months > MAX_SCHEDULE_MONTHS {
        return Err(LoanSimError::InvalidTerm {
            months: term_months,
            reason: format!("schedules are limited to {MAX_SCHEDULE_MONTHS} months"),
        });
    }

    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    let installment = round_money(level_payment(principal, monthly_rate, term_months)?);

    let mut periods = Vec::with_capacity(term_months as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for month in 1..=term_months {
        let opening = balance;
        let interest = round_money(opening * monthly_rate);

        let (payment, principal_part) = if month == term_months {
            (opening + interest, opening)
        } else {
            let part = (installment - interest).min(opening);
            (part + interest, part)
        };

        balance = opening - principal_part;
        total_interest += interest;
        total_paid += payment;

        periods.push(SchedulePeriod {
            month,
            opening_balance: opening,
            payment,
            interest,
            principal: principal_part,
            closing_balance: balance,
        });
    }

    if let Some(last) = periods.last() {
        if last.payment != installment {
            warnings.push(format!(
                "Final payment of {} differs from the regular installment of {installment} by rounding",
                last.payment
            ));
        }
    }

    let output = AmortizationSchedule {
        principal,
        annual_rate,
        term_months,
        installment,
        periods,
        total_interest,
        total_paid,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization schedule",
        &serde_json::json!({
            "principal": principal.to_string(),
            "annual_rate": annual_rate.to_string(),
            "monthly_rate": monthly_rate.to_string(),
            "term_months": term_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}
