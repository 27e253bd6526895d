use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::{self, LoanResult};
use crate::error::LoanSimError;
use crate::rates::{self, AgeBracket, RateTable};
use crate::types::{Money, Rate};
use crate::LoanSimResult;

/// A validated loan request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanRequest {
    principal: Money,
    birth_date: NaiveDate,
    term_months: u32,
}

impl LoanRequest {
    /// Construct a request, rejecting non-positive principals and zero terms.
    pub fn new(principal: Money, birth_date: NaiveDate, term_months: u32) -> LoanSimResult<Self> {
        if principal <= Money::ZERO {
            return Err(LoanSimError::InvalidPrincipal(principal.to_string()));
        }
        if term_months == 0 {
            return Err(LoanSimError::InvalidTerm {
                months: term_months,
                reason: "payment deadline must be at least 1 month".into(),
            });
        }
        Ok(Self {
            principal,
            birth_date,
            term_months,
        })
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }
}

/// Repayment figures plus the age and rate that produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub age: u32,
    pub bracket: AgeBracket,
    pub annual_rate: Rate,
    #[serde(flatten)]
    pub result: LoanResult,
}

/// Price one loan: resolve the borrower's age at `as_of`, pick the bracket
/// rate from `table` and amortize.
pub fn simulate_loan(
    request: &LoanRequest,
    as_of: NaiveDate,
    table: &RateTable,
) -> LoanSimResult<LoanQuote> {
    let age = rates::age_on(request.birth_date, as_of)?;
    let bracket = AgeBracket::from_age(age);
    let annual_rate = table.rate_for(bracket);
    let result = amortization::amortize(request.principal, annual_rate, request.term_months)?;

    Ok(LoanQuote {
        age,
        bracket,
        annual_rate,
        result,
    })
}
