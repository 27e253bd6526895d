use chrono::{Datelike, NaiveDate};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanSimError;
use crate::types::Rate;
use crate::LoanSimResult;

/// Wire format for birth dates (`DD-MM-YYYY`).
pub const BIRTH_DATE_FORMAT: &str = "%d-%m-%Y";

/// Age band used to select the annual interest rate.
///
/// The four bands partition every non-negative age: `<=25`, `26-40`,
/// `41-60` and `>60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    UpTo25,
    From26To40,
    From41To60,
    Over60,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 4] = [
        AgeBracket::UpTo25,
        AgeBracket::From26To40,
        AgeBracket::From41To60,
        AgeBracket::Over60,
    ];

    pub fn from_age(age: u32) -> Self {
        match age {
            0..=25 => AgeBracket::UpTo25,
            26..=40 => AgeBracket::From26To40,
            41..=60 => AgeBracket::From41To60,
            _ => AgeBracket::Over60,
        }
    }

    pub fn contains(self, age: u32) -> bool {
        match self {
            AgeBracket::UpTo25 => age <= 25,
            AgeBracket::From26To40 => (26..=40).contains(&age),
            AgeBracket::From41To60 => (41..=60).contains(&age),
            AgeBracket::Over60 => age > 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::UpTo25 => "<=25",
            AgeBracket::From26To40 => "26-40",
            AgeBracket::From41To60 => "41-60",
            AgeBracket::Over60 => ">60",
        }
    }
}

/// Annual rate per age bracket. Read-only; share [`RateTable::STANDARD`] by
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    pub up_to_25: Rate,
    pub from_26_to_40: Rate,
    pub from_41_to_60: Rate,
    pub over_60: Rate,
}

impl RateTable {
    pub const STANDARD: RateTable = RateTable {
        up_to_25: dec!(0.05),
        from_26_to_40: dec!(0.03),
        from_41_to_60: dec!(0.02),
        over_60: dec!(0.04),
    };

    pub fn rate_for(&self, bracket: AgeBracket) -> Rate {
        match bracket {
            AgeBracket::UpTo25 => self.up_to_25,
            AgeBracket::From26To40 => self.from_26_to_40,
            AgeBracket::From41To60 => self.from_41_to_60,
            AgeBracket::Over60 => self.over_60,
        }
    }

    pub fn rate_for_age(&self, age: u32) -> Rate {
        self.rate_for(AgeBracket::from_age(age))
    }

    /// Brackets paired with their rates, youngest first.
    pub fn entries(&self) -> [(AgeBracket, Rate); 4] {
        AgeBracket::ALL.map(|b| (b, self.rate_for(b)))
    }
}

impl Default for RateTable {
    fn default() -> Self {
        RateTable::STANDARD
    }
}

/// Parse a `DD-MM-YYYY` birth date. Day and month may drop the leading zero;
/// the year must have four digits.
pub fn parse_birth_date(raw: &str) -> LoanSimResult<NaiveDate> {
    let four_digit_year = raw
        .rsplit('-')
        .next()
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()));
    if !four_digit_year {
        return Err(LoanSimError::InvalidDate(format!(
            "'{raw}' must be in DD-MM-YYYY format"
        )));
    }
    NaiveDate::parse_from_str(raw, BIRTH_DATE_FORMAT)
        .map_err(|e| LoanSimError::InvalidDate(format!("'{raw}' is not a valid DD-MM-YYYY date ({e})")))
}

/// Whole years between `birth_date` and `as_of`. A birthday later in the
/// as-of year has not been reached yet.
pub fn age_on(birth_date: NaiveDate, as_of: NaiveDate) -> LoanSimResult<u32> {
    if birth_date > as_of {
        return Err(LoanSimError::InvalidDate(format!(
            "birth date {birth_date} is after the reference date {as_of}"
        )));
    }

    let mut age = as_of.year() - birth_date.year();
    if (as_of.month(), as_of.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }

    // birth_date <= as_of keeps this non-negative
    Ok(age as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bracket_boundaries() {
        let table = RateTable::STANDARD;
        assert_eq!(table.rate_for_age(0), dec!(0.05));
        assert_eq!(table.rate_for_age(25), dec!(0.05));
        assert_eq!(table.rate_for_age(26), dec!(0.03));
        assert_eq!(table.rate_for_age(40), dec!(0.03));
        assert_eq!(table.rate_for_age(41), dec!(0.02));
        assert_eq!(table.rate_for_age(60), dec!(0.02));
        assert_eq!(table.rate_for_age(61), dec!(0.04));
        assert_eq!(table.rate_for_age(150), dec!(0.04));
    }

    #[test]
    fn test_from_age_agrees_with_contains() {
        for age in 0..=130 {
            let matching: Vec<_> = AgeBracket::ALL
                .iter()
                .filter(|b| b.contains(age))
                .collect();
            assert_eq!(matching.len(), 1, "age {age}");
            assert_eq!(*matching[0], AgeBracket::from_age(age));
        }
    }

    #[test]
    fn test_age_birthday_passed() {
        assert_eq!(age_on(date(1990, 1, 1), date(2023, 12, 31)).unwrap(), 33);
    }

    #[test]
    fn test_age_birthday_not_passed() {
        assert_eq!(age_on(date(1990, 12, 31), date(2023, 6, 15)).unwrap(), 32);
    }

    #[test]
    fn test_age_on_birthday() {
        assert_eq!(age_on(date(1990, 6, 15), date(2024, 6, 15)).unwrap(), 34);
        assert_eq!(age_on(date(1990, 6, 15), date(2024, 6, 14)).unwrap(), 33);
    }

    #[test]
    fn test_age_born_today() {
        assert_eq!(age_on(date(2024, 3, 1), date(2024, 3, 1)).unwrap(), 0);
    }

    #[test]
    fn test_leap_day_birthday() {
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 2, 28)).unwrap(), 22);
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 3, 1)).unwrap(), 23);
    }

    #[test]
    fn test_future_birth_date_rejected() {
        let err = age_on(date(2030, 1, 1), date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.code(), "INVALID_DATE");
    }

    #[test]
    fn test_parse_birth_date_without_zero_padding() {
        assert_eq!(parse_birth_date("5-6-1990").unwrap(), date(1990, 6, 5));
        assert_eq!(parse_birth_date("05-6-1990").unwrap(), date(1990, 6, 5));
        assert_eq!(parse_birth_date("1-12-2000").unwrap(), date(2000, 12, 1));
    }

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(parse_birth_date("15-06-1990").unwrap(), date(1990, 6, 15));
        assert!(parse_birth_date("1990-06-15").is_err());
        assert!(parse_birth_date("15/06/1990").is_err());
        assert!(parse_birth_date("31-02-1990").is_err());
        assert!(parse_birth_date("15-06-90").is_err());
        assert!(parse_birth_date("invalid-date").is_err());
        assert!(parse_birth_date("").is_err());
    }
}
