//! Reporting period keys (masa pajak / tahun pajak).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{PajakError, Result, ValidationError};
use super::types::TaxType;

/// Earliest tax year accepted on an SPT.
pub const MIN_TAX_YEAR: i32 = 2000;
/// Latest tax year accepted on an SPT.
pub const MAX_TAX_YEAR: i32 = 2099;

/// Identifies one reporting period: company, tax year, optional month and tax type.
///
/// `month == None` selects the whole year. Filings are always monthly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub company: String,
    pub year: i32,
    pub month: Option<u32>,
    pub tax_type: TaxType,
}

impl PeriodKey {
    pub fn monthly(company: impl Into<String>, year: i32, month: u32, tax_type: TaxType) -> Self {
        Self {
            company: company.into(),
            year,
            month: Some(month),
            tax_type,
        }
    }

    pub fn yearly(company: impl Into<String>, year: i32, tax_type: TaxType) -> Self {
        Self {
            company: company.into(),
            year,
            month: None,
            tax_type,
        }
    }

    /// Same company/year/tax type with a different month selection.
    pub fn with_month(&self, month: Option<u32>) -> Self {
        Self {
            month,
            ..self.clone()
        }
    }

    /// Same company/period with a different tax type.
    pub fn with_tax_type(&self, tax_type: TaxType) -> Self {
        Self {
            tax_type,
            ..self.clone()
        }
    }

    /// Check all fields, returning every problem found.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.company.trim().is_empty() {
            errors.push(ValidationError::new("period.company", "must not be blank"));
        }
        if !(MIN_TAX_YEAR..=MAX_TAX_YEAR).contains(&self.year) {
            errors.push(ValidationError::new(
                "period.year",
                format!("must be between {MIN_TAX_YEAR} and {MAX_TAX_YEAR}, got {}", self.year),
            ));
        }
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                errors.push(ValidationError::new(
                    "period.month",
                    format!("must be between 1 and 12, got {month}"),
                ));
            }
        }
        errors
    }

    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PajakError::from_validation(&errors))
        }
    }

    /// First and last day covered by this key.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        self.ensure_valid()?;
        let invalid = || PajakError::Validation(format!("no calendar range for {self}"));
        match self.month {
            Some(month) => {
                let start = NaiveDate::from_ymd_opt(self.year, month, 1).ok_or_else(invalid)?;
                Ok((start, last_day_of_month(start).ok_or_else(invalid)?))
            }
            None => {
                let start = NaiveDate::from_ymd_opt(self.year, 1, 1).ok_or_else(invalid)?;
                let end = NaiveDate::from_ymd_opt(self.year, 12, 31).ok_or_else(invalid)?;
                Ok((start, end))
            }
        }
    }

    /// Whether `date` falls inside this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && self.month.is_none_or(|m| date.month() == m)
    }

    /// Two-digit masa pajak ("03"), if monthly.
    pub fn masa(&self) -> Option<String> {
        self.month.map(masa)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(m) => write!(f, "{} {} {:02}/{}", self.company, self.tax_type, m, self.year),
            None => write!(f, "{} {} {}", self.company, self.tax_type, self.year),
        }
    }
}

/// Format a month number as a two-digit masa pajak.
pub fn masa(month: u32) -> String {
    format!("{month:02}")
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn valid_monthly_key() {
        let key = PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn);
        assert!(key.validate().is_empty());
        assert_eq!(key.masa().as_deref(), Some("03"));
        assert_eq!(key.to_string(), "CompanyA PPN 03/2024");
    }

    #[test]
    fn collects_every_field_error() {
        let key = PeriodKey {
            company: "  ".into(),
            year: 1999,
            month: Some(13),
            tax_type: TaxType::Pph23,
        };
        let fields: Vec<_> = key.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["period.company", "period.year", "period.month"]);
        assert!(matches!(key.ensure_valid(), Err(PajakError::Validation(_))));
    }

    #[test]
    fn month_range_handles_leap_february_and_december() {
        let feb = PeriodKey::monthly("A", 2024, 2, TaxType::Ppn);
        assert_eq!(feb.date_range().unwrap(), (date(2024, 2, 1), date(2024, 2, 29)));

        let dec = PeriodKey::monthly("A", 2023, 12, TaxType::Ppn);
        assert_eq!(dec.date_range().unwrap(), (date(2023, 12, 1), date(2023, 12, 31)));
    }

    #[test]
    fn yearly_range_and_contains() {
        let key = PeriodKey::yearly("A", 2024, TaxType::Pph21);
        assert_eq!(key.date_range().unwrap(), (date(2024, 1, 1), date(2024, 12, 31)));
        assert!(key.contains(date(2024, 7, 9)));
        assert!(!key.contains(date(2025, 1, 1)));

        let march = key.with_month(Some(3));
        assert!(march.contains(date(2024, 3, 31)));
        assert!(!march.contains(date(2024, 4, 1)));
    }
}
