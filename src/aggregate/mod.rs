//! Period aggregation.
//!
//! [`aggregate`] folds a selection of documents into a [`PeriodSummary`]:
//! output and input VAT for PPN, gross income and withheld tax for PPh.
//! The function is pure, so re-aggregating the same documents always yields
//! the same summary. Summaries are recomputed per call and never cached.

mod overview;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::{add, sub};
use crate::core::{PajakError, Result, StatusSpt, TaxDocument, TaxFlow, TaxType};

pub use overview::{MonthSummary, YearOverview, year_overview};

/// Derived tax position of one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodSummary {
    /// PPN: keluaran vs masukan.
    Ppn {
        output_tax: Decimal,
        input_tax: Decimal,
        /// `output_tax - input_tax`.
        balance: Decimal,
    },
    /// PPh 21/23/26: withheld income tax.
    Pph {
        income_amount: Decimal,
        tax_amount: Decimal,
        document_count: usize,
    },
}

impl PeriodSummary {
    /// An all-zero summary of the right shape for `tax_type`.
    pub fn empty(tax_type: TaxType) -> Self {
        match tax_type {
            TaxType::Ppn => Self::Ppn {
                output_tax: Decimal::ZERO,
                input_tax: Decimal::ZERO,
                balance: Decimal::ZERO,
            },
            _ => Self::Pph {
                income_amount: Decimal::ZERO,
                tax_amount: Decimal::ZERO,
                document_count: 0,
            },
        }
    }

    /// Signed position: positive is owed to the state, negative is overpaid.
    ///
    /// For PPh this is the withheld tax, which is always owed.
    pub fn balance(&self) -> Decimal {
        match self {
            Self::Ppn { balance, .. } => *balance,
            Self::Pph { tax_amount, .. } => *tax_amount,
        }
    }

    pub fn status_spt(&self) -> StatusSpt {
        StatusSpt::from_balance(self.balance())
    }

    /// Whether this summary has the shape expected for `tax_type`.
    pub fn matches(&self, tax_type: TaxType) -> bool {
        matches!(
            (self, tax_type.is_withholding()),
            (Self::Ppn { .. }, false) | (Self::Pph { .. }, true)
        )
    }

    /// Combine two summaries of the same shape. Mismatched shapes keep `self`.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (
                Self::Ppn {
                    output_tax: o1,
                    input_tax: i1,
                    ..
                },
                Self::Ppn {
                    output_tax: o2,
                    input_tax: i2,
                    ..
                },
            ) => ppn(add(*o1, *o2, "output_tax")?, add(*i1, *i2, "input_tax")?),
            (
                Self::Pph {
                    income_amount: a1,
                    tax_amount: t1,
                    document_count: c1,
                },
                Self::Pph {
                    income_amount: a2,
                    tax_amount: t2,
                    document_count: c2,
                },
            ) => Ok(Self::Pph {
                income_amount: add(*a1, *a2, "income_amount")?,
                tax_amount: add(*t1, *t2, "tax_amount")?,
                document_count: c1 + c2,
            }),
            _ => Ok(self.clone()),
        }
    }
}

fn ppn(output_tax: Decimal, input_tax: Decimal) -> Result<PeriodSummary> {
    Ok(PeriodSummary::Ppn {
        output_tax,
        input_tax,
        balance: sub(output_tax, input_tax, "balance")?,
    })
}

/// Sum `documents` into a summary for `tax_type`.
///
/// Documents of another tax type are ignored. Fails with a validation error
/// when a total leaves the decimal range.
pub fn aggregate(documents: &[TaxDocument], tax_type: TaxType) -> Result<PeriodSummary> {
    let mut relevant = documents.iter().filter(|d| d.tax_type() == tax_type);

    if tax_type == TaxType::Ppn {
        let (output_tax, input_tax) =
            relevant.try_fold((Decimal::ZERO, Decimal::ZERO), |(out, inp), d| {
                Ok::<_, PajakError>(match d.flow() {
                    TaxFlow::Output => (add(out, d.tax_amount, "output_tax")?, inp),
                    TaxFlow::Input => (out, add(inp, d.tax_amount, "input_tax")?),
                    TaxFlow::Withheld => (out, inp),
                })
            })?;
        return ppn(output_tax, input_tax);
    }

    let (income_amount, tax_amount, document_count) = relevant.try_fold(
        (Decimal::ZERO, Decimal::ZERO, 0usize),
        |(income, tax, count), d| {
            Ok::<_, PajakError>((
                add(income, d.base_amount, "income_amount")?,
                add(tax, d.tax_amount, "tax_amount")?,
                count + 1,
            ))
        },
    )?;
    Ok(PeriodSummary::Pph {
        income_amount,
        tax_amount,
        document_count,
    })
}
