//! Payment and compensation entries produced from a submitted filing.
//!
//! Entries are returned as values; booking them to the general ledger is
//! the caller's concern.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::machine::FilingId;
use crate::core::money::{out_of_range, percent_of};
use crate::core::{PeriodKey, Result, TaxType};

/// Adjustment kind recorded on every compensation entry.
pub const ADJUSTMENT_KIND: &str = "Kompensasi Lebih Bayar";
/// Compensation mode recorded on every compensation entry.
pub const COMPENSATION_MODE: &str = "Dikompensasikan ke Masa Pajak Berikutnya";

/// Payment of a Kurang Bayar balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub reference: String,
    pub filing_id: FilingId,
    pub amount: Decimal,
    pub posting_date: NaiveDate,
    pub due_date: NaiveDate,
    pub remarks: String,
}

/// Carry-forward of a Lebih Bayar balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAdjustmentEntry {
    pub reference: String,
    pub filing_id: FilingId,
    pub compensation_amount: Decimal,
    /// Tax base backed out of the compensated VAT.
    pub adjustment_tax_base: Decimal,
    pub adjustment_kind: String,
    pub compensation_mode: String,
    pub posting_date: NaiveDate,
    /// Names the filing the compensation originates from.
    pub reason: String,
    pub remarks: String,
}

/// Result of a settlement transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement<T> {
    /// A new entry was created and its reference recorded on the filing.
    Created(T),
    /// The filing already carries a reference. Nothing changed.
    AlreadyGenerated(String),
}

impl<T> Settlement<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Payment deadline: day 60 after the period start for PPN, day 40 for PPh.
pub fn payment_due_date(key: &PeriodKey) -> Result<NaiveDate> {
    let (start, _) = key.date_range()?;
    let days = match key.tax_type {
        TaxType::Ppn => 60,
        _ => 40,
    };
    Ok(start + Days::new(days))
}

/// Tax base implied by a VAT amount at `vat_rate` percent.
pub fn adjustment_tax_base(amount: Decimal, vat_rate: Decimal) -> Result<Decimal> {
    if vat_rate.is_zero() {
        return Ok(Decimal::ZERO);
    }
    percent_of(amount, vat_rate).ok_or_else(|| out_of_range("adjustment_tax_base"))
}

pub(crate) fn payment_remarks(key: &PeriodKey) -> String {
    format!("Tax payment for {}", spt_period(key))
}

pub(crate) fn adjustment_remarks(key: &PeriodKey) -> String {
    format!("Tax compensation from {}", spt_period(key))
}

pub(crate) fn adjustment_reason(filing_id: &FilingId, key: &PeriodKey) -> String {
    format!("Tax compensation from {filing_id} for {}", spt_period(key))
}

fn spt_period(key: &PeriodKey) -> String {
    match key.masa() {
        Some(masa) => format!("{} {}/{}", key.tax_type.filing_label(), masa, key.year),
        None => format!("{} {}", key.tax_type.filing_label(), key.year),
    }
}
