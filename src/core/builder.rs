use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::{PajakError, ValidationError};
use super::types::*;

/// Builder for ledger documents.
///
/// ```
/// use pajak::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let doc = TaxDocumentBuilder::new(
///     DocumentType::EFaktur,
///     "EFK-0001",
///     "CompanyA",
///     NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
/// )
/// .party("PT Pelanggan Jaya")
/// .amounts(dec!(10000000), dec!(1100000))
/// .npwp("012345678901000")
/// .tax_invoice_number("010.000-24.00000001")
/// .build()
/// .unwrap();
///
/// assert_eq!(doc.flow(), TaxFlow::Output);
/// ```
pub struct TaxDocumentBuilder {
    doc_type: DocumentType,
    doc_id: String,
    company: String,
    posting_date: NaiveDate,
    party: String,
    base_amount: Decimal,
    tax_amount: Decimal,
    status: DocumentStatus,
    npwp: Option<String>,
    tax_invoice_number: Option<String>,
    transaction_code: Option<String>,
    rate: Option<Decimal>,
    reference: Option<String>,
}

impl TaxDocumentBuilder {
    pub fn new(
        doc_type: DocumentType,
        doc_id: impl Into<String>,
        company: impl Into<String>,
        posting_date: NaiveDate,
    ) -> Self {
        Self {
            doc_type,
            doc_id: doc_id.into(),
            company: company.into(),
            posting_date,
            party: String::new(),
            base_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            status: DocumentStatus::Submitted,
            npwp: None,
            tax_invoice_number: None,
            transaction_code: None,
            rate: None,
            reference: None,
        }
    }

    pub fn party(mut self, party: impl Into<String>) -> Self {
        self.party = party.into();
        self
    }

    /// Set the tax base and the tax amount.
    pub fn amounts(mut self, base_amount: Decimal, tax_amount: Decimal) -> Self {
        self.base_amount = base_amount;
        self.tax_amount = tax_amount;
        self
    }

    pub fn status(mut self, status: DocumentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn npwp(mut self, npwp: impl Into<String>) -> Self {
        self.npwp = Some(npwp.into());
        self
    }

    pub fn tax_invoice_number(mut self, number: impl Into<String>) -> Self {
        self.tax_invoice_number = Some(number.into());
        self
    }

    pub fn transaction_code(mut self, code: impl Into<String>) -> Self {
        self.transaction_code = Some(code.into());
        self
    }

    /// Withholding tariff in percent (e.g. `dec!(2)` for PPh 23 on services).
    pub fn rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Upstream document this one was generated from.
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn build(self) -> Result<TaxDocument, PajakError> {
        let mut errors = Vec::new();
        if self.doc_id.trim().is_empty() {
            errors.push(ValidationError::new("doc_id", "must not be blank"));
        }
        if self.company.trim().is_empty() {
            errors.push(ValidationError::new("company", "must not be blank"));
        }
        if self.base_amount < Decimal::ZERO {
            errors.push(ValidationError::new("base_amount", "must not be negative"));
        }
        if self.tax_amount < Decimal::ZERO {
            errors.push(ValidationError::new("tax_amount", "must not be negative"));
        }
        if let Some(rate) = self.rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
                errors.push(ValidationError::new("rate", "must be between 0 and 100"));
            }
        }
        if !errors.is_empty() {
            return Err(PajakError::from_validation(&errors));
        }

        Ok(TaxDocument {
            doc_type: self.doc_type,
            doc_id: self.doc_id,
            company: self.company,
            posting_date: self.posting_date,
            party: self.party,
            base_amount: self.base_amount,
            tax_amount: self.tax_amount,
            status: self.status,
            npwp: self.npwp,
            tax_invoice_number: self.tax_invoice_number,
            transaction_code: self.transaction_code,
            rate: self.rate,
            reference: self.reference,
        })
    }
}
