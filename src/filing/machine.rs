use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::FilingConfig;
use super::settlement::{
    ADJUSTMENT_KIND, COMPENSATION_MODE, PaymentEntry, Settlement, TaxAdjustmentEntry,
    adjustment_reason, adjustment_remarks, adjustment_tax_base, payment_due_date, payment_remarks,
};
use crate::aggregate::PeriodSummary;
use crate::core::{
    DocumentStatus, DocumentType, PajakError, PeriodKey, Result, StatusSpt, TaxDocument,
    ValidationError,
};

/// Identifier of a filing, e.g. "TFS-2024-00001".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilingId(String);

impl FilingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document status of a filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    Draft,
    Submitted,
    Cancelled,
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::Cancelled => "Cancelled",
        })
    }
}

/// Lifecycle stage including the settlement side branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStage {
    Draft,
    Submitted,
    PaymentGenerated,
    AdjustmentGenerated,
    Cancelled,
}

/// Snapshot of a document that fed into a filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub doc_type: DocumentType,
    pub doc_id: String,
    pub status: DocumentStatus,
    pub tax_amount: Decimal,
}

impl From<&TaxDocument> for SourceDocument {
    fn from(doc: &TaxDocument) -> Self {
        Self {
            doc_type: doc.doc_type,
            doc_id: doc.doc_id.clone(),
            status: doc.status,
            tax_amount: doc.tax_amount,
        }
    }
}

/// SPT Masa filing for one period (Tax Filing Summary).
///
/// Transitions are methods that check the current state and mutate in
/// place. Persisting the result is the store's job; see
/// [`FilingStore`](super::FilingStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    pub id: FilingId,
    pub key: PeriodKey,
    pub status: FilingStatus,
    pub status_spt: StatusSpt,
    /// Signed balance at generation time.
    pub balance: Decimal,
    pub source_documents: Vec<SourceDocument>,
    pub payment_ref: Option<String>,
    pub adjustment_ref: Option<String>,
    pub created_on: NaiveDate,
    pub submitted_on: Option<NaiveDate>,
    pub cancelled_on: Option<NaiveDate>,
    /// Optimistic concurrency token, owned by the store.
    pub version: u64,
}

impl Filing {
    /// Create a Draft filing from an aggregated period.
    ///
    /// The key must name a month and `summary` must have the shape of the
    /// key's tax type.
    pub fn generate(
        id: FilingId,
        key: PeriodKey,
        summary: &PeriodSummary,
        documents: &[TaxDocument],
        today: NaiveDate,
    ) -> Result<Self> {
        let mut errors = key.validate();
        if key.month.is_none() {
            errors.push(ValidationError::new(
                "period.month",
                "a filing must name a masa pajak",
            ));
        }
        if !summary.matches(key.tax_type) {
            errors.push(ValidationError::new(
                "summary",
                format!("does not match tax type {}", key.tax_type),
            ));
        }
        if !errors.is_empty() {
            return Err(PajakError::from_validation(&errors));
        }

        let balance = summary.balance();
        Ok(Self {
            id,
            key,
            status: FilingStatus::Draft,
            status_spt: StatusSpt::from_balance(balance),
            balance,
            source_documents: documents.iter().map(SourceDocument::from).collect(),
            payment_ref: None,
            adjustment_ref: None,
            created_on: today,
            submitted_on: None,
            cancelled_on: None,
            version: 0,
        })
    }

    pub fn stage(&self) -> FilingStage {
        match self.status {
            FilingStatus::Draft => FilingStage::Draft,
            FilingStatus::Cancelled => FilingStage::Cancelled,
            FilingStatus::Submitted if self.payment_ref.is_some() => FilingStage::PaymentGenerated,
            FilingStatus::Submitted if self.adjustment_ref.is_some() => {
                FilingStage::AdjustmentGenerated
            }
            FilingStatus::Submitted => FilingStage::Submitted,
        }
    }

    pub fn is_live(&self) -> bool {
        self.status != FilingStatus::Cancelled
    }

    /// Amount to settle: the absolute balance.
    pub fn settlement_amount(&self) -> Decimal {
        self.balance.abs()
    }

    /// Draft to Submitted.
    pub fn submit(&mut self, today: NaiveDate) -> Result<()> {
        if self.status != FilingStatus::Draft {
            return Err(self.invalid_state("submit"));
        }
        self.status = FilingStatus::Submitted;
        self.submitted_on = Some(today);
        Ok(())
    }

    /// Any live state to Cancelled. Frees the period for a new filing.
    pub fn cancel(&mut self, today: NaiveDate) -> Result<()> {
        if self.status == FilingStatus::Cancelled {
            return Err(self.invalid_state("cancel"));
        }
        self.status = FilingStatus::Cancelled;
        self.cancelled_on = Some(today);
        Ok(())
    }

    /// Record a payment for a Kurang Bayar filing.
    ///
    /// `next_ref` is called only when an entry is actually created, so a
    /// no-op does not consume a reference number.
    pub fn generate_payment(
        &mut self,
        today: NaiveDate,
        next_ref: impl FnOnce() -> String,
    ) -> Result<Settlement<PaymentEntry>> {
        self.ensure_settleable("generate payment", StatusSpt::KurangBayar)?;
        if let Some(existing) = &self.payment_ref {
            return Ok(Settlement::AlreadyGenerated(existing.clone()));
        }

        let entry = PaymentEntry {
            reference: next_ref(),
            filing_id: self.id.clone(),
            amount: self.settlement_amount(),
            posting_date: today,
            due_date: payment_due_date(&self.key)?,
            remarks: payment_remarks(&self.key),
        };
        self.payment_ref = Some(entry.reference.clone());
        Ok(Settlement::Created(entry))
    }

    /// Record a compensation for a Lebih Bayar filing.
    pub fn generate_adjustment(
        &mut self,
        today: NaiveDate,
        config: &FilingConfig,
        next_ref: impl FnOnce() -> String,
    ) -> Result<Settlement<TaxAdjustmentEntry>> {
        self.ensure_settleable("generate adjustment", StatusSpt::LebihBayar)?;
        if let Some(existing) = &self.adjustment_ref {
            return Ok(Settlement::AlreadyGenerated(existing.clone()));
        }

        let amount = self.settlement_amount();
        let tax_base = adjustment_tax_base(amount, config.vat_rate)?;
        let entry = TaxAdjustmentEntry {
            reference: next_ref(),
            filing_id: self.id.clone(),
            compensation_amount: amount,
            adjustment_tax_base: tax_base,
            adjustment_kind: ADJUSTMENT_KIND.into(),
            compensation_mode: COMPENSATION_MODE.into(),
            posting_date: today,
            reason: adjustment_reason(&self.id, &self.key),
            remarks: adjustment_remarks(&self.key),
        };
        self.adjustment_ref = Some(entry.reference.clone());
        Ok(Settlement::Created(entry))
    }

    fn ensure_settleable(&self, action: &'static str, required: StatusSpt) -> Result<()> {
        if self.status != FilingStatus::Submitted {
            return Err(self.invalid_state(action));
        }
        if self.status_spt != required {
            return Err(PajakError::Precondition(format!(
                "filing {} is {}, {action} requires {}",
                self.id, self.status_spt, required
            )));
        }
        Ok(())
    }

    fn invalid_state(&self, action: &'static str) -> PajakError {
        PajakError::InvalidState {
            filing: self.id.to_string(),
            state: self.status.to_string(),
            action,
        }
    }
}
