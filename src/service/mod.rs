//! Boundary operations for hosts (UI handlers, CLIs, HTTP layers).
//!
//! [`ReportingService`] ties the selector, aggregator, filing store and
//! exports together behind the operations a reporting screen needs. Every
//! mutating operation takes a [`Caller`] and is checked against role
//! capabilities before any transition runs. Configuration is passed in at
//! construction; there is no process-wide state.
//!
//! Settlement calls for one period are serialised with a per-period mutex,
//! and a [`PajakError::Conflict`] from the store is retried once.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use pajak::core::*;
//! use pajak::filing::MemoryFilingStore;
//! use pajak::selector::MemoryLedger;
//! use pajak::service::*;
//! use rust_decimal_macros::dec;
//!
//! let posted = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
//! let ledger = MemoryLedger::with_documents([
//!     TaxDocumentBuilder::new(DocumentType::EFaktur, "EFK-1", "CompanyA", posted)
//!         .amounts(dec!(9090909), dec!(1000000))
//!         .build()
//!         .unwrap(),
//! ]);
//! let config = ReportingConfig::default()
//!     .with_today(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
//! let service = ReportingService::new(ledger, MemoryFilingStore::new(), config);
//!
//! let manager = Caller::new("tax@example.co.id", [Role::TaxManager]);
//! let key = PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn);
//! let id = service.generate_filing(&manager, &key).unwrap();
//! service.submit_filing(&manager, &id).unwrap();
//!
//! let outcome = service.generate_payment(&manager, &id).unwrap();
//! assert_eq!(outcome.reference(), Some("PE-2024-00001"));
//! ```

mod access;
mod locks;

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{PeriodSummary, YearOverview, aggregate, year_overview};
use crate::core::{
    DocumentType, PajakError, PeriodKey, ReferenceSequence, Result, StatusSpt, TaxDocument,
    TaxType,
};
use crate::ebupot::to_ebupot_file;
use crate::efaktur::to_efaktur_file;
use crate::export::ExportFile;
use crate::filing::{
    Filing, FilingConfig, FilingId, FilingStage, FilingStatus, FilingStore, PaymentEntry,
    Settlement, TaxAdjustmentEntry,
};
use crate::selector::{DocumentSelector, DocumentSource};

pub use access::{Action, Caller, Role, authorize};
use locks::PeriodLocks;

/// Settings for a [`ReportingService`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    pub filing: FilingConfig,
    /// Fixed business date. `None` uses the local date.
    pub today: Option<NaiveDate>,
}

impl ReportingConfig {
    pub fn with_filing(mut self, filing: FilingConfig) -> Self {
        self.filing = filing;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

/// What a reporting screen shows for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportingData {
    pub key: PeriodKey,
    pub summary: PeriodSummary,
    pub status_spt: StatusSpt,
    pub documents: Vec<TaxDocument>,
    /// The live filing, for monthly keys.
    pub filing: Option<FilingOverview>,
}

impl ReportingData {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PajakError::Export(e.to_string()))
    }
}

/// Filing fields relevant to a reporting screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingOverview {
    pub id: FilingId,
    pub status: FilingStatus,
    pub stage: FilingStage,
    pub status_spt: StatusSpt,
    pub balance: Decimal,
    pub payment_ref: Option<String>,
    pub adjustment_ref: Option<String>,
}

impl From<&Filing> for FilingOverview {
    fn from(filing: &Filing) -> Self {
        Self {
            id: filing.id.clone(),
            status: filing.status,
            stage: filing.stage(),
            status_spt: filing.status_spt,
            balance: filing.balance,
            payment_ref: filing.payment_ref.clone(),
            adjustment_ref: filing.adjustment_ref.clone(),
        }
    }
}

/// Outcome of a settlement request.
///
/// Requests that do not apply (wrong SPT status) and repeats are successful
/// no-ops rather than errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SettlementOutcome<T> {
    Created(T),
    AlreadyGenerated { reference: String },
    NotApplicable { reason: String },
}

impl<T> SettlementOutcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

impl SettlementOutcome<PaymentEntry> {
    /// The payment reference now recorded on the filing, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Created(entry) => Some(&entry.reference),
            Self::AlreadyGenerated { reference } => Some(reference),
            Self::NotApplicable { .. } => None,
        }
    }
}

impl SettlementOutcome<TaxAdjustmentEntry> {
    /// The adjustment reference now recorded on the filing, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Created(entry) => Some(&entry.reference),
            Self::AlreadyGenerated { reference } => Some(reference),
            Self::NotApplicable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Series {
    Filing,
    Payment,
    Adjustment,
}

/// Reporting operations over a document ledger and a filing store.
pub struct ReportingService<S, F> {
    selector: DocumentSelector<S>,
    store: F,
    config: ReportingConfig,
    sequences: Mutex<HashMap<Series, ReferenceSequence>>,
    locks: PeriodLocks,
}

impl<S: DocumentSource, F: FilingStore> ReportingService<S, F> {
    pub fn new(source: S, store: F, config: ReportingConfig) -> Self {
        Self {
            selector: DocumentSelector::new(source),
            store,
            config,
            sequences: Mutex::new(HashMap::new()),
            locks: PeriodLocks::default(),
        }
    }

    pub fn config(&self) -> &ReportingConfig {
        &self.config
    }

    pub fn store(&self) -> &F {
        &self.store
    }

    pub fn selector(&self) -> &DocumentSelector<S> {
        &self.selector
    }

    /// Selected documents, their summary and the live filing for `key`.
    pub fn get_reporting_data(&self, key: &PeriodKey) -> Result<ReportingData> {
        let documents = self.selector.select(key)?;
        let summary = aggregate(&documents, key.tax_type)?;
        let filing = match key.month {
            Some(_) => self.store.get(key)?.as_ref().map(FilingOverview::from),
            None => None,
        };
        Ok(ReportingData {
            key: key.clone(),
            status_spt: summary.status_spt(),
            summary,
            documents,
            filing,
        })
    }

    /// Monthly breakdown and year total.
    pub fn year_overview(&self, company: &str, year: i32, tax_type: TaxType) -> Result<YearOverview> {
        year_overview(&self.selector, company, year, tax_type)
    }

    pub fn filing(&self, id: &FilingId) -> Result<Filing> {
        self.store.get_by_id(id)
    }

    /// Aggregate the period and persist a Draft filing for it.
    pub fn generate_filing(&self, caller: &Caller, key: &PeriodKey) -> Result<FilingId> {
        authorize(caller, Action::GenerateFiling)?;
        key.ensure_valid()?;
        if key.month.is_none() {
            return Err(PajakError::Validation(
                "period.month: a filing must name a masa pajak".into(),
            ));
        }

        self.locks.with(key, || {
            if let Some(existing) = self.store.get(key)? {
                return Err(PajakError::DuplicateFiling {
                    key: key.to_string(),
                    existing: existing.id.to_string(),
                });
            }

            let documents = self.selector.select(key)?;
            let summary = aggregate(&documents, key.tax_type)?;
            let today = self.today();
            self.sync_sequence(Series::Filing, today)?;
            let id = FilingId::new(self.draw_reference(Series::Filing, today));
            let filing = Filing::generate(id, key.clone(), &summary, &documents, today)?;
            let stored = self.store.create(filing)?;

            tracing::info!(
                filing = %stored.id,
                company = %key.company,
                period = %key,
                status_spt = %stored.status_spt,
                balance = %stored.balance,
                documents = stored.source_documents.len(),
                "filing generated"
            );
            Ok(stored.id)
        })
    }

    pub fn submit_filing(&self, caller: &Caller, id: &FilingId) -> Result<Filing> {
        authorize(caller, Action::SubmitFiling)?;
        let today = self.today();
        let filing = self.transition(id, "submit", |f| f.submit(today))?;
        tracing::info!(filing = %filing.id, period = %filing.key, "filing submitted");
        Ok(filing)
    }

    pub fn cancel_filing(&self, caller: &Caller, id: &FilingId) -> Result<Filing> {
        authorize(caller, Action::CancelFiling)?;
        let today = self.today();
        let filing = self.transition(id, "cancel", |f| f.cancel(today))?;
        tracing::info!(filing = %filing.id, period = %filing.key, "filing cancelled");
        Ok(filing)
    }

    /// Create the payment entry of a submitted Kurang Bayar filing.
    pub fn generate_payment(
        &self,
        caller: &Caller,
        id: &FilingId,
    ) -> Result<SettlementOutcome<PaymentEntry>> {
        authorize(caller, Action::GeneratePayment)?;
        self.settle(id, "generate payment", Series::Payment, |filing, today, next_ref| {
            filing.generate_payment(today, next_ref)
        })
    }

    /// Create the compensation entry of a submitted Lebih Bayar filing.
    pub fn generate_adjustment(
        &self,
        caller: &Caller,
        id: &FilingId,
    ) -> Result<SettlementOutcome<TaxAdjustmentEntry>> {
        authorize(caller, Action::GenerateAdjustment)?;
        self.settle(id, "generate adjustment", Series::Adjustment, |filing, today, next_ref| {
            filing.generate_adjustment(today, &self.config.filing, next_ref)
        })
    }

    /// E-Faktur CSV of the period's E-Faktur documents.
    ///
    /// The key's tax type is ignored; PPN documents are always selected.
    /// Sales Invoices carry no nomor faktur and are left out.
    pub fn export_efaktur(&self, key: &PeriodKey) -> Result<ExportFile> {
        let key = key.with_tax_type(TaxType::Ppn);
        let documents: Vec<TaxDocument> = self
            .selector
            .select(&key)?
            .into_iter()
            .filter(|d| d.doc_type == DocumentType::EFaktur)
            .collect();
        let file = to_efaktur_file(&key, &documents)?;
        tracing::info!(period = %key, rows = documents.len(), file = %file.filename, "e-faktur exported");
        Ok(file)
    }

    /// E-Bupot CSV for a withholding tax type. `month` overrides the key's month.
    pub fn export_ebupot(&self, key: &PeriodKey, month: Option<u32>) -> Result<ExportFile> {
        if !key.tax_type.is_withholding() {
            return Err(PajakError::Validation(format!(
                "tax_type: E-Bupot covers withholding taxes only, got {}",
                key.tax_type
            )));
        }
        let key = key.with_month(month.or(key.month));
        let documents = self.selector.select(&key)?;
        let file = to_ebupot_file(&key, &documents)?;
        tracing::info!(period = %key, rows = documents.len(), file = %file.filename, "e-bupot exported");
        Ok(file)
    }

    fn today(&self) -> NaiveDate {
        self.config
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    fn prefix(&self, series: Series) -> &str {
        match series {
            Series::Filing => &self.config.filing.filing_prefix,
            Series::Payment => &self.config.filing.payment_reference_prefix,
            Series::Adjustment => &self.config.filing.adjustment_reference_prefix,
        }
    }

    fn with_sequence<R>(
        &self,
        series: Series,
        today: NaiveDate,
        f: impl FnOnce(&mut ReferenceSequence) -> R,
    ) -> R {
        let mut sequences = self.sequences.lock();
        let sequence = sequences
            .entry(series)
            .or_insert_with(|| ReferenceSequence::new(self.prefix(series), today.year()));
        sequence.auto_advance(today);
        f(sequence)
    }

    /// Move the series past every number the store already holds, so other
    /// instances and earlier runs over the same store are never reissued.
    fn sync_sequence(&self, series: Series, today: NaiveDate) -> Result<()> {
        self.with_sequence(series, today, |sequence| -> Result<()> {
            if let Some(last) = self.store.last_issued(sequence.prefix(), sequence.year())? {
                sequence.skip_past(last);
            }
            Ok(())
        })
    }

    fn draw_reference(&self, series: Series, today: NaiveDate) -> String {
        self.with_sequence(series, today, ReferenceSequence::next_reference)
    }

    /// Read, apply `f` and write back, retrying once on a version conflict.
    fn transition(
        &self,
        id: &FilingId,
        action: &'static str,
        f: impl Fn(&mut Filing) -> Result<()>,
    ) -> Result<Filing> {
        let key = self.store.get_by_id(id)?.key;
        self.locks.with(&key, || {
            self.retry_on_conflict(id, action, || {
                let mut filing = self.store.get_by_id(id)?;
                f(&mut filing)?;
                self.store.update(filing)
            })
        })
    }

    /// Apply a settlement under the period lock.
    ///
    /// A reference drawn by an attempt that lost a version conflict is reused
    /// by the retry. It is lost when the write fails for good or the retry
    /// finds the filing already settled by another writer.
    fn settle<T>(
        &self,
        id: &FilingId,
        action: &'static str,
        series: Series,
        apply: impl Fn(&mut Filing, NaiveDate, &dyn Fn() -> String) -> Result<Settlement<T>>,
    ) -> Result<SettlementOutcome<T>> {
        let key = self.store.get_by_id(id)?.key;
        let today = self.today();
        let drawn: Mutex<Option<String>> = Mutex::new(None);
        let next_ref = || {
            drawn
                .lock()
                .get_or_insert_with(|| self.draw_reference(series, today))
                .clone()
        };

        self.locks.with(&key, || {
            self.retry_on_conflict(id, action, || {
                self.sync_sequence(series, today)?;
                let mut filing = self.store.get_by_id(id)?;
                match apply(&mut filing, today, &next_ref) {
                    Ok(Settlement::Created(entry)) => {
                        let stored = self.store.update(filing)?;
                        tracing::info!(
                            filing = %stored.id,
                            period = %stored.key,
                            amount = %stored.settlement_amount(),
                            stage = ?stored.stage(),
                            "{action} recorded"
                        );
                        Ok(SettlementOutcome::Created(entry))
                    }
                    Ok(Settlement::AlreadyGenerated(reference)) => {
                        tracing::debug!(filing = %id, %reference, "{action} already recorded");
                        Ok(SettlementOutcome::AlreadyGenerated { reference })
                    }
                    Err(PajakError::Precondition(reason)) => {
                        tracing::debug!(filing = %id, %reason, "{action} not applicable");
                        Ok(SettlementOutcome::NotApplicable { reason })
                    }
                    Err(e) => Err(e),
                }
            })
        })
    }

    fn retry_on_conflict<T>(
        &self,
        id: &FilingId,
        action: &'static str,
        op: impl Fn() -> Result<T>,
    ) -> Result<T> {
        match op() {
            Err(PajakError::Conflict {
                expected, found, ..
            }) => {
                tracing::warn!(filing = %id, action, expected, found, "version conflict, retrying once");
                op()
            }
            other => other,
        }
    }
}
