//! Document selection for a reporting period.
//!
//! The selector validates a [`PeriodKey`], asks the ledger for candidate
//! documents and keeps the ones that are posted and belong to the period.
//! For PPN, a Sales Invoice that already has an E-Faktur generated from it
//! is dropped so the same sale is not counted twice.
//!
//! # Example
//!
//! ```
//! use pajak::core::*;
//! use pajak::selector::*;
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let mut ledger = MemoryLedger::new();
//! ledger.push(
//!     TaxDocumentBuilder::new(
//!         DocumentType::EFaktur,
//!         "EFK-0001",
//!         "CompanyA",
//!         NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
//!     )
//!     .amounts(dec!(10000000), dec!(1100000))
//!     .build()
//!     .unwrap(),
//! );
//!
//! let selector = DocumentSelector::new(ledger);
//! let docs = selector
//!     .select(&PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn))
//!     .unwrap();
//! assert_eq!(docs.len(), 1);
//! ```

mod ledger;

use std::collections::HashSet;

use crate::core::{DocumentType, PeriodKey, Result, TaxDocument, TaxType};

pub use ledger::{DocumentSource, MemoryLedger};

/// Read-only selection of the documents that make up a period.
#[derive(Debug, Clone)]
pub struct DocumentSelector<S> {
    source: S,
}

impl<S: DocumentSource> DocumentSelector<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Documents for `key`, in ledger order. Empty when nothing matches.
    pub fn select(&self, key: &PeriodKey) -> Result<Vec<TaxDocument>> {
        key.ensure_valid()?;

        let fetched = self
            .source
            .query(&key.company, key.year, key.month, key.tax_type)?;
        let fetched_count = fetched.len();

        let mut documents: Vec<TaxDocument> = fetched
            .into_iter()
            .filter(|doc| belongs_to(doc, key))
            .collect();

        if key.tax_type == TaxType::Ppn {
            drop_superseded_invoices(&mut documents);
        }

        tracing::debug!(
            period = %key,
            fetched = fetched_count,
            selected = documents.len(),
            "selected tax documents"
        );
        Ok(documents)
    }
}

fn belongs_to(doc: &TaxDocument, key: &PeriodKey) -> bool {
    doc.status.is_posted()
        && doc.company == key.company
        && doc.tax_type() == key.tax_type
        && key.contains(doc.posting_date)
}

/// Remove Sales Invoices whose E-Faktur is also in the selection.
fn drop_superseded_invoices(documents: &mut Vec<TaxDocument>) {
    let covered: HashSet<String> = documents
        .iter()
        .filter(|d| d.doc_type == DocumentType::EFaktur)
        .filter_map(|d| d.reference.clone())
        .collect();
    if covered.is_empty() {
        return;
    }
    documents
        .retain(|d| !(d.doc_type == DocumentType::SalesInvoice && covered.contains(&d.doc_id)));
}
