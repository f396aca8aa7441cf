use std::sync::Arc;

use chrono::Datelike;

use crate::core::{Result, TaxDocument, TaxType};

/// The business-document ledger the selector reads from.
///
/// Implementations should filter by company, year, optional month and tax
/// type, but the selector re-checks every returned document.
pub trait DocumentSource {
    fn query(
        &self,
        company: &str,
        year: i32,
        month: Option<u32>,
        tax_type: TaxType,
    ) -> Result<Vec<TaxDocument>>;
}

impl<T: DocumentSource + ?Sized> DocumentSource for &T {
    fn query(
        &self,
        company: &str,
        year: i32,
        month: Option<u32>,
        tax_type: TaxType,
    ) -> Result<Vec<TaxDocument>> {
        (**self).query(company, year, month, tax_type)
    }
}

impl<T: DocumentSource + ?Sized> DocumentSource for Arc<T> {
    fn query(
        &self,
        company: &str,
        year: i32,
        month: Option<u32>,
        tax_type: TaxType,
    ) -> Result<Vec<TaxDocument>> {
        (**self).query(company, year, month, tax_type)
    }
}

/// In-memory ledger, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    documents: Vec<TaxDocument>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: impl IntoIterator<Item = TaxDocument>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
        }
    }

    pub fn push(&mut self, document: TaxDocument) {
        self.documents.push(document);
    }

    pub fn documents(&self) -> &[TaxDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Extend<TaxDocument> for MemoryLedger {
    fn extend<I: IntoIterator<Item = TaxDocument>>(&mut self, iter: I) {
        self.documents.extend(iter);
    }
}

impl DocumentSource for MemoryLedger {
    fn query(
        &self,
        company: &str,
        year: i32,
        month: Option<u32>,
        tax_type: TaxType,
    ) -> Result<Vec<TaxDocument>> {
        Ok(self
            .documents
            .iter()
            .filter(|d| d.company == company)
            .filter(|d| d.posting_date.year() == year)
            .filter(|d| month.is_none_or(|m| d.posting_date.month() == m))
            .filter(|d| d.tax_type() == tax_type)
            .cloned()
            .collect())
    }
}
