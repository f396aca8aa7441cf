use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::machine::{Filing, FilingId};
use crate::core::{PajakError, PeriodKey, Result, reference_number};

/// Persistence for filings with optimistic concurrency.
///
/// `update` must fail with [`PajakError::Conflict`] when the stored version
/// differs from the one the caller read, and must bump the version on
/// success. `create` must reject a second live filing for the same key.
pub trait FilingStore: Send + Sync {
    /// The live (non-cancelled) filing for `key`, if any.
    fn get(&self, key: &PeriodKey) -> Result<Option<Filing>>;

    fn get_by_id(&self, id: &FilingId) -> Result<Filing>;

    /// Persist a new filing and return it with its initial version.
    fn create(&self, filing: Filing) -> Result<Filing>;

    /// Replace a stored filing and return it with its new version.
    fn update(&self, filing: Filing) -> Result<Filing>;

    /// Highest sequence number issued under `prefix` in `year`, looking at
    /// filing ids, payment refs and adjustment refs. Cancelled filings count.
    fn last_issued(&self, prefix: &str, year: i32) -> Result<Option<u64>>;
}

impl<T: FilingStore + ?Sized> FilingStore for Arc<T> {
    fn get(&self, key: &PeriodKey) -> Result<Option<Filing>> {
        (**self).get(key)
    }

    fn get_by_id(&self, id: &FilingId) -> Result<Filing> {
        (**self).get_by_id(id)
    }

    fn create(&self, filing: Filing) -> Result<Filing> {
        (**self).create(filing)
    }

    fn update(&self, filing: Filing) -> Result<Filing> {
        (**self).update(filing)
    }

    fn last_issued(&self, prefix: &str, year: i32) -> Result<Option<u64>> {
        (**self).last_issued(prefix, year)
    }
}

#[derive(Debug, Default)]
struct Tables {
    filings: HashMap<FilingId, Filing>,
    /// Live filing per period.
    live: HashMap<PeriodKey, FilingId>,
}

/// In-memory [`FilingStore`].
///
/// Every mutation validates and writes under one write lock, so the
/// version check and the duplicate check cannot race.
#[derive(Debug, Default)]
pub struct MemoryFilingStore {
    tables: RwLock<Tables>,
}

impl MemoryFilingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of filings, cancelled ones included.
    pub fn len(&self) -> usize {
        self.tables.read().filings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All filings for `key`, cancelled ones included, oldest first.
    pub fn history(&self, key: &PeriodKey) -> Vec<Filing> {
        let tables = self.tables.read();
        let mut filings: Vec<Filing> = tables
            .filings
            .values()
            .filter(|f| &f.key == key)
            .cloned()
            .collect();
        filings.sort_by(|a, b| a.created_on.cmp(&b.created_on).then(a.id.cmp(&b.id)));
        filings
    }
}

impl FilingStore for MemoryFilingStore {
    fn get(&self, key: &PeriodKey) -> Result<Option<Filing>> {
        let tables = self.tables.read();
        Ok(tables
            .live
            .get(key)
            .and_then(|id| tables.filings.get(id))
            .cloned())
    }

    fn get_by_id(&self, id: &FilingId) -> Result<Filing> {
        self.tables
            .read()
            .filings
            .get(id)
            .cloned()
            .ok_or_else(|| PajakError::NotFound(format!("filing {id}")))
    }

    fn create(&self, mut filing: Filing) -> Result<Filing> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables.live.get(&filing.key) {
            return Err(PajakError::DuplicateFiling {
                key: filing.key.to_string(),
                existing: existing.to_string(),
            });
        }
        if tables.filings.contains_key(&filing.id) {
            return Err(PajakError::Validation(format!(
                "filing id {} is already in use",
                filing.id
            )));
        }

        filing.version = 1;
        if filing.is_live() {
            tables.live.insert(filing.key.clone(), filing.id.clone());
        }
        tables.filings.insert(filing.id.clone(), filing.clone());
        Ok(filing)
    }

    fn update(&self, mut filing: Filing) -> Result<Filing> {
        let mut tables = self.tables.write();
        let stored = tables
            .filings
            .get(&filing.id)
            .ok_or_else(|| PajakError::NotFound(format!("filing {}", filing.id)))?;
        if stored.version != filing.version {
            return Err(PajakError::Conflict {
                filing: filing.id.to_string(),
                expected: filing.version,
                found: stored.version,
            });
        }
        if stored.key != filing.key {
            return Err(PajakError::Validation(format!(
                "filing {} cannot move to another period",
                filing.id
            )));
        }

        filing.version += 1;
        if !filing.is_live() && tables.live.get(&filing.key) == Some(&filing.id) {
            tables.live.remove(&filing.key);
        }
        tables.filings.insert(filing.id.clone(), filing.clone());
        Ok(filing)
    }

    fn last_issued(&self, prefix: &str, year: i32) -> Result<Option<u64>> {
        let tables = self.tables.read();
        Ok(tables
            .filings
            .values()
            .flat_map(|f| {
                [
                    Some(f.id.as_str()),
                    f.payment_ref.as_deref(),
                    f.adjustment_ref.as_deref(),
                ]
            })
            .flatten()
            .filter_map(|reference| reference_number(prefix, year, reference))
            .max())
    }
}
