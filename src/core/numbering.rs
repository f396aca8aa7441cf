use chrono::{Datelike, NaiveDate};

/// Reference number sequence for filings and settlement entries.
///
/// Generates references in the format `{prefix}{year}-{sequential}`,
/// e.g. "PE-2024-00001", "PE-2024-00002". The counter restarts at 1
/// for each new year.
#[derive(Debug, Clone)]
pub struct ReferenceSequence {
    prefix: String,
    year: i32,
    next_number: u64,
}

impl ReferenceSequence {
    /// Create a new sequence starting at 1.
    pub fn new(prefix: impl Into<String>, year: i32) -> Self {
        Self {
            prefix: prefix.into(),
            year,
            next_number: 1,
        }
    }

    /// Issue the next reference.
    pub fn next_reference(&mut self) -> String {
        let reference = format_reference(&self.prefix, self.year, self.next_number);
        self.next_number += 1;
        reference
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Continue after `issued` if it is at or beyond the current position.
    ///
    /// Used to resume from numbers already persisted elsewhere.
    pub fn skip_past(&mut self, issued: u64) {
        self.next_number = self.next_number.max(issued.saturating_add(1));
    }

    /// Advance the year if `date` lies in a later year. Returns true if advanced.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        let date_year = date.year();
        if date_year > self.year {
            self.year = date_year;
            self.next_number = 1;
            true
        } else {
            false
        }
    }
}

fn format_reference(prefix: &str, year: i32, number: u64) -> String {
    format!("{prefix}{year}-{number:05}")
}

/// Sequence number of `reference` if it was issued under `prefix` in `year`.
///
/// ```
/// use pajak::core::reference_number;
///
/// assert_eq!(reference_number("PE-", 2024, "PE-2024-00042"), Some(42));
/// assert_eq!(reference_number("PE-", 2025, "PE-2024-00042"), None);
/// assert_eq!(reference_number("PE-", 2024, "TAE-2024-00042"), None);
/// ```
pub fn reference_number(prefix: &str, year: i32, reference: &str) -> Option<u64> {
    let rest = reference.strip_prefix(prefix)?;
    let (ref_year, number) = rest.split_once('-')?;
    if ref_year.parse::<i32>().ok()? != year {
        return None;
    }
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}
