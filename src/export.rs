//! Shared pieces of the portal CSV exports.
//!
//! Both formats are comma separated with minimal quoting and CRLF line
//! endings, always start with a header row, and keep rows in input order.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{PajakError, PeriodKey, Result};

/// NPWP rendered when a party has none on record.
pub const EMPTY_NPWP: &str = "000000000000000";

/// A rendered export payload and the file name to deliver it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub filename: String,
    pub content: Vec<u8>,
}

impl ExportFile {
    /// Content as UTF-8 text.
    pub fn as_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.content).map_err(|e| PajakError::Export(e.to_string()))
    }
}

pub(crate) fn writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new())
}

pub(crate) fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| PajakError::Export(e.error().to_string()))
}

/// Portal date format (`dd-mm-yyyy`).
pub(crate) fn portal_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub(crate) fn npwp_or_empty(npwp: Option<&str>) -> &str {
    match npwp.map(str::trim) {
        Some(n) if !n.is_empty() => n,
        _ => EMPTY_NPWP,
    }
}

/// `{company}_{year}{MM}` with the company reduced to filename-safe characters.
pub(crate) fn period_stem(key: &PeriodKey) -> String {
    let company: String = key
        .company
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{company}_{}{}", key.year, key.masa().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaxType;

    #[test]
    fn stem_is_filename_safe() {
        let key = PeriodKey::monthly("PT Maju Jaya / Cabang", 2024, 3, TaxType::Ppn);
        assert_eq!(period_stem(&key), "PT_Maju_Jaya___Cabang_202403");
        assert_eq!(period_stem(&key.with_month(None)), "PT_Maju_Jaya___Cabang_2024");
    }

    #[test]
    fn blank_npwp_becomes_zeros() {
        assert_eq!(npwp_or_empty(None), EMPTY_NPWP);
        assert_eq!(npwp_or_empty(Some("  ")), EMPTY_NPWP);
        assert_eq!(npwp_or_empty(Some("012345678901000")), "012345678901000");
    }

    #[test]
    fn portal_date_is_day_first() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(portal_date(d), "05-03-2024");
    }
}
