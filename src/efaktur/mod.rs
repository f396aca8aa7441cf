//! E-Faktur CSV export.
//!
//! Renders PPN documents into the fixed ten-column upload layout of the
//! E-Faktur portal. Amounts are plain decimals with two places, dates are
//! `dd-mm-yyyy`, and a missing NPWP is rendered as fifteen zeros.
//!
//! # Example
//!
//! ```
//! use pajak::core::*;
//! use pajak::efaktur::*;
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let doc = TaxDocumentBuilder::new(
//!     DocumentType::EFaktur,
//!     "EFK-0001",
//!     "CompanyA",
//!     NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
//! )
//! .party("PT Pelanggan")
//! .amounts(dec!(1000000), dec!(110000))
//! .build()
//! .unwrap();
//!
//! let key = PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn);
//! let file = to_efaktur_file(&key, &[doc]).unwrap();
//! assert_eq!(file.filename, "efaktur_CompanyA_202403.csv");
//! assert!(file.as_str().unwrap().contains("1000000.00,110000.00"));
//! ```

mod csv_export;

use crate::core::{PeriodKey, Result, TaxDocument};
use crate::export::{ExportFile, period_stem};

pub use csv_export::{DEFAULT_TRANSACTION_CODE, EFAKTUR_HEADER, to_efaktur_csv};

/// `efaktur_{company}_{year}{MM}.csv`, MM omitted for a whole year.
pub fn efaktur_file_name(key: &PeriodKey) -> String {
    format!("efaktur_{}.csv", period_stem(key))
}

/// Render `documents` and name the file after `key`.
pub fn to_efaktur_file(key: &PeriodKey, documents: &[TaxDocument]) -> Result<ExportFile> {
    Ok(ExportFile {
        filename: efaktur_file_name(key),
        content: to_efaktur_csv(documents)?,
    })
}
