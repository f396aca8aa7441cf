//! E-Bupot CSV export.
//!
//! Renders PPh 21/23/26 withholding documents (bukti potong) into the
//! nine-column upload layout of the E-Bupot portal.

mod csv_export;

use crate::core::{PajakError, PeriodKey, Result, TaxDocument};
use crate::export::{ExportFile, period_stem};

pub use csv_export::{EBUPOT_HEADER, to_ebupot_csv};

/// `ebupot_{code}_{company}_{year}{MM}.csv`, MM omitted for a whole year.
pub fn ebupot_file_name(key: &PeriodKey) -> Result<String> {
    let code = key.tax_type.withholding_code().ok_or_else(|| {
        PajakError::Validation(format!(
            "tax_type: E-Bupot covers withholding taxes only, got {}",
            key.tax_type
        ))
    })?;
    Ok(format!("ebupot_{code}_{}.csv", period_stem(key)))
}

/// Render `documents` for the key's tax type and month.
pub fn to_ebupot_file(key: &PeriodKey, documents: &[TaxDocument]) -> Result<ExportFile> {
    Ok(ExportFile {
        filename: ebupot_file_name(key)?,
        content: to_ebupot_csv(documents, key.tax_type, key.month)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaxType;

    #[test]
    fn file_names() {
        let key = PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Pph23);
        assert_eq!(ebupot_file_name(&key).unwrap(), "ebupot_23_CompanyA_202403.csv");
        assert_eq!(
            ebupot_file_name(&key.with_month(None)).unwrap(),
            "ebupot_23_CompanyA_2024.csv"
        );
        assert!(ebupot_file_name(&key.with_tax_type(TaxType::Ppn)).is_err());
    }
}
