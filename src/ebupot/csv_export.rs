use chrono::Datelike;

use crate::core::money::{derived_rate, plain_amount};
use crate::core::{PajakError, Result, TaxDocument, TaxType, masa};
use crate::export::{finish, npwp_or_empty, writer};

/// Column header of the E-Bupot upload file.
pub const EBUPOT_HEADER: [&str; 9] = [
    "Jenis Pajak",
    "Masa Pajak",
    "Tahun Pajak",
    "NPWP Terpotong",
    "Nama Terpotong",
    "Penghasilan Bruto",
    "Tarif",
    "PPh Dipotong",
    "Referensi",
];

/// Render withholding documents of `tax_type` as E-Bupot CSV.
///
/// Documents of other tax types, or outside `month` when one is given, are
/// left out. The remaining rows keep input order. The tariff comes from the
/// document, or is derived from its amounts when absent.
pub fn to_ebupot_csv(
    documents: &[TaxDocument],
    tax_type: TaxType,
    month: Option<u32>,
) -> Result<Vec<u8>> {
    let Some(code) = tax_type.withholding_code() else {
        return Err(PajakError::Validation(format!(
            "tax_type: E-Bupot covers withholding taxes only, got {tax_type}"
        )));
    };
    if let Some(m) = month {
        if !(1..=12).contains(&m) {
            return Err(PajakError::Validation(format!(
                "month: must be between 1 and 12, got {m}"
            )));
        }
    }

    let mut csv = writer();
    csv.write_record(EBUPOT_HEADER)?;
    let rows = documents
        .iter()
        .filter(|d| d.tax_type() == tax_type)
        .filter(|d| month.is_none_or(|m| d.posting_date.month() == m));
    for doc in rows {
        let rate = match doc.rate {
            Some(rate) => rate,
            None => derived_rate(doc.base_amount, doc.tax_amount)?,
        };
        csv.write_record([
            code,
            masa(doc.posting_date.month()).as_str(),
            doc.posting_date.year().to_string().as_str(),
            npwp_or_empty(doc.npwp.as_deref()),
            doc.party.as_str(),
            plain_amount(doc.base_amount).as_str(),
            plain_amount(rate).as_str(),
            plain_amount(doc.tax_amount).as_str(),
            doc.doc_id.as_str(),
        ])?;
    }
    finish(csv)
}
