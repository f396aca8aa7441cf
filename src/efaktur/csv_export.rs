use chrono::Datelike;

use crate::core::money::plain_amount;
use crate::core::{PajakError, Result, TaxDocument, TaxType, masa};
use crate::export::{finish, npwp_or_empty, portal_date, writer};

/// Column header of the E-Faktur upload file.
pub const EFAKTUR_HEADER: [&str; 10] = [
    "Kode Jenis Transaksi",
    "Nomor Faktur",
    "Masa Pajak",
    "Tahun Pajak",
    "Tanggal Faktur",
    "NPWP",
    "Nama",
    "Jumlah DPP",
    "Jumlah PPN",
    "Referensi",
];

/// Kode jenis transaksi used when a document carries none.
pub const DEFAULT_TRANSACTION_CODE: &str = "01";

/// Render PPN documents as E-Faktur CSV, one row per document in input order.
///
/// An empty slice yields the header row only. Documents of another tax type
/// are rejected.
pub fn to_efaktur_csv(documents: &[TaxDocument]) -> Result<Vec<u8>> {
    if let Some(doc) = documents.iter().find(|d| d.tax_type() != TaxType::Ppn) {
        return Err(PajakError::Validation(format!(
            "{} {} is not a PPN document",
            doc.doc_type, doc.doc_id
        )));
    }

    let mut csv = writer();
    csv.write_record(EFAKTUR_HEADER)?;
    for doc in documents {
        csv.write_record([
            doc.transaction_code
                .as_deref()
                .unwrap_or(DEFAULT_TRANSACTION_CODE),
            doc.tax_invoice_number.as_deref().unwrap_or(""),
            masa(doc.posting_date.month()).as_str(),
            doc.posting_date.year().to_string().as_str(),
            portal_date(doc.posting_date).as_str(),
            npwp_or_empty(doc.npwp.as_deref()),
            doc.party.as_str(),
            plain_amount(doc.base_amount).as_str(),
            plain_amount(doc.tax_amount).as_str(),
            doc.doc_id.as_str(),
        ])?;
    }
    finish(csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn header_only_for_empty_input() {
        let out = to_efaktur_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Kode Jenis Transaksi,Nomor Faktur,Masa Pajak,Tahun Pajak,Tanggal Faktur,NPWP,Nama,Jumlah DPP,Jumlah PPN,Referensi\r\n"
        );
    }

    #[test]
    fn quotes_names_with_commas() {
        let doc = TaxDocumentBuilder::new(
            DocumentType::EFaktur,
            "EFK-1",
            "A",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        )
        .party("Maju, Jaya")
        .amounts(dec!(1000), dec!(110))
        .build()
        .unwrap();
        let out = String::from_utf8(to_efaktur_csv(&[doc]).unwrap()).unwrap();
        let row = out.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "01,,03,2024,05-03-2024,000000000000000,\"Maju, Jaya\",1000.00,110.00,EFK-1"
        );
    }

    #[test]
    fn rejects_withholding_documents() {
        let doc = TaxDocumentBuilder::new(
            DocumentType::EBupot23,
            "BP-1",
            "A",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        )
        .build()
        .unwrap();
        assert!(matches!(
            to_efaktur_csv(&[doc]),
            Err(PajakError::Validation(_))
        ));
    }
}
