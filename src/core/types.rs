use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Indonesian tax regimes covered by periodic (masa) reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaxType {
    /// Pajak Pertambahan Nilai: Value-added tax.
    #[serde(rename = "PPN")]
    Ppn,
    /// PPh Pasal 21: Employee income tax withheld via payroll.
    #[serde(rename = "PPh 21")]
    Pph21,
    /// PPh Pasal 23: Withholding on services and rent.
    #[serde(rename = "PPh 23")]
    Pph23,
    /// PPh Pasal 26: Withholding on payments to non-residents.
    #[serde(rename = "PPh 26")]
    Pph26,
}

impl TaxType {
    pub const ALL: [TaxType; 4] = [Self::Ppn, Self::Pph21, Self::Pph23, Self::Pph26];

    /// Label used on reports and filters ("PPN", "PPh 21", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ppn => "PPN",
            Self::Pph21 => "PPh 21",
            Self::Pph23 => "PPh 23",
            Self::Pph26 => "PPh 26",
        }
    }

    /// Name of the periodic return (jenis pelaporan).
    pub fn filing_label(&self) -> &'static str {
        match self {
            Self::Ppn => "SPT Masa PPN",
            Self::Pph21 => "SPT Masa PPh 21",
            Self::Pph23 => "SPT Masa PPh 23",
            Self::Pph26 => "SPT Masa PPh 26",
        }
    }

    /// Withholding article code as used on E-Bupot ("21", "23", "26").
    pub fn withholding_code(&self) -> Option<&'static str> {
        match self {
            Self::Ppn => None,
            Self::Pph21 => Some("21"),
            Self::Pph23 => Some("23"),
            Self::Pph26 => Some("26"),
        }
    }

    pub fn is_withholding(&self) -> bool {
        !matches!(self, Self::Ppn)
    }

    /// Parse from a report label. Case and surrounding whitespace are ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
    }

    /// Parse from a withholding article code.
    pub fn from_withholding_code(code: &str) -> Option<Self> {
        match code.trim() {
            "21" => Some(Self::Pph21),
            "23" => Some(Self::Pph23),
            "26" => Some(Self::Pph26),
            _ => None,
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which side of the tax position a document contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxFlow {
    /// PPN Keluaran: VAT charged on sales.
    Output,
    /// PPN Masukan: Creditable VAT paid on purchases.
    Input,
    /// Income tax withheld from a counterparty.
    Withheld,
}

/// Upstream document kinds held by the business ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    EFaktur,
    SalesInvoice,
    PurchaseInvoice,
    SalarySlip,
    EBupot23,
    EBupot26,
}

impl DocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::EFaktur => "Efaktur Document",
            Self::SalesInvoice => "Sales Invoice",
            Self::PurchaseInvoice => "Purchase Invoice",
            Self::SalarySlip => "Salary Slip",
            Self::EBupot23 => "Ebupot Document 23",
            Self::EBupot26 => "Ebupot Document 26",
        }
    }

    /// The tax regime this document is reported under.
    pub fn tax_type(&self) -> TaxType {
        match self {
            Self::EFaktur | Self::SalesInvoice | Self::PurchaseInvoice => TaxType::Ppn,
            Self::SalarySlip => TaxType::Pph21,
            Self::EBupot23 => TaxType::Pph23,
            Self::EBupot26 => TaxType::Pph26,
        }
    }

    pub fn flow(&self) -> TaxFlow {
        match self {
            Self::EFaktur | Self::SalesInvoice => TaxFlow::Output,
            Self::PurchaseInvoice => TaxFlow::Input,
            Self::SalarySlip | Self::EBupot23 | Self::EBupot26 => TaxFlow::Withheld,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status of an upstream document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    Draft,
    Submitted,
    Paid,
    /// Included in a submitted SPT.
    Filed,
    Cancelled,
}

impl DocumentStatus {
    /// Whether the document counts toward a period's tax position.
    pub fn is_posted(&self) -> bool {
        matches!(self, Self::Submitted | Self::Paid | Self::Filed)
    }
}

/// Outcome of a period's tax balance on the SPT.
///
/// Sign convention: `balance = output_tax - input_tax` (PPN) or the withheld
/// tax (PPh). A positive balance is owed to the state, a negative balance is
/// carried forward as compensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusSpt {
    #[serde(rename = "Nihil")]
    Nihil,
    /// Underpaid: the balance must be paid.
    #[serde(rename = "Kurang Bayar")]
    KurangBayar,
    /// Overpaid: the balance is compensated in a later period.
    #[serde(rename = "Lebih Bayar")]
    LebihBayar,
}

impl StatusSpt {
    pub fn from_balance(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            Self::KurangBayar
        } else if balance < Decimal::ZERO {
            Self::LebihBayar
        } else {
            Self::Nihil
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Nihil => "Nihil",
            Self::KurangBayar => "Kurang Bayar",
            Self::LebihBayar => "Lebih Bayar",
        }
    }
}

impl fmt::Display for StatusSpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A posted tax-relevant document as read from the business ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxDocument {
    pub doc_type: DocumentType,
    /// Ledger identifier (e.g. "SINV-2024-0012").
    pub doc_id: String,
    pub company: String,
    pub posting_date: NaiveDate,
    /// Customer, supplier or employee name.
    pub party: String,
    /// Tax base: DPP for PPN, gross income (penghasilan bruto) for PPh.
    pub base_amount: Decimal,
    /// PPN charged/credited or PPh withheld.
    pub tax_amount: Decimal,
    pub status: DocumentStatus,
    /// Party NPWP (tax identification number).
    pub npwp: Option<String>,
    /// Nomor faktur pajak, e.g. "010.000-24.00000001".
    pub tax_invoice_number: Option<String>,
    /// Kode jenis transaksi for E-Faktur (defaults to "01").
    pub transaction_code: Option<String>,
    /// Withholding tariff in percent.
    pub rate: Option<Decimal>,
    /// Upstream document this one was generated from.
    pub reference: Option<String>,
}

impl TaxDocument {
    pub fn flow(&self) -> TaxFlow {
        self.doc_type.flow()
    }

    pub fn tax_type(&self) -> TaxType {
        self.doc_type.tax_type()
    }
}
