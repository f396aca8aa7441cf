//! SPT Masa filing lifecycle.
//!
//! A [`Filing`] is generated as Draft from an aggregated period, submitted,
//! and then settled: Kurang Bayar filings get a [`PaymentEntry`], Lebih Bayar
//! filings a [`TaxAdjustmentEntry`]. Cancellation is terminal and frees the
//! period for a new filing.
//!
//! ```text
//! NoFiling ──generate──▶ Draft ──submit──▶ Submitted ──┬─▶ PaymentGenerated
//!                          │                   │       └─▶ AdjustmentGenerated
//!                          └──────cancel───────┴──────────▶ Cancelled
//! ```
//!
//! Each settlement reference is written once. A repeated request returns
//! [`Settlement::AlreadyGenerated`] with the existing reference.
//!
//! # Example
//!
//! ```
//! use pajak::aggregate::PeriodSummary;
//! use pajak::core::*;
//! use pajak::filing::*;
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
//! let summary = PeriodSummary::Ppn {
//!     output_tax: dec!(1000000),
//!     input_tax: dec!(400000),
//!     balance: dec!(600000),
//! };
//! let mut filing = Filing::generate(
//!     FilingId::new("TFS-2024-00001"),
//!     PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn),
//!     &summary,
//!     &[],
//!     today,
//! )
//! .unwrap();
//! filing.submit(today).unwrap();
//!
//! let mut refs = ReferenceSequence::new("PE-", 2024);
//! let payment = filing.generate_payment(today, || refs.next_reference()).unwrap();
//! assert!(payment.is_created());
//! assert_eq!(filing.payment_ref.as_deref(), Some("PE-2024-00001"));
//! ```

mod config;
mod machine;
mod settlement;
mod store;

pub use config::{FilingConfig, FilingConfigBuilder};
pub use machine::{Filing, FilingId, FilingStage, FilingStatus, SourceDocument};
pub use settlement::{
    ADJUSTMENT_KIND, COMPENSATION_MODE, PaymentEntry, Settlement, TaxAdjustmentEntry,
    adjustment_tax_base, payment_due_date,
};
pub use store::{FilingStore, MemoryFilingStore};
