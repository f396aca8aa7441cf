//! # pajak
//!
//! Indonesian tax-period reporting: PPN and PPh aggregation per masa pajak,
//! the SPT filing lifecycle with payment and compensation entries, and
//! E-Faktur / E-Bupot CSV export.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pajak::core::*;
//! use pajak::aggregate::aggregate;
//! use pajak::selector::{DocumentSelector, MemoryLedger};
//! use rust_decimal_macros::dec;
//!
//! let posted = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
//! let ledger = MemoryLedger::with_documents([
//!     TaxDocumentBuilder::new(DocumentType::EFaktur, "EFK-1", "CompanyA", posted)
//!         .amounts(dec!(9090909), dec!(1000000))
//!         .build()
//!         .unwrap(),
//!     TaxDocumentBuilder::new(DocumentType::PurchaseInvoice, "PINV-1", "CompanyA", posted)
//!         .amounts(dec!(3636364), dec!(400000))
//!         .build()
//!         .unwrap(),
//! ]);
//!
//! let key = PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn);
//! let docs = DocumentSelector::new(ledger).select(&key).unwrap();
//! let summary = aggregate(&docs, TaxType::Ppn).unwrap();
//!
//! assert_eq!(summary.balance(), dec!(600000));
//! assert_eq!(summary.status_spt(), StatusSpt::KurangBayar);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Document model, period keys, selector, aggregator |
//! | `filing` | SPT filing state machine, settlement entries, filing store |
//! | `efaktur` | E-Faktur CSV export |
//! | `ebupot` | E-Bupot CSV export |
//! | `service` | Boundary operations with role checks |
//! | `all` (default) | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod selector;

#[cfg(feature = "core")]
pub mod aggregate;

#[cfg(feature = "filing")]
pub mod filing;

#[cfg(any(feature = "efaktur", feature = "ebupot"))]
pub mod export;

#[cfg(feature = "efaktur")]
pub mod efaktur;

#[cfg(feature = "ebupot")]
pub mod ebupot;

#[cfg(feature = "service")]
pub mod service;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
