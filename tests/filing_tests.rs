//! Filing lifecycle against the in-memory store.
//!
//! Run with: `cargo test --test filing_tests`

#![cfg(feature = "filing")]

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use pajak::aggregate::{PeriodSummary, aggregate};
use pajak::core::*;
use pajak::filing::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn march_key() -> PeriodKey {
    PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn)
}

fn march_documents() -> Vec<TaxDocument> {
    vec![
        TaxDocumentBuilder::new(DocumentType::EFaktur, "EFK-1", "CompanyA", date(2024, 3, 4))
            .amounts(dec!(9090909.09), dec!(1000000))
            .build()
            .unwrap(),
        TaxDocumentBuilder::new(DocumentType::PurchaseInvoice, "PINV-1", "CompanyA", date(2024, 3, 9))
            .amounts(dec!(3636363.64), dec!(400000))
            .build()
            .unwrap(),
    ]
}

fn stored_submitted(store: &MemoryFilingStore, summary: &PeriodSummary) -> Filing {
    let filing = Filing::generate(
        FilingId::new("TFS-2024-00001"),
        march_key(),
        summary,
        &march_documents(),
        date(2024, 4, 5),
    )
    .unwrap();
    let mut filing = store.create(filing).unwrap();
    filing.submit(date(2024, 4, 6)).unwrap();
    store.update(filing).unwrap()
}

#[test]
fn duplicate_generate_leaves_one_filing() {
    let store = MemoryFilingStore::new();
    let summary = aggregate(&march_documents(), TaxType::Ppn).unwrap();
    let first = Filing::generate(FilingId::new("TFS-1"), march_key(), &summary, &[], date(2024, 4, 5)).unwrap();
    let second = Filing::generate(FilingId::new("TFS-2"), march_key(), &summary, &[], date(2024, 4, 5)).unwrap();

    store.create(first).unwrap();
    let err = store.create(second).unwrap_err();
    assert!(matches!(err, PajakError::DuplicateFiling { .. }));
    assert_eq!(store.len(), 1);
}

#[test]
fn other_tax_type_same_month_is_a_different_period() {
    let store = MemoryFilingStore::new();
    let ppn = aggregate(&march_documents(), TaxType::Ppn).unwrap();
    store
        .create(Filing::generate(FilingId::new("TFS-1"), march_key(), &ppn, &[], date(2024, 4, 5)).unwrap())
        .unwrap();
    let pph = PeriodSummary::empty(TaxType::Pph21);
    store
        .create(
            Filing::generate(
                FilingId::new("TFS-2"),
                march_key().with_tax_type(TaxType::Pph21),
                &pph,
                &[],
                date(2024, 4, 5),
            )
            .unwrap(),
        )
        .unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn kurang_bayar_payment_flow() {
    let store = MemoryFilingStore::new();
    let summary = aggregate(&march_documents(), TaxType::Ppn).unwrap();
    let mut filing = stored_submitted(&store, &summary);
    assert_eq!(filing.status_spt, StatusSpt::KurangBayar);
    assert_eq!(filing.source_documents.len(), 2);

    let mut refs = ReferenceSequence::new("PE-", 2024);
    let Settlement::Created(entry) = filing
        .generate_payment(date(2024, 4, 10), || refs.next_reference())
        .unwrap()
    else {
        panic!("expected a payment entry");
    };
    assert_eq!(entry.reference, "PE-2024-00001");
    assert_eq!(entry.amount, dec!(600000));
    assert_eq!(entry.due_date, date(2024, 4, 30));
    assert_eq!(entry.remarks, "Tax payment for SPT Masa PPN 03/2024");

    let stored = store.update(filing).unwrap();
    assert_eq!(stored.payment_ref.as_deref(), Some("PE-2024-00001"));
    assert_eq!(stored.stage(), FilingStage::PaymentGenerated);
    assert!(stored.adjustment_ref.is_none());
}

#[test]
fn lebih_bayar_adjustment_flow() {
    let store = MemoryFilingStore::new();
    let summary = PeriodSummary::Ppn {
        output_tax: dec!(100000),
        input_tax: dec!(210000),
        balance: dec!(-110000),
    };
    let mut filing = stored_submitted(&store, &summary);
    let config = FilingConfigBuilder::new().vat_rate(dec!(11)).build().unwrap();

    let Settlement::Created(entry) = filing
        .generate_adjustment(date(2024, 4, 10), &config, || "TAE-2024-00001".into())
        .unwrap()
    else {
        panic!("expected an adjustment entry");
    };
    assert_eq!(entry.compensation_amount, dec!(110000));
    assert_eq!(entry.adjustment_tax_base, dec!(1000000));
    assert_eq!(entry.compensation_mode, COMPENSATION_MODE);
    assert_eq!(entry.remarks, "Tax compensation from SPT Masa PPN 03/2024");

    let stored = store.update(filing).unwrap();
    assert_eq!(stored.adjustment_ref.as_deref(), Some("TAE-2024-00001"));
    assert!(stored.payment_ref.is_none());
}

#[test]
fn refs_are_write_once_across_store_round_trips() {
    let store = MemoryFilingStore::new();
    let summary = aggregate(&march_documents(), TaxType::Ppn).unwrap();
    let mut filing = stored_submitted(&store, &summary);
    filing.generate_payment(date(2024, 4, 10), || "PE-1".into()).unwrap();
    let stored = store.update(filing).unwrap();

    let mut reread = store.get_by_id(&stored.id).unwrap();
    let again = reread
        .generate_payment(date(2024, 4, 11), || "PE-2".into())
        .unwrap();
    assert_eq!(again, Settlement::AlreadyGenerated("PE-1".into()));
    assert_eq!(reread.payment_ref.as_deref(), Some("PE-1"));
}

#[test]
fn cancelled_filing_allows_regeneration() {
    let store = MemoryFilingStore::new();
    let summary = aggregate(&march_documents(), TaxType::Ppn).unwrap();
    let mut filing = stored_submitted(&store, &summary);
    filing.cancel(date(2024, 4, 7)).unwrap();
    store.update(filing).unwrap();

    let fresh = Filing::generate(FilingId::new("TFS-2024-00002"), march_key(), &summary, &[], date(2024, 4, 8)).unwrap();
    let fresh = store.create(fresh).unwrap();
    assert_eq!(store.get(&march_key()).unwrap().unwrap().id, fresh.id);
    assert_eq!(store.history(&march_key()).len(), 2);
}

#[test]
fn racing_payments_assign_one_reference() {
    let store = Arc::new(MemoryFilingStore::new());
    let summary = aggregate(&march_documents(), TaxType::Ppn).unwrap();
    let id = stored_submitted(&store, &summary).id;

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let store = Arc::clone(&store);
            let id = id.clone();
            thread::spawn(move || {
                let mut filing = store.get_by_id(&id).unwrap();
                let outcome = filing
                    .generate_payment(date(2024, 4, 10), || format!("PE-{n}"))
                    .unwrap();
                match outcome {
                    Settlement::Created(_) => store.update(filing).map(|_| true),
                    Settlement::AlreadyGenerated(_) => Ok(false),
                }
            })
        })
        .collect();

    let mut written = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(true) => written += 1,
            Ok(false) | Err(PajakError::Conflict { .. }) => {}
            Err(other) => panic!("unexpected error {other}"),
        }
    }
    assert_eq!(written, 1);
    assert!(store.get_by_id(&id).unwrap().payment_ref.is_some());
}
