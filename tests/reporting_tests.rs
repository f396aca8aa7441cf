//! Selection and aggregation over a ledger.
//!
//! Run with: `cargo test --test reporting_tests`

#![cfg(feature = "core")]

use chrono::NaiveDate;
use pajak::aggregate::*;
use pajak::core::*;
use pajak::selector::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn doc(doc_type: DocumentType, id: &str, posted: NaiveDate, base: Decimal, tax: Decimal) -> TaxDocument {
    TaxDocumentBuilder::new(doc_type, id, "CompanyA", posted)
        .amounts(base, tax)
        .build()
        .unwrap()
}

fn company_ledger() -> MemoryLedger {
    let mut ledger = MemoryLedger::new();
    ledger.extend([
        doc(DocumentType::EFaktur, "EFK-0301", date(2024, 3, 4), dec!(9090909.09), dec!(1000000)),
        doc(DocumentType::PurchaseInvoice, "PINV-0301", date(2024, 3, 20), dec!(3636363.64), dec!(400000)),
        doc(DocumentType::EFaktur, "EFK-0401", date(2024, 4, 2), dec!(1000000), dec!(110000)),
        doc(DocumentType::SalarySlip, "SAL-0301", date(2024, 3, 25), dec!(12000000), dec!(600000)),
        doc(DocumentType::SalarySlip, "SAL-0302", date(2024, 3, 25), dec!(8000000), dec!(250000)),
        doc(DocumentType::EBupot23, "BP23-0301", date(2024, 3, 11), dec!(5000000), dec!(100000)),
    ]);
    ledger.push(
        TaxDocumentBuilder::new(DocumentType::PurchaseInvoice, "PINV-DRAFT", "CompanyA", date(2024, 3, 21))
            .amounts(dec!(100), dec!(11))
            .status(DocumentStatus::Draft)
            .build()
            .unwrap(),
    );
    ledger.push(
        TaxDocumentBuilder::new(DocumentType::EFaktur, "EFK-B", "CompanyB", date(2024, 3, 4))
            .amounts(dec!(100), dec!(11))
            .build()
            .unwrap(),
    );
    ledger
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[test]
fn ppn_march_selection() {
    let selector = DocumentSelector::new(company_ledger());
    let docs = selector
        .select(&PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn))
        .unwrap();
    let ids: Vec<_> = docs.iter().map(|d| d.doc_id.as_str()).collect();
    assert_eq!(ids, ["EFK-0301", "PINV-0301"]);
}

#[test]
fn pph21_selects_salary_slips_only() {
    let selector = DocumentSelector::new(company_ledger());
    let docs = selector
        .select(&PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Pph21))
        .unwrap();
    assert_eq!(docs.len(), 2);
    assert!(docs.iter().all(|d| d.doc_type == DocumentType::SalarySlip));
}

#[test]
fn whole_year_spans_months() {
    let selector = DocumentSelector::new(company_ledger());
    let docs = selector
        .select(&PeriodKey::yearly("CompanyA", 2024, TaxType::Ppn))
        .unwrap();
    assert_eq!(docs.len(), 3);
}

#[test]
fn missing_company_or_bad_year_is_validation_error() {
    let selector = DocumentSelector::new(company_ledger());
    for key in [
        PeriodKey::monthly(" ", 2024, 3, TaxType::Ppn),
        PeriodKey::monthly("CompanyA", 1999, 3, TaxType::Ppn),
        PeriodKey::monthly("CompanyA", 2024, 13, TaxType::Ppn),
    ] {
        assert!(matches!(selector.select(&key), Err(PajakError::Validation(_))));
    }
}

#[test]
fn shared_ledger_through_arc() {
    let ledger = std::sync::Arc::new(company_ledger());
    let a = DocumentSelector::new(ledger.clone());
    let b = DocumentSelector::new(ledger);
    let key = PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Pph23);
    assert_eq!(a.select(&key).unwrap(), b.select(&key).unwrap());
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[test]
fn balance_sign_output_exceeds_input_is_kurang_bayar() {
    let docs = [
        doc(DocumentType::EFaktur, "O", date(2024, 3, 1), dec!(1000), dec!(100)),
        doc(DocumentType::PurchaseInvoice, "I", date(2024, 3, 1), dec!(400), dec!(40)),
    ];
    let summary = aggregate(&docs, TaxType::Ppn).unwrap();
    assert_eq!(summary.balance(), dec!(60));
    assert_eq!(summary.status_spt(), StatusSpt::KurangBayar);
}

#[test]
fn balance_sign_input_exceeds_output_is_lebih_bayar() {
    let docs = [
        doc(DocumentType::EFaktur, "O", date(2024, 3, 1), dec!(400), dec!(40)),
        doc(DocumentType::PurchaseInvoice, "I", date(2024, 3, 1), dec!(1000), dec!(100)),
    ];
    let summary = aggregate(&docs, TaxType::Ppn).unwrap();
    assert_eq!(summary.balance(), dec!(-60));
    assert_eq!(summary.status_spt(), StatusSpt::LebihBayar);
}

#[test]
fn selected_march_ppn_summary() {
    let selector = DocumentSelector::new(company_ledger());
    let docs = selector
        .select(&PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn))
        .unwrap();
    assert_eq!(
        aggregate(&docs, TaxType::Ppn).unwrap(),
        PeriodSummary::Ppn {
            output_tax: dec!(1000000),
            input_tax: dec!(400000),
            balance: dec!(600000),
        }
    );
}

#[test]
fn year_overview_matches_monthly_selection() {
    let selector = DocumentSelector::new(company_ledger());
    let overview = year_overview(&selector, "CompanyA", 2024, TaxType::Ppn).unwrap();
    let march = selector
        .select(&PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn))
        .unwrap();
    assert_eq!(overview.months[2].summary, aggregate(&march, TaxType::Ppn).unwrap());
    assert_eq!(overview.total.balance(), dec!(710000));
    let total = overview
        .months
        .iter()
        .try_fold(PeriodSummary::empty(TaxType::Ppn), |acc, m| acc.merge(&m.summary))
        .unwrap();
    assert_eq!(total, overview.total);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn arb_document() -> impl Strategy<Value = TaxDocument> {
    let doc_type = prop_oneof![
        Just(DocumentType::EFaktur),
        Just(DocumentType::SalesInvoice),
        Just(DocumentType::PurchaseInvoice),
        Just(DocumentType::SalarySlip),
        Just(DocumentType::EBupot23),
        Just(DocumentType::EBupot26),
    ];
    (doc_type, 0i64..1_000_000_000, 0i64..100_000_000, 1u32..=28).prop_map(
        |(doc_type, base, tax, day)| {
            doc(
                doc_type,
                "P",
                date(2024, 3, day),
                Decimal::new(base, 2),
                Decimal::new(tax, 2),
            )
        },
    )
}

fn arb_tax_type() -> impl Strategy<Value = TaxType> {
    prop_oneof![
        Just(TaxType::Ppn),
        Just(TaxType::Pph21),
        Just(TaxType::Pph23),
        Just(TaxType::Pph26),
    ]
}

proptest! {
    #[test]
    fn aggregate_is_deterministic(docs in prop::collection::vec(arb_document(), 0..40), tax_type in arb_tax_type()) {
        prop_assert_eq!(aggregate(&docs, tax_type).unwrap(), aggregate(&docs, tax_type).unwrap());
    }

    #[test]
    fn aggregate_ignores_order(docs in prop::collection::vec(arb_document(), 0..40), tax_type in arb_tax_type()) {
        let mut reversed = docs.clone();
        reversed.reverse();
        prop_assert_eq!(aggregate(&docs, tax_type).unwrap(), aggregate(&reversed, tax_type).unwrap());
    }

    #[test]
    fn ppn_balance_is_output_minus_input(docs in prop::collection::vec(arb_document(), 0..40)) {
        match aggregate(&docs, TaxType::Ppn).unwrap() {
            PeriodSummary::Ppn { output_tax, input_tax, balance } => {
                prop_assert_eq!(balance, output_tax - input_tax);
                prop_assert_eq!(StatusSpt::from_balance(balance), aggregate(&docs, TaxType::Ppn).unwrap().status_spt());
            }
            other => prop_assert!(false, "unexpected summary {:?}", other),
        }
    }

    #[test]
    fn split_aggregation_merges_to_whole(
        docs in prop::collection::vec(arb_document(), 0..40),
        split in 0usize..40,
        tax_type in arb_tax_type(),
    ) {
        let at = split.min(docs.len());
        let (head, tail) = docs.split_at(at);
        let merged = aggregate(head, tax_type).unwrap().merge(&aggregate(tail, tax_type).unwrap()).unwrap();
        prop_assert_eq!(merged, aggregate(&docs, tax_type).unwrap());
    }

    #[test]
    fn selection_preserves_ledger_order(docs in prop::collection::vec(arb_document(), 0..40)) {
        let expected: Vec<TaxDocument> = docs
            .iter()
            .filter(|d| d.tax_type() == TaxType::Pph23)
            .cloned()
            .collect();
        let selector = DocumentSelector::new(MemoryLedger::with_documents(docs));
        let selected = selector
            .select(&PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Pph23))
            .unwrap();
        prop_assert_eq!(selected, expected);
    }
}
