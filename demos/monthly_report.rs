use chrono::NaiveDate;
use pajak::core::*;
use pajak::filing::MemoryFilingStore;
use pajak::selector::MemoryLedger;
use pajak::service::*;
use rust_decimal_macros::dec;

fn main() {
    let posted = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
    let ledger = MemoryLedger::with_documents([
        TaxDocumentBuilder::new(DocumentType::EFaktur, "EFK-2024-0001", "CompanyA", posted)
            .party("PT Sinar Abadi")
            .npwp("012345678901000")
            .tax_invoice_number("010.000-24.00000001")
            .amounts(dec!(9090909.09), dec!(1000000))
            .build()
            .expect("e-faktur valid"),
        TaxDocumentBuilder::new(DocumentType::PurchaseInvoice, "PINV-2024-0001", "CompanyA", posted)
            .party("PT Pemasok")
            .amounts(dec!(3636363.64), dec!(400000))
            .build()
            .expect("purchase invoice valid"),
    ]);

    let config = ReportingConfig::default().with_today(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
    let service = ReportingService::new(ledger, MemoryFilingStore::new(), config);
    let manager = Caller::new("tax.manager@companya.co.id", [Role::TaxManager]);
    let key = PeriodKey::monthly("CompanyA", 2024, 3, TaxType::Ppn);

    let data = service.get_reporting_data(&key).expect("reporting data");
    println!("{}", data.to_json().expect("json"));

    let id = service.generate_filing(&manager, &key).expect("filing generated");
    service.submit_filing(&manager, &id).expect("filing submitted");
    match service.generate_payment(&manager, &id).expect("payment") {
        SettlementOutcome::Created(entry) => println!(
            "Payment {} for {} due {}",
            entry.reference, entry.amount, entry.due_date
        ),
        other => println!("No payment created: {other:?}"),
    }

    let export = service.export_efaktur(&key).expect("e-faktur export");
    println!("--- {} ---", export.filename);
    print!("{}", export.as_str().expect("utf-8"));
}
