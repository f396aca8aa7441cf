#![no_main]

use libfuzzer_sys::fuzz_target;
use pajak::core::{PeriodKey, TaxDocument, TaxType};
use pajak::selector::{DocumentSelector, MemoryLedger};

fuzz_target!(|data: &[u8]| {
    // Any ledger that deserializes must select, aggregate and export without panicking.
    let Ok(docs) = serde_json::from_slice::<Vec<TaxDocument>>(data) else {
        return;
    };
    let Some(company) = docs.first().map(|d| d.company.clone()) else {
        return;
    };
    let selector = DocumentSelector::new(MemoryLedger::with_documents(docs));
    for tax_type in TaxType::ALL {
        let key = PeriodKey::yearly(company.clone(), 2024, tax_type);
        if let Ok(selected) = selector.select(&key) {
            let _ = pajak::aggregate::aggregate(&selected, tax_type);
            let _ = pajak::efaktur::to_efaktur_csv(&selected);
            let _ = pajak::ebupot::to_ebupot_csv(&selected, tax_type, None);
        }
    }
});
