#![no_main]

use libfuzzer_sys::fuzz_target;
use pajak::core::PeriodKey;

fuzz_target!(|data: &[u8]| {
    // Validation, date ranges and file names must not panic on any key.
    if let Ok(key) = serde_json::from_slice::<PeriodKey>(data) {
        let _ = key.validate();
        let _ = key.date_range();
        let _ = key.to_string();
        let _ = pajak::efaktur::efaktur_file_name(&key);
        let _ = pajak::ebupot::ebupot_file_name(&key);
        let _ = pajak::filing::payment_due_date(&key);
    }
});
