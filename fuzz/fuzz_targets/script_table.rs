#![no_main]

use libfuzzer_sys::fuzz_target;
use fxscope::{decode_table_with, DecodeBudget, DecoderConfig};

fuzz_target!(|data: &[u8]| {
    let config = DecoderConfig::lenient().with_budget(DecodeBudget::new(1024, 0x4000));
    let _ = decode_table_with(data, config);
});
