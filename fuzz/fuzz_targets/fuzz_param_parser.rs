#![no_main]

use libfuzzer_sys::fuzz_target;
use nmrscan::params::{parse_bytes, ParamResolver};
use nmrscan::title::TitleAnnotation;

fuzz_target!(|data: &[u8]| {
    // Parameter files come straight from instruments: parsing may fail but must
    // never panic
    if let Ok(params) = parse_bytes(data.to_vec()) {
        let resolver = ParamResolver::default();
        for name in ["PULPROG", "SFO1", "D20", "P30", "PL1"] {
            let _ = resolver.resolve_in(name, &params);
        }
    }

    // Title files are free text
    let _ = TitleAnnotation::parse(&String::from_utf8_lossy(data));
});
