#![no_main]

use libfuzzer_sys::fuzz_target;

use mathdollar::normalize_display_blocks;

fuzz_target!(|s: &str| {
    let out = normalize_display_blocks(s);
    if !s.contains("\\]") {
        assert_eq!(out, s);
    }
});
