#![no_main]

use libfuzzer_sys::fuzz_target;

use mathdollar::scan;

fuzz_target!(|s: &str| {
    let mut end = 0;
    let mut segments = scan(s);
    for segment in segments.by_ref() {
        assert_eq!(segment.span.start, end);
        assert!(segment.span.end > end);
        if segment.is_math() {
            assert!(!segment.content.is_empty());
        }
        end = segment.span.end;
    }
    assert_eq!(end, s.len());
    for diagnostic in segments.diagnostics() {
        assert!(s[diagnostic.offset..].starts_with(diagnostic.delimiter));
    }
});
