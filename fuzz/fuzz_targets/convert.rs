#![no_main]

use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

use mathdollar::{dollars_to_rst, dollars_to_xml, Options};

#[derive(Arbitrary, Debug)]
struct Input {
    text: String,
    options: Options,
}

fuzz_target!(|input: Input| {
    dollars_to_rst(&input.text, &input.options);
    dollars_to_xml(&input.text, &input.options);
});
