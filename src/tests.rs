use pretty_assertions::assert_eq;

use crate::parser::dollars::Segment;
use crate::*;

mod api;
mod dollars;
mod pathological;
mod rst;

#[track_caller]
fn compare_strs(output: &str, expected: &str, kind: &str, original_input: &str) {
    if output != expected {
        println!("Running {} test", kind);
        println!("Got:");
        println!("==============================");
        println!("{}", output);
        println!("==============================");
        println!();
        println!("Expected:");
        println!("==============================");
        println!("{}", expected);
        println!("==============================");
        println!();
        println!("Input:");
        println!("{}", original_input);
    }
    assert_eq!(output, expected);
}

#[track_caller]
fn rst(input: &str, expected: &str) {
    rst_opts_i(input, expected, |_| ());
}

#[track_caller]
fn rst_opts_i<F>(input: &str, expected: &str, opts: F)
where
    F: FnOnce(&mut Options),
{
    let mut options = Options::default();
    opts(&mut options);

    let output = dollars_to_rst(input, &options);
    compare_strs(&output, expected, "rst", input);
}

macro_rules! rst_opts {
    ([$($optclass:ident.$optname:ident),*], $lhs:expr, $rhs:expr) => {
        crate::tests::rst_opts_i($lhs, $rhs, |opts| {
            $(opts.$optclass.$optname = true;)*
        })
    };
    ([$($optclass:ident.$optname:ident = $val:expr),*], $lhs:expr, $rhs:expr) => {
        crate::tests::rst_opts_i($lhs, $rhs, |opts| {
            $(opts.$optclass.$optname = $val;)*
        })
    };
}
pub(crate) use rst_opts;

#[track_caller]
fn xml(input: &str, expected: &str) {
    xml_opts_i(input, expected, |_| ());
}

#[track_caller]
fn xml_opts_i<F>(input: &str, expected: &str, opts: F)
where
    F: FnOnce(&mut Options),
{
    let mut options = Options::default();
    opts(&mut options);

    let output = dollars_to_xml(input, &options);
    compare_strs(&output, expected, "xml", input);
}

/// Segments in a compact form: `kind(content)` for each, concatenated.
fn show(segments: &[Segment<'_>]) -> String {
    segments
        .iter()
        .map(|s| format!("{}({})", s.kind, s.content))
        .collect()
}

#[track_caller]
fn segments(input: &str, expected: &str) {
    let output = show(&split_dollars(input));
    compare_strs(&output, expected, "segments", input);
}

fn reconstruct(input: &str) -> String {
    scan(input).map(|s| s.source(input).to_string()).collect()
}
