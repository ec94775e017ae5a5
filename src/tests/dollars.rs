use std::borrow::Cow;

use super::*;
use pretty_assertions::assert_eq;
use crate::parser::dollars::{ScanDiagnostic, ScanFailure, DELIMITERS};
use ntest::test_case;

#[test_case("cost is $x+1$ dollars", "text(cost is )inline-math(x+1)text( dollars)")]
#[test_case("$$x^2$$", "display-math(x^2)")]
#[test_case("$\\frac{$}{2}$", "inline-math(\\frac{$}{2})")]
#[test_case("weird $x+1", "text(weird $x+1)")]
#[test_case("a \\$5 b", "text(a $5 b)")]
#[test_case("a $$b$$ c", "text(a )display-math(b)text( c)")]
#[test_case("$a$$b$", "inline-math(a)inline-math(b)")]
#[test_case("$a\\$b$", "inline-math(a\\$b)")]
#[test_case("\\\\$x$", "text(\\\\)inline-math(x)")]
#[test_case("\\alpha $x$", "text(\\alpha )inline-math(x)")]
#[test_case("$$\na\n\nb\n$$", "display-math(\na\n\nb\n)")]
fn math(input: &str, expected: &str) {
    segments(input, expected);
}

#[test_case("It costs $5 and $10.", "text(It costs $5 and $10.)")]
#[test_case("$20,000 and $30,000", "text($20,000 and $30,000)")]
#[test_case("$ x $", "text($ x $)")]
#[test_case("$1$2", "text($1$2)")]
#[test_case("$$$$", "text($$$$)")]
#[test_case("trailing $", "text(trailing $)")]
#[test_case("$x $y$", "text($x )inline-math(y)")]
fn currency(input: &str, expected: &str) {
    segments(input, expected);
}

#[test_case("It costs $5 and $x$ is math.", "text(It costs $5 and )inline-math(x)text( is math.)")]
#[test_case("I paid $5. Let $$x$$ be.", "text(I paid $5. Let )display-math(x)text( be.)")]
#[test_case("$1$2 and $y$", "text($1$2 and )inline-math(y)")]
#[test_case("From $3 to $4, $n$ grows", "text(From $3 to $4, )inline-math(n)text( grows)")]
#[test_case("$5 or ${a$b}$", "text($5 or )inline-math({a$b})")]
fn currency_then_math(input: &str, expected: &str) {
    segments(input, expected);
}

#[test]
fn interrupted_inline_math_is_diagnosed() {
    let mut scanned = scan("It costs $5 and $x$.");
    assert_eq!(scanned.by_ref().count(), 3);
    assert_eq!(
        scanned.diagnostics(),
        &[ScanDiagnostic {
            offset: 9,
            delimiter: "$",
            reason: ScanFailure::Interrupted,
        }]
    );
    assert_eq!(
        scanned.diagnostics()[0].to_string(),
        "`$` opened at byte 9 interrupted by a `$` that cannot close it"
    );
}

#[test]
fn escapes_in_abandoned_math_are_removed() {
    segments("a \\$ b $c \\$ d\n\ne", "text(a $ b $c $ d\n\ne)");
    segments("$a \\$ b", "text($a $ b)");
}

#[test]
fn escapes_in_closed_math_are_kept() {
    segments("\\$ $a\\$b$ \\$", "text($ )inline-math(a\\$b)text( $)");
}

#[test]
fn inline_math_stops_at_blank_line() {
    let mut scanned = scan("$a\n\nb$");
    let all: Vec<_> = scanned.by_ref().collect();
    assert_eq!(show(&all), "text($a\n\nb$)");
    assert_eq!(
        scanned.diagnostics(),
        &[ScanDiagnostic {
            offset: 0,
            delimiter: "$",
            reason: ScanFailure::BlankLine,
        }]
    );
}

#[test]
fn display_math_spans_blank_lines() {
    let mut scanned = scan("$$a\n\nb$$");
    assert_eq!(show(&scanned.by_ref().collect::<Vec<_>>()), "display-math(a\n\nb)");
    assert!(scanned.diagnostics().is_empty());
}

#[test]
fn unterminated_is_diagnosed() {
    let mut scanned = scan("weird $x+1");
    let all: Vec<_> = scanned.by_ref().collect();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].content, "weird $x+1");
    assert_eq!(
        scanned.diagnostics(),
        &[ScanDiagnostic {
            offset: 6,
            delimiter: "$",
            reason: ScanFailure::Unterminated,
        }]
    );
    assert_eq!(
        scanned.diagnostics()[0].to_string(),
        "unterminated `$` opened at byte 6"
    );
}

#[test]
fn unterminated_display() {
    let mut scanned = scan("a $$b $c$");
    assert_eq!(show(&scanned.by_ref().collect::<Vec<_>>()), "text(a $$b $c$)");
    assert_eq!(scanned.diagnostics()[0].delimiter, "$$");
}

#[test]
fn math_directive_is_display_math() {
    segments(".. math::\n\n   x^2\n", "display-math(x^2)text(\n)");
    segments(
        "Area:\n.. math:: a+b\nrest",
        "text(Area:\n)display-math(a+b)text(\nrest)",
    );
    segments(
        ".. math::\n   :label: eq\n\n   a\n\n   b\n",
        "display-math(a\n\nb)text(\n)",
    );
}

#[test]
fn math_directive_needs_content() {
    segments(".. math::\nx\n", "text(.. math::\nx\n)");
    segments("see .. math:: x", "text(see .. math:: x)");
}

#[test]
fn spans_cover_the_input() {
    let input = "a $x$ b $$y$$ c \\$ d $unterminated";
    let all = split_dollars(input);
    let mut expected_start = 0;
    for segment in &all {
        assert_eq!(segment.span.start, expected_start);
        expected_start = segment.span.end;
    }
    assert_eq!(expected_start, input.len());
    assert_eq!(reconstruct(input), input);

    assert_eq!(all[1].source(input), "$x$");
    assert_eq!(all[3].source(input), "$$y$$");
}

#[test]
fn text_is_borrowed_unless_unescaped() {
    let all = split_dollars("plain $x$ text");
    assert!(matches!(all[0].content, Cow::Borrowed("plain ")));
    assert!(matches!(all[1].content, Cow::Borrowed("x")));

    let all = split_dollars("a \\$5");
    assert!(matches!(all[0].content, Cow::Owned(_)));
    assert_eq!(all[0].source("a \\$5"), "a \\$5");
}

#[test]
fn lazy() {
    let input = format!("$x$ {}", "word ".repeat(1000));
    let first = scan(&input).next();
    assert_eq!(first.map(|s| s.kind), Some(SegmentKind::InlineMath));
}

#[test]
fn fused() {
    let mut scanned = scan("a $b$");
    assert_eq!(scanned.by_ref().count(), 2);
    assert_eq!(scanned.next(), None);
    assert_eq!(scanned.next(), None);
}

#[test]
fn empty_input() {
    assert!(split_dollars("").is_empty());
}

#[test]
fn multibyte_text() {
    segments("π ≈ $\\pi$ €", "text(π ≈ )inline-math(\\pi)text( €)");
    segments("€$5 ¢", "text(€$5 ¢)");
}

#[test]
fn segment_kind_names() {
    for kind in [
        SegmentKind::Text,
        SegmentKind::InlineMath,
        SegmentKind::DisplayMath,
    ] {
        assert_eq!(kind.to_string().parse::<SegmentKind>().ok(), Some(kind));
    }
    assert!(!SegmentKind::Text.is_math());
    assert!(SegmentKind::DisplayMath.is_math());

    let err = "block-math".parse::<SegmentKind>().unwrap_err();
    assert!(matches!(err, Error::UnrecognizedSegmentKind(ref s) if s == "block-math"));
}

#[test]
fn delimiter_table() {
    assert_eq!(DELIMITERS[0].open, "$$");
    assert_eq!(DELIMITERS[0].kind, SegmentKind::DisplayMath);
    assert_eq!(DELIMITERS[1].open, "$");
    assert!(DELIMITERS.iter().all(|rule| rule.balanced));
}
