use super::*;
use pretty_assertions::assert_eq;
use ntest::timeout;

// input: python3 -c 'n = 100000; print("$" * n)'
#[test]
#[timeout(4000)]
fn pathological_dollars() {
    let input = "$".repeat(100_000);
    let all = split_dollars(&input);
    assert!(all.iter().all(|s| !s.is_math()));
    assert_eq!(reconstruct(&input), input);
}

// Each opener is interrupted by the next one, and none may rescan.
#[test]
#[timeout(4000)]
fn pathological_unclosed_openers() {
    let input = "$a ".repeat(100_000);
    let mut scanned = scan(&input);
    assert_eq!(scanned.by_ref().count(), 1);
    assert_eq!(scanned.diagnostics().len(), 100_000);
}

#[test]
#[timeout(4000)]
fn pathological_braces() {
    let n = 100_000;
    let input = format!("${}x$ {}", "{".repeat(n), "}$".repeat(n));
    assert_eq!(reconstruct(&input), input);
}

#[test]
#[timeout(4000)]
fn pathological_escapes() {
    let input = "\\$".repeat(100_000);
    let all = split_dollars(&input);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].content, "$".repeat(100_000));
}

#[test]
#[timeout(4000)]
fn pathological_inline_blank_lines() {
    let input = "$a\n\n".repeat(50_000);
    let mut scanned = scan(&input);
    assert_eq!(scanned.by_ref().count(), 1);
    assert_eq!(scanned.diagnostics().len(), 50_000);
}

#[test]
#[timeout(4000)]
fn pathological_unmatched_display_openers() {
    let n = 50_000;
    let input = format!("{}{}", "  \\[\nx\n".repeat(n), "\\]\n".repeat(n));
    let output = normalize_display_blocks(&input);
    assert_eq!(output, input);
}

#[test]
#[timeout(4000)]
fn pathological_display_openers_sharing_a_closer() {
    let n = 50_000;
    let input = format!("{}  \\]\n", "\\[\n".repeat(n));
    let output = normalize_display_blocks(&input);
    assert!(output.starts_with("\n.. math::\n\n"));
}

#[test]
#[timeout(4000)]
fn pathological_display_closers() {
    let n = 50_000;
    let input = format!("{}\\[\nx\n\\]\n", "\\]\n".repeat(n));
    let output = normalize_display_blocks(&input);
    assert!(output.ends_with("\n.. math::\n\n   x\n\n\n"));
}

// input: python3 -c 'print(" ".join("`" * i for i in range(1, 200)))'
#[test]
#[timeout(4000)]
fn pathological_backtick_runs() {
    let input: Vec<String> = (1..200).map(|i| "`".repeat(i)).collect();
    let input = input.join(" ");
    let out = dollars_to_rst(&input, &Options::default());
    assert_eq!(out.trim_end(), input);
}

#[test]
#[timeout(4000)]
fn pathological_document() {
    let input = "Price $p$ and `$q$`, $$r$$ and \\$5.\n\n".repeat(20_000);
    let out = dollars_to_rst(&input, &Options::default());
    assert_eq!(out.matches(":math:`p`").count(), 20_000);
    assert_eq!(out.matches(".. math::").count(), 20_000);
}
