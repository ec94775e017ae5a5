use super::*;
use ntest::test_case;

#[test_case("Hi $x$.\n", "Hi :math:`x`.\n")]
#[test_case("a\n\nb\n", "a\n\nb\n")]
#[test_case("", "")]
#[test_case("Use `$x$`.\n", "Use ``$x$``.\n")]
#[test_case("$a`b$\n", ":math:`a\\`b`\n")]
#[test_case("It costs $5.\n", "It costs $5.\n")]
#[test_case("two\nlines $x$\n", "two\nlines :math:`x`\n")]
fn paragraphs(input: &str, expected: &str) {
    rst(input, expected);
}

#[test_case("a $$x$$ b\n", "a\n\n.. math::\n\n   x\n\nb\n")]
#[test_case("$$x$$\n", ".. math::\n\n   x\n")]
#[test_case("$$\n  a\n  b\n$$\n", ".. math::\n\n     a\n     b\n")]
#[test_case(".. math::\n   :label: eq\n\n   x\n", ".. math::\n   :label: eq\n\n   x\n")]
#[test_case(".. math::\n   :nowrap:\n\n   x\n", ".. math::\n   :nowrap:\n\n   x\n")]
#[test_case(".. math:: x + y\n", ".. math::\n\n   x + y\n")]
fn display_math(input: &str, expected: &str) {
    rst(input, expected);
}

#[test_case("```\n$x$\n```\n", "::\n\n   $x$\n")]
#[test_case("``` python\nx = 1\n\ny = 2\n```\n", ".. code-block:: python\n\n   x = 1\n\n   y = 2\n")]
#[test_case("~~~\nunclosed $x$\n", "::\n\n   unclosed $x$\n")]
#[test_case("```\n```\n", "::\n")]
fn code_blocks(input: &str, expected: &str) {
    rst(input, expected);
}

#[test]
fn bracket_display_blocks() {
    rst(
        "Where\n\\[\nE = mc^2\n\\]\nholds.\n",
        "Where\n\n.. math::\n\n   E = mc^2\n\nholds.\n",
    );
}

#[test]
fn bracket_display_blocks_disabled() {
    rst_opts!(
        [parse.display_blocks = false],
        "\\[\nx\n\\]\n",
        "\\[\nx\n\\]\n"
    );
}

#[test]
fn directive_inside_paragraph() {
    rst(
        "Given\n.. math:: x\n",
        "Given\n\n.. math::\n\n   x\n",
    );
}

#[test]
fn diagnostics_do_not_change_output() {
    rst_opts!(
        [transform.diagnostics],
        "Use `$x$` for $x$ and $5.\n",
        "Use ``$x$`` for :math:`x` and $5.\n"
    );
}
