use std::env;

use super::*;
use pretty_assertions::assert_eq;
use crate::nodes::NodeKind;
use crate::parser::options::DEBUG_ENV_VAR;

#[test]
fn defaults() {
    let options = Options::default();
    assert!(options.parse.display_blocks);
    assert!(!options.transform.diagnostics);
    assert!(!options.render.sourcepos);

    let exclude = &options.transform.exclude;
    for kind in [
        NodeKind::CodeBlock,
        NodeKind::Literal,
        NodeKind::Math,
        NodeKind::MathBlock,
    ] {
        assert!(exclude.contains(kind), "{} should be excluded", kind);
    }
    assert!(!exclude.contains(NodeKind::Paragraph));
    assert!(!exclude.contains(NodeKind::Text));
    assert_eq!(exclude.to_string(), "code_block,math_block,literal,math");
}

#[test]
fn exclusion_set() {
    let mut exclude: ExclusionSet = [NodeKind::Literal].into_iter().collect();
    assert!(exclude.insert(NodeKind::CodeBlock));
    assert!(!exclude.insert(NodeKind::CodeBlock));
    assert!(exclude.remove(NodeKind::Literal));
    assert_eq!(exclude.iter().collect::<Vec<_>>(), vec![NodeKind::CodeBlock]);

    exclude.extend([NodeKind::Math]);
    assert_eq!(exclude.to_string(), "code_block,math");
    assert!(ExclusionSet::empty().is_empty());
    assert_eq!(ExclusionSet::empty().to_string(), "");
}

#[test]
fn node_kind_names() {
    for kind in NodeKind::ALL {
        assert_eq!(kind.name().parse::<NodeKind>().ok(), Some(kind));
    }
    let err = "heading".parse::<NodeKind>().unwrap_err();
    assert!(matches!(err, Error::UnrecognizedNodeKind(ref s) if s == "heading"));
    assert_eq!(err.to_string(), "unrecognized node kind \"heading\"");
}

#[test]
fn debug_env_var() {
    env::set_var(DEBUG_ENV_VAR, "1");
    assert!(Options::from_env().transform.diagnostics);
    env::set_var(DEBUG_ENV_VAR, "");
    assert!(!Transform::from_env().diagnostics);
    env::remove_var(DEBUG_ENV_VAR);
    assert!(!Options::from_env().transform.diagnostics);
}

#[cfg(feature = "bon")]
#[test]
fn builders() {
    let options = Options {
        parse: Parse::builder().display_blocks(false).build(),
        transform: Transform::builder()
            .exclude(ExclusionSet::empty())
            .diagnostics(true)
            .build(),
        render: Render::builder().sourcepos(true).build(),
    };
    assert!(!options.parse.display_blocks);
    assert!(options.transform.exclude.is_empty());
    assert!(options.transform.diagnostics);
    assert!(options.render.sourcepos);

    assert!(Parse::builder().build().display_blocks);
    assert_eq!(Transform::builder().build().exclude, ExclusionSet::default());
}

#[test]
fn thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Options>();
    assert_send_sync::<Segment<'static>>();
    assert_send_sync::<Report>();

    let handles: Vec<_> = ["$a$", "$$b$$", "c"]
        .into_iter()
        .map(|input| std::thread::spawn(move || show(&split_dollars(input))))
        .collect();
    let shown: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(shown, vec!["inline-math(a)", "display-math(b)", "text(c)"]);
}

#[test]
fn exported_entry_points() {
    assert_eq!(
        normalize_display_blocks("\\[\nx\n\\]"),
        "\n.. math::\n\n   x\n\n"
    );
    assert_eq!(scan("$x$").count(), 1);
    assert!(dollars_to_xml("$x$", &Options::default()).contains("<math>"));
    assert_eq!(dollars_to_rst("$x$", &Options::default()), ":math:`x`\n");
}
