use kdlite::{parse, KdlDocument, KdlValue};
use pretty_assertions::assert_eq;

fn args(doc: &KdlDocument, name: &str) -> Vec<KdlValue> {
    doc.get_args(name).into_iter().cloned().collect()
}

#[test]
fn argument_order_is_kept() -> miette::Result<()> {
    let doc = parse("node \"x\" k=1 \"y\"")?;
    assert_eq!(args(&doc, "node"), vec!["x".into(), "y".into()]);
    let node = doc.node_named("node").expect("node");
    assert_eq!(node.properties().len(), 1);
    assert_eq!(node["k"], KdlValue::Integer(1));
    Ok(())
}

#[test]
fn property_order_does_not_matter() -> miette::Result<()> {
    assert_eq!(parse("n a=1 b=2")?, parse("n b=2 a=1")?);
    assert_ne!(parse("n 1 2")?, parse("n 2 1")?);
    Ok(())
}

#[test]
fn numbers() -> miette::Result<()> {
    let doc = parse("n 0xFF 0o17 0b101 1_000 1.5e2 -0x10 +0b1 0 -0 9223372036854775807")?;
    assert_eq!(
        args(&doc, "n"),
        vec![
            KdlValue::Integer(255),
            KdlValue::Integer(15),
            KdlValue::Integer(5),
            KdlValue::Integer(1000),
            KdlValue::Float(150.0),
            KdlValue::Integer(-16),
            KdlValue::Integer(1),
            KdlValue::Integer(0),
            KdlValue::Integer(0),
            KdlValue::Integer(i64::MAX),
        ]
    );
    assert!(args(&doc, "n")[4].is_float());
    Ok(())
}

#[test]
fn keyword_floats() -> miette::Result<()> {
    let doc = parse("n #inf #-inf +#inf -#inf #nan")?;
    let values = args(&doc, "n");
    assert_eq!(values[0], KdlValue::Float(f64::INFINITY));
    assert_eq!(values[1], KdlValue::Float(f64::NEG_INFINITY));
    assert_eq!(values[2], KdlValue::Float(f64::INFINITY));
    assert_eq!(values[3], KdlValue::Float(f64::NEG_INFINITY));
    assert!(values[4].as_f64().is_some_and(f64::is_nan));
    Ok(())
}

#[test]
fn strings() -> miette::Result<()> {
    let doc = parse(concat!(
        r#"n "plain" "esc\n\t\"\\\s" "\u{48}\u{49}" r"C:\raw" "#,
        r##"r#"with "quotes""# #"v2 raw"# bare-word "ws \   "##,
        "\n   escape\""
    ))?;
    assert_eq!(
        args(&doc, "n"),
        vec![
            KdlValue::from("plain"),
            KdlValue::from("esc\n\t\"\\ "),
            KdlValue::from("HI"),
            KdlValue::from(r"C:\raw"),
            KdlValue::from(r#"with "quotes""#),
            KdlValue::from("v2 raw"),
            KdlValue::from("bare-word"),
            KdlValue::from("ws escape"),
        ]
    );
    Ok(())
}

#[test]
fn multiline_strings() -> miette::Result<()> {
    let doc = parse("n \"\"\"\n  a\n  b\n  \"\"\"")?;
    assert_eq!(doc.get_arg("n"), Some(&"a\nb\n".into()));

    let doc = parse("n \"\"\"\n    first\n      indented\n\n    last\n    \"\"\"")?;
    assert_eq!(
        doc.get_arg("n"),
        Some(&"first\n  indented\n\nlast\n".into())
    );

    let doc = parse("n #\"\"\"\n    raw \\n kept\n    \"\"\"#")?;
    assert_eq!(doc.get_arg("n"), Some(&"raw \\n kept\n".into()));

    let lf = parse("n \"\"\"\n    a\n    b\n    \"\"\"")?;
    let cr = parse("n \"\"\"\r    a\r    b\r    \"\"\"")?;
    let ls = parse("n \"\"\"\u{2028}    a\u{2028}    b\u{2028}    \"\"\"")?;
    assert_eq!(cr, lf);
    assert_eq!(ls, lf);
    assert_eq!(lf.get_arg("n"), Some(&"a\nb\n".into()));

    let raw = parse("n #\"\"\"\r    a\r    \"\"\"#")?;
    assert_eq!(raw.get_arg("n"), Some(&"a\n".into()));
    Ok(())
}

#[test]
fn slashdash() -> miette::Result<()> {
    let doc = parse("a\n/-b\nc")?;
    let names: Vec<_> = doc.nodes().iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["a", "c"]);

    let doc = parse("node \"keep\" /-\"skip\" 1")?;
    assert_eq!(args(&doc, "node"), vec!["keep".into(), KdlValue::Integer(1)]);

    let doc = parse("node /-key=\"gone\" key=\"kept\"")?;
    assert_eq!(doc.node_named("node").expect("node")["key"], "kept".into());

    let doc = parse("/-skipped {\n    with children {\n        deep\n    }\n}\nkept")?;
    assert_eq!(doc.nodes().len(), 1);
    assert_eq!(doc.nodes()[0].name(), "kept");

    let doc = parse("parent {\n    one\n    /-two\n    three\n}")?;
    let children: Vec<_> = doc.nodes()[0]
        .children()
        .iter()
        .map(|n| n.name())
        .collect();
    assert_eq!(children, vec!["one", "three"]);
    Ok(())
}

#[test]
fn comments_and_continuations() -> miette::Result<()> {
    let doc = parse(
        "// leading\nnode 1 /* inline /* nested */ */ 2 \\ // continued\n    3\n/*\nblock\n*/ other",
    )?;
    assert_eq!(
        args(&doc, "node"),
        vec![
            KdlValue::Integer(1),
            KdlValue::Integer(2),
            KdlValue::Integer(3)
        ]
    );
    assert!(doc.node_named("other").is_some());
    Ok(())
}

#[test]
fn unicode_whitespace_and_newlines() -> miette::Result<()> {
    let doc = parse("a\u{3000}1\u{00A0}2\u{2028}b\r\nc\u{0085}d")?;
    assert_eq!(
        args(&doc, "a"),
        vec![KdlValue::Integer(1), KdlValue::Integer(2)]
    );
    let names: Vec<_> = doc.nodes().iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    Ok(())
}

#[test]
fn byte_order_mark() -> miette::Result<()> {
    let doc = parse("\u{FEFF}node 1")?;
    assert_eq!(doc.get_arg("node"), Some(&KdlValue::Integer(1)));
    Ok(())
}

#[test]
fn identifiers() -> miette::Result<()> {
    let doc = parse("-foo; foo.bar; $money; 日本語; +; -; r; _under_")?;
    let names: Vec<_> = doc.nodes().iter().map(|n| n.name()).collect();
    assert_eq!(
        names,
        vec!["-foo", "foo.bar", "$money", "日本語", "+", "-", "r", "_under_"]
    );
    Ok(())
}

#[test]
fn type_annotations() -> miette::Result<()> {
    let doc = parse("(date)when (iso8601)\"2024-01-01\" at=(u16)8080\n( \"spaced ty\" )x")?;
    let when = doc.node_named("when").expect("when");
    assert_eq!(when.ty().map(|t| t.value()), Some("date"));
    assert_eq!(when.first_argument(), Some(&"2024-01-01".into()));
    assert_eq!(when["at"], KdlValue::Integer(8080));
    let x = doc.node_named("x").expect("x");
    assert_eq!(x.ty().map(|t| t.value()), Some("spaced ty"));
    Ok(())
}

#[test]
fn values_accessors() -> miette::Result<()> {
    let doc = parse("n 3 2.9 \"s\" true null")?;
    let values = args(&doc, "n");
    assert_eq!(values[0].as_i64(), Some(3));
    assert_eq!(values[0].as_f64(), Some(3.0));
    assert_eq!(values[1].as_i64(), Some(2));
    assert_eq!(values[2].as_string(), Some("s"));
    assert_eq!(values[3].as_bool(), Some(true));
    assert!(values[4].is_null());
    Ok(())
}
