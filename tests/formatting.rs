use kdlite::{format, parse, FormatOptions, KdlDocument, KdlNode, KdlValue, KdlVersion};
use pretty_assertions::assert_eq;

#[test]
fn build_and_format() {
    let mut b = KdlNode::new("b");
    b.children_mut().push(KdlNode::new("c"));
    let mut a = KdlNode::new("a");
    a.children_mut().push(b);

    let mut doc = KdlDocument::new();
    doc.nodes_mut().push(a);
    let fmt = doc.to_string();
    println!("{fmt}");
    assert_eq!(
        fmt,
        r#"a {
    b {
        c
    }
}"#
    );
}

#[test]
fn reformat_matches_source() -> miette::Result<()> {
    let src = "srv {\n    host \"localhost\"\n    port 8080\n}";
    let doc = parse(src)?;
    assert_eq!(doc.nodes().len(), 1);
    let srv = &doc.nodes()[0];
    assert_eq!(srv.name(), "srv");
    assert_eq!(
        srv.child_named("host").and_then(|n| n.first_argument()),
        Some(&KdlValue::from("localhost"))
    );
    assert_eq!(
        srv.child_named("port").and_then(|n| n.first_argument()),
        Some(&KdlValue::Integer(8080))
    );
    assert_eq!(format(&doc, &FormatOptions::default()), src);

    let two_spaces = "srv {\n  host \"localhost\"\n  port 8080\n}";
    assert_eq!(
        format(&parse(two_spaces)?, &FormatOptions::default().indent("  ")),
        two_spaces
    );
    Ok(())
}

#[test]
fn normalizes_layout() -> miette::Result<()> {
    let doc = parse(
        r#"
// comments go away
node   z=1 "arg"   a=2 \
    0x10 /* inline */ 1.5e2 r"raw" {child;}
other; "quoted name" (ty)5
"#,
    )?;
    assert_eq!(
        format(&doc, &FormatOptions::default()),
        "node \"arg\" 16 150.0 \"raw\" a=2 z=1 {\n    child\n}\nother\n\"quoted name\" 5"
    );
    Ok(())
}

#[test]
fn semicolons_and_quoting() -> miette::Result<()> {
    let doc = parse("a 1 { b k=v }\nc")?;
    let options = FormatOptions::default()
        .use_semicolons(true)
        .quote_all_identifiers(true);
    assert_eq!(
        format(&doc, &options),
        "\"a\" 1 {\n    \"b\" \"k\"=\"v\";\n};\n\"c\";"
    );
    Ok(())
}

#[test]
fn string_escapes() -> miette::Result<()> {
    let doc = parse(r#"node "line\nbreak" "tab\t" "quote\"" "back\\slash" "\u{7}" "\u{FEFF}""#)?;
    assert_eq!(
        format(&doc, &FormatOptions::default()),
        r#"node "line\nbreak" "tab\t" "quote\"" "back\\slash" "\u{7}" "\u{feff}""#
    );
    Ok(())
}

#[test]
fn floats() -> miette::Result<()> {
    let doc = parse("n 1.0 0.25 1e10 1.5e-7 -0.0001 2.5e5 #inf -#inf #nan")?;
    assert_eq!(
        format(&doc, &FormatOptions::default()),
        "n 1.0 0.25 1e10 1.5e-7 -0.0001 250000.0 #inf #-inf #nan"
    );
    Ok(())
}

#[test]
fn version_pre_pass() -> miette::Result<()> {
    let v1 = parse("node true null")?;
    assert_eq!(format(&v1, &FormatOptions::default()), "node true null");
    assert_eq!(
        format(&v1, &FormatOptions::default().version(KdlVersion::V2)),
        "/- kdl-version 2\nnode #true #null"
    );

    let reserved = parse("/- kdl-version 2\nouter {\n    false #false\n}")?;
    let formatted = format(&reserved, &FormatOptions::default());
    assert_eq!(formatted, "/- kdl-version 2\nouter {\n    false #false\n}");
    assert_eq!(parse(&formatted)?, reserved);

    assert_eq!(
        format(&reserved, &FormatOptions::default().version(KdlVersion::V1)),
        "outer {\n    \"false\" false\n}"
    );
    Ok(())
}

#[test]
fn max_line_length_is_ignored() -> miette::Result<()> {
    let doc = parse("node \"a fairly long argument\" \"and another one\"")?;
    let narrow = FormatOptions::default().max_line_length(10);
    assert_eq!(
        format(&doc, &narrow),
        format(&doc, &FormatOptions::default())
    );
    Ok(())
}

#[test]
fn node_display() -> miette::Result<()> {
    let doc = parse("(t)parent a=1 { child }")?;
    assert_eq!(doc.nodes()[0].to_string(), "(t)parent a=1 {\n    child\n}");
    Ok(())
}
