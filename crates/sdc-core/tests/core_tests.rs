use sdc_core::{
    ConversionRequest, ConvertError, ConvertOpts, Document, Format, XmlDocument, convert, read,
    write,
};
use serde_json::json;

fn run(src: &std::path::Path, dst: &std::path::Path) -> Result<(), ConvertError> {
    let req = ConversionRequest::new(src, dst)?;
    convert(&req, &ConvertOpts::default())
}

#[test]
fn tree_round_trips_across_json_and_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let value = json!({
        "name": "sdc",
        "count": 3,
        "ratio": 0.25,
        "neg": -7,
        "flags": [true, false, null],
        "nested": {"empty": {}, "list": [], "s": "12"}
    });
    let opts = ConvertOpts::default();
    for (from, to) in [
        (Format::Json, Format::Json),
        (Format::Yaml, Format::Yaml),
        (Format::Json, Format::Yaml),
        (Format::Yaml, Format::Json),
    ] {
        let a = dir.path().join(format!("a.{}", from.extensions()[0]));
        let b = dir.path().join(format!("b.{}", to.extensions()[0]));
        write(&Document::Tree(value.clone()), &a, from, &opts).expect("write source");
        run(&a, &b).expect("convert");
        let back = read(&b, to).expect("read back");
        assert_eq!(back, Document::Tree(value.clone()), "{from} -> {to}");
    }
}

#[test]
fn json_through_yaml_and_back_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.yml");
    let c = dir.path().join("c.json");
    std::fs::write(&a, r#"{"a": 1, "b": [true, null]}"#).unwrap();
    run(&a, &b).unwrap();
    run(&b, &c).unwrap();
    let back: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&c).unwrap()).unwrap();
    assert_eq!(back, json!({"a": 1, "b": [true, null]}));
}

#[test]
fn json_output_uses_four_space_indent() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.yaml");
    let b = dir.path().join("b.json");
    std::fs::write(&a, "k:\n  - 1\n").unwrap();
    run(&a, &b).unwrap();
    assert_eq!(
        std::fs::read_to_string(&b).unwrap(),
        "{\n    \"k\": [\n        1\n    ]\n}\n"
    );
}

#[test]
fn xml_to_xml_keeps_the_dom() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.xml");
    let b = dir.path().join("b.xml");
    std::fs::write(&a, "<root><a>1</a></root>").unwrap();
    run(&a, &b).unwrap();
    let out = XmlDocument::parse(&std::fs::read_to_string(&b).unwrap()).unwrap();
    assert_eq!(out, XmlDocument::parse("<root><a>1</a></root>").unwrap());

    let src = r#"<?xml version="1.0"?>
<library owner="me">
    <book id="1" lang="en">Dune</book>
    <book id="2"><title>Emma</title><!-- classic --></book>
    <shelf/>
</library>
"#;
    std::fs::write(&a, src).unwrap();
    run(&a, &b).unwrap();
    let out = XmlDocument::parse(&std::fs::read_to_string(&b).unwrap()).unwrap();
    assert_eq!(out, XmlDocument::parse(src).unwrap());
    assert_eq!(out.root.attribute("owner"), Some("me"));
}

#[test]
fn xml_to_xml_keeps_text_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.xml");
    let b = dir.path().join("b.xml");
    for src in [
        "<p>Hello <b>world</b> again</p>",
        "<root><a>  1  </a></root>",
        "<root>\n\t<a>x</a>\n</root>",
    ] {
        std::fs::write(&a, src).unwrap();
        run(&a, &b).unwrap();
        let out = std::fs::read_to_string(&b).unwrap();
        assert!(out.contains(src), "{out}");
        assert_eq!(
            XmlDocument::parse(&out).unwrap(),
            XmlDocument::parse(src).unwrap()
        );
    }
}

#[test]
fn json_to_xml_uses_element_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.xml");
    let c = dir.path().join("c.json");
    std::fs::write(&a, r#"{"a": 1, "b": [true, null]}"#).unwrap();
    run(&a, &b).unwrap();
    let xml = std::fs::read_to_string(&b).unwrap();
    assert!(xml.contains("<a>1</a>"), "{xml}");
    assert!(xml.contains("<b/>"), "{xml}");

    // Scalars come back as strings, wrapped in the default root.
    run(&b, &c).unwrap();
    let back: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&c).unwrap()).unwrap();
    assert_eq!(back, json!({"root": {"a": "1", "b": ["true", null]}}));
}

#[test]
fn json_with_invalid_element_names_fails_to_serialize() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.xml");
    std::fs::write(&a, r#"{"1": "x", "two words": 2}"#).unwrap();
    let err = run(&a, &b).unwrap_err();
    assert!(
        matches!(err, ConvertError::Serialize { format: Format::Xml, .. }),
        "{err}"
    );
    assert!(!b.exists());
}

#[test]
fn unsupported_extension_is_rejected_before_io() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.json");
    let err = ConversionRequest::new(dir.path().join("missing.txt"), &out).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));
    assert!(err.to_string().contains(sdc_core::SUPPORTED_FORMATS_MSG));

    let err = ConversionRequest::new(dir.path().join("in.json"), dir.path().join("o.JSON"))
        .unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));
    assert!(!out.exists());
}

#[test]
fn missing_and_malformed_sources_are_read_errors() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.yaml");
    let err = run(&dir.path().join("nope.json"), &out).unwrap_err();
    assert!(matches!(err, ConvertError::Read { .. }), "{err}");

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{\"a\": [1, 2").unwrap();
    let err = run(&bad, &out).unwrap_err();
    assert!(
        matches!(err, ConvertError::Parse { format: Format::Json, .. }),
        "{err}"
    );

    let bad = dir.path().join("bad.xml");
    std::fs::write(&bad, "<a><b></a>").unwrap();
    let err = run(&bad, &out).unwrap_err();
    assert!(
        matches!(err, ConvertError::Parse { format: Format::Xml, .. }),
        "{err}"
    );
    assert!(!out.exists());
}

#[test]
fn unwritable_destination_is_a_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    std::fs::write(&a, "[1, 2]").unwrap();
    let dst = dir.path().join("no-such-dir").join("b.yaml");
    let err = run(&a, &dst).unwrap_err();
    assert!(matches!(err, ConvertError::Write { .. }), "{err}");
}
