//! Integration tests for tree construction from whole documents.
//!
//! These exercise the documented traversal idioms end to end: repeated
//! siblings, same-name nesting, mixed content, attributes, and the fatal
//! well-formedness conditions.

#![allow(clippy::unwrap_used)]

use simplexml::{parse_str, Value};

const STORE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<store>
    <product category="Vehicles">
        <name>Car</name>
        <price>$5,000</price>
    </product>
    <product category="Electronics">
        <name>Video Game Console</name>
        <price>$250</price>
    </product>
</store>"#;

#[test]
fn test_store_traversal() {
    let store = parse_str(STORE).unwrap();
    assert_eq!(store.tag(), "store");

    let products = store.children("product");
    assert_eq!(products.len(), 2);

    assert_eq!(products[0].children("name")[0].text(), "Car");
    assert_eq!(products[0].children("price")[0].text(), "$5,000");
    assert_eq!(products[1].children("name")[0].text(), "Video Game Console");

    let categories: Vec<_> = products
        .iter()
        .filter_map(|p| p.attribute("category"))
        .collect();
    assert_eq!(categories, ["Vehicles", "Electronics"]);
}

#[test]
fn test_child_count_matches_document() {
    // Direct children under a given tag equal the matching start/end pairs
    // at that position, in document order.
    let root = parse_str("<r><a i='1'/><b/><a i='2'/><a i='3'/></r>").unwrap();
    assert_eq!(root.children("a").len(), 3);
    assert_eq!(root.children("b").len(), 1);
    let order: Vec<_> = root
        .children("a")
        .iter()
        .map(|n| n.attribute("i").unwrap())
        .collect();
    assert_eq!(order, ["1", "2", "3"]);
}

#[test]
fn test_sibling_subtrees_are_independent() {
    let root = parse_str("<r><a><b/></a><a><b/></a></r>").unwrap();
    let a = root.children("a");
    assert_eq!(a.len(), 2);
    assert_eq!(a[0].children("b").len(), 1);
    assert_eq!(a[1].children("b").len(), 1);
}

#[test]
fn test_same_name_nesting() {
    let root = parse_str("<a><a><a/></a></a>").unwrap();
    assert_eq!(root.tag(), "a");
    let middle = &root.children("a")[0];
    let inner = &middle.children("a")[0];
    assert_eq!(middle.children("a").len(), 1);
    assert!(!inner.has_children());
}

#[test]
fn test_same_name_deep_and_wide() {
    // Same tag simultaneously open along the ancestor chain and recurring
    // across sibling subtrees.
    let root = parse_str(
        "<item><item><item>x</item></item><item>y</item></item>",
    )
    .unwrap();
    let outer = root.children("item");
    assert_eq!(outer.len(), 2);
    assert_eq!(outer[0].children("item")[0].text(), "x");
    assert_eq!(outer[1].text(), "y");
}

#[test]
fn test_mixed_content_isolation() {
    let p = parse_str("<p>Hello<b>World</b></p>").unwrap();
    assert_eq!(p.text(), "Hello");
    assert_eq!(p.children("b")[0].text(), "World");
    let children: Vec<_> = p.child_nodes().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].tag(), "b");
}

#[test]
fn test_attribute_access() {
    let product = parse_str(r#"<product category="Vehicles"/>"#).unwrap();
    assert!(product.has_attribute("category"));
    assert_eq!(product.attribute("category"), Some("Vehicles"));
    assert!(!product.has_attribute("missing"));
}

#[test]
fn test_absent_children_yield_empty_slice() {
    let root = parse_str("<r/>").unwrap();
    assert!(root.children("missing").is_empty());
    assert!(root.child("missing").is_none());
    assert!(!root.has_child("missing"));
    assert!(!root.has_children());
}

#[test]
fn test_display_and_value_on_parsed_nodes() {
    let config = parse_str(
        "<config><id>1450060</id><name>Project Alpha</name><version>2.70</version><tested>true</tested></config>",
    )
    .unwrap();
    assert_eq!(config.children("id")[0].value().unwrap(), Value::Int(1_450_060));
    assert_eq!(
        config.children("name")[0].value().unwrap(),
        Value::Text("Project Alpha".to_string())
    );
    assert_eq!(config.children("version")[0].value().unwrap(), Value::Float(2.7));
    assert_eq!(config.children("tested")[0].value().unwrap(), Value::Bool(true));
    assert_eq!(config.children("name")[0].to_string(), "Project Alpha");
}

#[test]
fn test_whitespace_around_leaf_text_is_trimmed_on_access() {
    let root = parse_str("<a>\n    padded   \n</a>").unwrap();
    assert_eq!(root.text(), "padded");
    assert_eq!(root.raw_text(), "\n    padded   \n");
}

#[test]
fn test_entities_and_cdata_in_text() {
    let root = parse_str("<a>1 &lt; 2 &amp; <![CDATA[<raw>]]></a>").unwrap();
    assert_eq!(root.text(), "1 < 2 & <raw>");
}

#[test]
fn test_comments_and_pis_do_not_appear_in_tree() {
    let root = parse_str("<a><!-- note --><?target data?><b/></a>").unwrap();
    assert_eq!(root.child_nodes().count(), 1);
    assert_eq!(root.text(), "");
}

#[test]
fn test_unicode_names_and_text() {
    let root = parse_str("<caf\u{e9} na\u{ef}ve=\"o\u{f9}i\">\u{3053}\u{3093}\u{306b}\u{3061}\u{306f}</caf\u{e9}>").unwrap();
    assert_eq!(root.tag(), "caf\u{e9}");
    assert_eq!(root.attribute("na\u{ef}ve"), Some("o\u{f9}i"));
    assert_eq!(root.text(), "\u{3053}\u{3093}\u{306b}\u{3061}\u{306f}");
}

// --- Fatal conditions ---

#[test]
fn test_mismatched_tags_abort_without_partial_tree() {
    assert!(parse_str("<a><b></a></b>").is_err());
}

#[test]
fn test_unclosed_element_is_fatal() {
    assert!(parse_str("<a><b></b>").is_err());
}

#[test]
fn test_two_roots_are_fatal() {
    assert!(parse_str("<a/><b/>").is_err());
}

#[test]
fn test_error_reports_location() {
    let err = parse_str("<a>\n<b></c></b></a>").unwrap_err();
    assert_eq!(err.location.line, 2);
    assert!(err.to_string().contains("parse error at 2:"));
}
