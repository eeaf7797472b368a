use orders_contract_check::engine::document::{Field, Node};
use orders_contract_check::engine::predicate::*;
use serde_json::{json, Value};

fn present(v: &Value) -> Field<'_> {
    Field::Present(v)
}

#[test]
fn field_lookup_treats_null_and_absent_as_missing() {
    let doc = json!({ "a": null, "zero": 0, "no": false, "empty": "", "list": [] });
    let node = Node::new(&doc);

    assert!(node.field("a").is_missing());
    assert!(node.field("absent").is_missing());
    for name in ["zero", "no", "empty", "list"] {
        assert!(is_present(node.field(name)), "{name} must count as present");
    }

    let scalar = json!(42);
    assert!(Node::new(&scalar).field("a").is_missing());
    assert_eq!(Field::Missing.describe(), "undefined");
    assert_eq!(node.field("empty").describe(), "\"\"");
}

#[test]
fn numeric_predicates_follow_json_number_semantics() {
    assert!(is_positive_integer(present(&json!(1))));
    assert!(is_positive_integer(present(&json!(2.0))));
    assert!(!is_positive_integer(present(&json!(0))));
    assert!(!is_positive_integer(present(&json!(2.5))));
    assert!(!is_positive_integer(present(&json!("3"))));

    assert!(is_non_negative_integer(present(&json!(0))));
    assert!(!is_non_negative_integer(present(&json!(-1))));
    assert!(is_integer(present(&json!(-7))));

    assert!(is_positive_number(present(&json!(0.01))));
    assert!(!is_positive_number(present(&json!(0))));
    assert!(!is_positive_number(present(&json!(true))));
    assert!(!is_positive_number(Field::Missing));
    assert!(is_number(present(&json!(0))));
}

#[test]
fn string_and_enum_predicates() {
    assert!(is_non_empty_string(present(&json!("x"))));
    assert!(!is_non_empty_string(present(&json!(""))));
    assert!(!is_non_empty_string(present(&json!(1))));

    let allowed = ["pending", "shipped"];
    assert!(is_one_of(present(&json!("shipped")), &allowed));
    assert!(!is_one_of(present(&json!("Shipped")), &allowed));
    assert!(!is_one_of(present(&json!(["shipped"])), &allowed));
    assert!(!is_one_of(Field::Missing, &allowed));
}

#[test]
fn timestamps_accept_rfc3339_and_offsetless_iso() {
    for ok in [
        "2024-01-01T00:00:00Z",
        "2025-01-15T10:30:00+02:00",
        "2025-01-15T10:30:00.123Z",
        "2025-01-15T10:30:00",
        "2025-01-15T10:30:00.5",
    ] {
        assert!(is_iso8601_timestamp(present(&json!(ok))), "{ok} should be accepted");
    }
    for bad in [
        "2024-01-01",
        "January 1, 2024",
        "2024-13-01T00:00:00Z",
        "2024-02-30T00:00:00Z",
        "",
        "not a date",
    ] {
        assert!(!is_iso8601_timestamp(present(&json!(bad))), "{bad} should be rejected");
    }
    assert!(!is_iso8601_timestamp(present(&json!(1704067200000u64))));
    assert!(!is_iso8601_timestamp(Field::Missing));
}

#[test]
fn url_strictness_levels_differ() {
    let cases = [
        ("https://cdn.example.com/a.jpg", true, true),
        ("http://localhost:8080/x", true, true),
        ("httpfoo", false, true),
        ("mailto:ops@example.com", false, false),
        ("/relative/path.png", false, false),
        ("", false, false),
    ];
    for (url, absolute, prefix) in cases {
        let v = json!(url);
        assert_eq!(is_well_formed_url(present(&v), UrlStrictness::Absolute), absolute, "{url}");
        assert_eq!(is_well_formed_url(present(&v), UrlStrictness::HttpPrefix), prefix, "{url}");
    }
    assert!(!is_well_formed_url(present(&json!(5)), UrlStrictness::HttpPrefix));
}

#[test]
fn container_predicates() {
    assert!(is_array(present(&json!([]))));
    assert!(!is_non_empty_array(present(&json!([]))));
    assert!(is_non_empty_array(present(&json!([1]))));
    assert!(is_object(present(&json!({}))));
    assert!(!is_object(present(&json!([]))));
    assert!(!is_array(Field::Missing));
}

#[test]
fn out_of_order_detection() {
    let desc = json!([{ "p": 3 }, { "p": 2 }, { "p": 2 }, { "p": 1 }]);
    let items = desc.as_array().unwrap();
    assert_eq!(first_out_of_order(items, "p", Direction::Descending), None);
    assert_eq!(first_out_of_order(items, "p", Direction::Ascending), Some(1));

    let broken = json!([{ "p": 3 }, { "p": "2" }]);
    assert_eq!(
        first_out_of_order(broken.as_array().unwrap(), "p", Direction::Descending),
        Some(1)
    );
    assert_eq!(first_out_of_order(&[], "p", Direction::Descending), None);
}
