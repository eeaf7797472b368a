//! `minor-units` preset: integer cent prices and `limit`/`offset`/`total`
//! pagination, fetched in a single above-the-fold request.

use crate::engine::predicate::{
    is_iso8601_timestamp, is_non_empty_array, is_non_negative_integer, is_object, is_one_of, is_positive_integer, is_present, is_well_formed_url, UrlStrictness,
};
use crate::engine::rule::{Rule, RuleGroup, RuleSet, Scope, AT};
use crate::scenario::{ExchangeChecks, Scenario};

use super::{enum_detail, no_follow_up_fetch, orders_gate};

pub const STATUSES: &[&str] = &["pending", "confirmed", "shipped", "delivered", "cancelled"];

const PAGINATION_FIELDS: &[&str] = &["limit", "offset", "total"];
const ORDER_FIELDS: &[&str] = &["id", "status", "total_cents", "currency", "created_at", "items"];
const ITEM_FIELDS: &[&str] = &["product_id", "product_name", "thumbnail_url", "quantity", "unit_price_cents"];

pub fn scenarios(max_payload_bytes: usize) -> Vec<Scenario> {
    let exchange = ExchangeChecks {
        single_request: true,
        max_payload_bytes: Some(max_payload_bytes),
        ..ExchangeChecks::default()
    };
    vec![Scenario::new("Above-the-fold request", rule_set()).exchange(exchange)]
}

pub fn rule_set() -> RuleSet {
    let pagination = RuleGroup::new("pagination fields", Scope::Field("pagination"))
        .precondition(Rule::field("pagination is an object", "pagination", is_object))
        .rules(PAGINATION_FIELDS.iter().map(|&name| {
            Rule::field(
                format!("{AT}.{name} is a non-negative integer"),
                name,
                is_non_negative_integer,
            )
        }));

    let items = RuleGroup::new("item fields", Scope::Each("items"))
        .precondition(Rule::field(
            format!("{AT}.items has at least one item"),
            "items",
            is_non_empty_array,
        ))
        .rules(ITEM_FIELDS.iter().map(|&name| presence(name)))
        .rule(Rule::field(
            format!("{AT}.thumbnail_url looks like a URL"),
            "thumbnail_url",
            |v| is_well_formed_url(v, UrlStrictness::HttpPrefix),
        ))
        .rule(Rule::field(
            format!("{AT}.quantity is a positive integer"),
            "quantity",
            is_positive_integer,
        ))
        .rule(Rule::field(
            format!("{AT}.unit_price_cents is a positive integer"),
            "unit_price_cents",
            is_positive_integer,
        ));

    let orders = RuleGroup::new("order fields", Scope::Each("orders"))
        .rules(ORDER_FIELDS.iter().map(|&name| presence(name)))
        .rule(
            Rule::field(format!("{AT}.status is a valid enum value"), "status", |v| {
                is_one_of(v, STATUSES)
            })
            .with_detail(enum_detail("status", STATUSES)),
        )
        .rule(Rule::field(
            format!("{AT}.total_cents is a non-negative integer"),
            "total_cents",
            is_non_negative_integer,
        ))
        .rule(Rule::field(
            format!("{AT}.created_at is an ISO 8601 timestamp"),
            "created_at",
            is_iso8601_timestamp,
        ))
        .child(items);

    let aggregate = RuleGroup::new("inline product data", Scope::Current)
        .rule(no_follow_up_fetch("product_name", "thumbnail_url"));

    let root = RuleGroup::new("response shape", Scope::Current)
        .precondition(orders_gate())
        .child(pagination)
        .child(orders)
        .child(aggregate);

    RuleSet::new("minor-units", root)
}

fn presence(name: &'static str) -> Rule {
    Rule::field(format!("{AT}.{name} is present"), name, is_present)
        .with_detail(move |node| format!("got {}", raw_missing(node.value().get(name))))
}

/// `undefined` for an absent key, `null` for an explicit null.
fn raw_missing(value: Option<&serde_json::Value>) -> String {
    value.map_or_else(|| "undefined".to_string(), ToString::to_string)
}
