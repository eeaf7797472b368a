//! `major-units` preset: decimal prices, `page`/`page_size` pagination and
//! items sorted by unit price, checked across three requests.

use serde_json::Value;

use crate::engine::document::{Field, Node};
use crate::engine::predicate::{
    as_f64, first_out_of_order, is_array, is_iso8601_timestamp, is_non_empty_string,
    is_non_negative_integer, is_object, is_one_of, is_positive_integer, is_positive_number,
    is_well_formed_url, Direction, UrlStrictness,
};
use crate::engine::rule::{Rule, RuleGroup, RuleSet, Scope, AT};
use crate::scenario::{ExchangeChecks, Scenario};

use super::{enum_detail, no_follow_up_fetch, orders_gate};

pub const STATUSES: &[&str] = &["pending", "processing", "shipped", "delivered", "cancelled"];

/// Sort orders the endpoint accepts for the `sort` query parameter.
pub const SORTS: &[&str] = &[
    "created_at:desc",
    "created_at:asc",
    "total_amount:desc",
    "total_amount:asc",
];

/// Page size the server applies when none is requested.
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: f64 = 50.0;

const PAGED_PAGE_SIZE: usize = 5;
const PAGED_SORT: &str = SORTS[2];
const FILTER_STATUS: &str = "shipped";

pub fn scenarios() -> Vec<Scenario> {
    let exchange = ExchangeChecks {
        require_json_content_type: true,
        ..ExchangeChecks::default()
    };
    vec![
        Scenario::new("Default request (no params)", default_rule_set()),
        Scenario::new(
            format!("Paged and sorted (page=1, page_size={PAGED_PAGE_SIZE}, sort={PAGED_SORT})"),
            paged_rule_set(PAGED_PAGE_SIZE, PAGED_SORT),
        )
        .query("page", 1)
        .query("page_size", PAGED_PAGE_SIZE)
        .query("sort", PAGED_SORT),
        Scenario::new(
            format!("Status filter (status={FILTER_STATUS})"),
            status_filter_rule_set(FILTER_STATUS),
        )
        .query("status", FILTER_STATUS),
    ]
    .into_iter()
    .map(|scenario| scenario.exchange(exchange.clone()))
    .collect()
}

/// Full shape contract for the unparameterized request.
pub fn default_rule_set() -> RuleSet {
    let item_fields = RuleGroup::new("item fields", Scope::Each("items")).rules([
        non_empty_string("product_id"),
        non_empty_string("product_name"),
        Rule::field(format!("{AT}.thumbnail_url is a valid URL"), "thumbnail_url", |v| {
            is_well_formed_url(v, UrlStrictness::Absolute)
        }),
        Rule::field(
            format!("{AT}.quantity is a positive integer"),
            "quantity",
            is_positive_integer,
        ),
        Rule::field(
            format!("{AT}.unit_price is a positive number"),
            "unit_price",
            is_positive_number,
        ),
    ]);

    let order_items = RuleGroup::new("order item invariants", Scope::Current)
        .precondition(
            Rule::field(format!("{AT}.items is an array"), "items", is_array)
                .with_detail(|order| format!("got {}", order.field("items").type_name())),
        )
        .rule(
            Rule::new(format!("{AT}.items is non-empty"), |order| {
                order.len_of("items").is_some_and(|n| n > 0)
            })
            .with_detail(|_| "items array is empty".to_string()),
        )
        .rule(
            Rule::new(format!("{AT}.item_count matches items.length"), item_count_matches)
                .with_detail(|order| {
                    format!(
                        "item_count={} but items.length={}",
                        order.field("item_count").describe(),
                        order.len_of("items").unwrap_or_default()
                    )
                }),
        )
        .rule(sorted_rule(
            format!("{AT}.items sorted by unit_price descending"),
            "items",
            "unit_price",
            Direction::Descending,
        ))
        .rule(first_item_card_field(
            "thumbnail_url",
            "missing thumbnail for card",
            |v| is_well_formed_url(v, UrlStrictness::Absolute),
        ))
        .rule(first_item_card_field(
            "product_name",
            "missing product name for card",
            is_non_empty_string,
        ))
        .child(item_fields);

    let orders = RuleGroup::new("order fields", Scope::Each("orders"))
        .rules([
            non_empty_string("order_id"),
            Rule::field(format!("{AT}.status is a valid enum value"), "status", |v| {
                is_one_of(v, STATUSES)
            })
            .with_detail(enum_detail("status", STATUSES)),
            Rule::field(
                format!("{AT}.created_at is an ISO 8601 timestamp"),
                "created_at",
                is_iso8601_timestamp,
            ),
            Rule::field(
                format!("{AT}.total_amount is a positive number"),
                "total_amount",
                is_positive_number,
            ),
            non_empty_string("currency"),
            Rule::field(
                format!("{AT}.item_count is a non-negative integer"),
                "item_count",
                is_non_negative_integer,
            ),
        ])
        .child(order_items);

    let pagination = RuleGroup::new("pagination fields", Scope::Field("pagination"))
        .precondition(pagination_is_object())
        .rules([
            Rule::field(format!("{AT}.page is a positive integer"), "page", is_positive_integer),
            Rule::field(
                format!("{AT}.page_size is a positive integer"),
                "page_size",
                is_positive_integer,
            ),
            Rule::field(format!("{AT}.page_size <= {MAX_PAGE_SIZE}"), "page_size", |v| {
                as_f64(v).is_some_and(|n| n <= MAX_PAGE_SIZE)
            }),
            Rule::field(
                format!("{AT}.total_count is a non-negative integer"),
                "total_count",
                is_non_negative_integer,
            ),
            Rule::field(
                format!("{AT}.total_pages is a non-negative integer"),
                "total_pages",
                is_non_negative_integer,
            ),
        ]);

    let root = RuleGroup::new("response shape", Scope::Current)
        .precondition(orders_gate())
        .rules([
            Rule::new("orders array is non-empty", |doc| {
                doc.len_of("orders").is_some_and(|n| n > 0)
            })
            .with_detail(|_| "no orders returned".to_string()),
            max_orders(DEFAULT_PAGE_SIZE, "default page_size"),
        ])
        .child(orders)
        .child(pagination)
        .child(
            RuleGroup::new("inline product data", Scope::Current)
                .rule(no_follow_up_fetch("product_name", "thumbnail_url")),
        );

    RuleSet::new("major-units", root)
}

/// Contract for a request with an explicit `page_size` and a `sort` of the
/// form `<field>:<asc|desc>`.
pub fn paged_rule_set(page_size: usize, sort: &'static str) -> RuleSet {
    let pagination = RuleGroup::new("pagination echo", Scope::Field("pagination"))
        .precondition(pagination_is_object())
        .rule(Rule::field(
            format!("{AT}.page_size reflects request ({page_size})"),
            "page_size",
            move |v| as_f64(v) == Some(page_size as f64),
        ));

    let mut root = RuleGroup::new("paged response", Scope::Current)
        .precondition(orders_gate())
        .rule(max_orders(page_size, "requested page_size"));
    if let Some((field, direction)) = parse_sort(sort) {
        root = root.rule(sorted_rule(
            format!("orders sorted by {field} {}", direction.as_str()),
            "orders",
            field,
            direction,
        ));
    }

    RuleSet::new("major-units/paged", root.child(pagination))
}

/// Split a `sort` parameter value into field and direction.
pub fn parse_sort(sort: &'static str) -> Option<(&'static str, Direction)> {
    let (field, direction) = sort.split_once(':')?;
    let direction = match direction {
        "asc" => Direction::Ascending,
        "desc" => Direction::Descending,
        _ => return None,
    };
    Some((field, direction))
}

/// Contract for a request filtered to a single status.
pub fn status_filter_rule_set(status: &'static str) -> RuleSet {
    let has_status = move |order: &Value| order.get("status").and_then(Value::as_str) == Some(status);

    let root = RuleGroup::new("filtered response", Scope::Current)
        .precondition(orders_gate())
        .rule(
            Rule::new(format!("all returned orders have status '{status}'"), move |doc| {
                elements(doc, "orders").iter().all(has_status)
            })
            .with_detail(move |doc| {
                let offenders: Vec<String> = elements(doc, "orders")
                    .iter()
                    .enumerate()
                    .filter(|(_, order)| !has_status(*order))
                    .map(|(i, order)| {
                        let found = Node::new(order).field("status").describe();
                        format!("orders[{i}].status={found}")
                    })
                    .collect();
                format!("found orders with other statuses: {}", offenders.join(", "))
            }),
        );

    RuleSet::new("major-units/status-filter", root)
}

/// `item_count` equals `items.length`. An absent `item_count` never matches.
fn item_count_matches(order: Node<'_>) -> bool {
    let count = as_f64(order.field("item_count"));
    match (count, order.len_of("items")) {
        (Some(count), Some(len)) => count == len as f64,
        _ => false,
    }
}

fn elements<'a>(node: Node<'a>, name: &str) -> &'a [Value] {
    node.elements(name).unwrap_or_default()
}

/// Adjacent elements of `collection` are ordered by `field`. Applies only
/// when the collection has more than one element.
fn sorted_rule(
    label: String,
    collection: &'static str,
    field: &'static str,
    direction: Direction,
) -> Rule {
    Rule::new(label, move |node| {
        first_out_of_order(elements(node, collection), field, direction).is_none()
    })
    .when(move |node| elements(node, collection).len() > 1)
    .with_detail(move |node| {
        let list = elements(node, collection);
        match first_out_of_order(list, field, direction) {
            Some(i) => format!(
                "{collection}[{i}].{field}={} follows {collection}[{}].{field}={}",
                describe_at(list, i, field),
                i - 1,
                describe_at(list, i - 1, field),
            ),
            None => format!("{collection} are not sorted by {field} {}", direction.as_str()),
        }
    })
}

fn describe_at(elements: &[Value], index: usize, field: &str) -> String {
    let node = elements.get(index).map(Node::new);
    node.map_or_else(|| "undefined".to_string(), |n| n.field(field).describe())
}

fn non_empty_string(name: &'static str) -> Rule {
    Rule::field(format!("{AT}.{name} is a non-empty string"), name, is_non_empty_string)
}

fn pagination_is_object() -> Rule {
    Rule::field("pagination is an object", "pagination", is_object)
        .with_detail(|doc| format!("got {}", doc.field("pagination").type_name()))
}

fn max_orders(limit: usize, what: &str) -> Rule {
    Rule::new(format!("orders count <= {what} ({limit})"), move |doc| {
        doc.len_of("orders").is_some_and(|n| n <= limit)
    })
    .with_detail(|doc| format!("got {}", doc.len_of("orders").unwrap_or_default()))
}

/// The first item must carry `field` for the order card to render.
fn first_item_card_field(
    field: &'static str,
    missing: &'static str,
    predicate: fn(Field<'_>) -> bool,
) -> Rule {
    Rule::new(format!("{AT} card render: first item has {field}"), move |order| {
        elements(order, "items")
            .first()
            .is_some_and(|item| predicate(Node::new(item).field(field)))
    })
    .when(|order| order.len_of("items").is_some_and(|n| n > 0))
    .with_detail(move |_| missing.to_string())
}
