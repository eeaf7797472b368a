//! Named contract presets for `GET /dashboard/orders`.
//!
//! Two incompatible response shapes exist for the endpoint. Each is exposed
//! as its own preset; neither is treated as canonical.

pub mod major_units;
pub mod minor_units;

use std::fmt;
use std::str::FromStr;

use crate::engine::document::Node;
use crate::engine::predicate::{is_array, is_non_empty_string};
use crate::engine::rule::Rule;
use crate::scenario::Scenario;

/// Path of the endpoint under test, relative to the base URL.
pub const ENDPOINT_PATH: &str = "/dashboard/orders";

/// Default exclusive payload budget (50 KiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 50 * 1024;

#[derive(Debug, thiserror::Error)]
#[error("unknown contract preset {0:?} (expected one of: minor-units, major-units)")]
pub struct UnknownPreset(pub String);

/// Response-shape contract selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContractPreset {
    /// Integer minor-unit prices, `limit`/`offset`/`total` pagination,
    /// single above-the-fold request with a payload budget.
    #[default]
    MinorUnits,
    /// Decimal major-unit prices, `page`/`page_size` pagination, price-sorted
    /// items, plus paging/sorting and status-filter scenarios.
    MajorUnits,
}

impl ContractPreset {
    pub const ALL: [ContractPreset; 2] = [ContractPreset::MinorUnits, ContractPreset::MajorUnits];

    pub fn name(self) -> &'static str {
        match self {
            Self::MinorUnits => "minor-units",
            Self::MajorUnits => "major-units",
        }
    }

    /// Scenarios to run for this preset, in execution order.
    pub fn scenarios(self, max_payload_bytes: usize) -> Vec<Scenario> {
        match self {
            Self::MinorUnits => minor_units::scenarios(max_payload_bytes),
            Self::MajorUnits => major_units::scenarios(),
        }
    }
}

impl fmt::Display for ContractPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContractPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == s.trim())
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Fail-fast gate: without an `orders` array nothing else can be checked.
pub(crate) fn orders_gate() -> Rule {
    Rule::field("response has an \"orders\" array", "orders", is_array)
        .with_detail(|doc| format!("got {}", doc.field("orders").type_name()))
}

/// Every item across every order carries its display data inline, so no
/// follow-up product fetch is required. Reported once for the whole body.
pub(crate) fn no_follow_up_fetch(name_field: &'static str, image_field: &'static str) -> Rule {
    Rule::new(
        format!("all items carry {name_field} and {image_field} inline (no follow-up fetch)"),
        move |doc| items_missing_display_data(doc, name_field, image_field).is_empty(),
    )
    .with_detail(move |doc| {
        format!(
            "missing display data at: {}",
            items_missing_display_data(doc, name_field, image_field).join(", ")
        )
    })
}

fn items_missing_display_data(doc: Node<'_>, name_field: &str, image_field: &str) -> Vec<String> {
    let orders = doc.elements("orders").unwrap_or_default();
    let mut offenders = Vec::new();
    for (o, order) in orders.iter().enumerate() {
        let items = Node::new(order).elements("items").unwrap_or_default();
        for (i, item) in items.iter().enumerate() {
            let item = Node::new(item);
            if !is_non_empty_string(item.field(name_field))
                || !is_non_empty_string(item.field(image_field))
            {
                offenders.push(format!("orders[{o}].items[{i}]"));
            }
        }
    }
    offenders
}

/// Detail formatter for enum rules: the value found and the allowed set.
pub(crate) fn enum_detail(
    name: &'static str,
    allowed: &'static [&'static str],
) -> impl Fn(Node<'_>) -> String + Send + Sync + 'static {
    move |node: Node<'_>| {
        format!(
            "got {}, expected one of: {}",
            node.field(name).describe(),
            allowed.join(", ")
        )
    }
}
