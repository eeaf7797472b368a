//! Determinism regression test.
//!
//! For an identical document and rule set, `run_checks` must produce the
//! same ordered outcomes and counts on every run, and the rendered report
//! must be byte-identical.

mod common;

use orders_contract_check::contract::{major_units, minor_units};
use orders_contract_check::engine::run_checks;
use orders_contract_check::report::{render_text, RunReport, ScenarioReport, SessionReport};
use serde_json::json;

use common::{major_units_document, major_units_order, minor_units_document};

fn render(report: RunReport) -> String {
    let session = SessionReport {
        contract: "minor-units".to_string(),
        scenarios: vec![ScenarioReport {
            name: "determinism".to_string(),
            target: "http://localhost:8080/dashboard/orders".to_string(),
            report,
        }],
        abort: None,
    };
    let mut out = Vec::new();
    render_text(&session, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn identical_runs_produce_identical_outcomes() {
    let mut doc = minor_units_document();
    doc["orders"][0]["status"] = json!("unknown");
    let rules = minor_units::rule_set();

    let run_a = run_checks(&doc, &rules);
    let run_b = run_checks(&doc, &rules);

    assert_eq!(run_a, run_b, "two runs with identical inputs must agree");
    assert_eq!(render(run_a), render(run_b));
}

#[test]
fn rebuilt_rule_sets_produce_identical_outcomes() {
    let doc = major_units_document(vec![
        major_units_order("o1", "shipped", 50.0, &[20.0, 30.0]),
        major_units_order("o2", "refunded", 0.0, &[]),
    ]);

    let run_a = run_checks(&doc, &major_units::default_rule_set());
    let run_b = run_checks(&doc, &major_units::default_rule_set());

    assert_eq!(run_a.outcomes, run_b.outcomes);
    assert_eq!(run_a.pass_count, run_b.pass_count);
    assert_eq!(run_a.fail_count, run_b.fail_count);
    assert!(run_a.fail_count > 0);
}

#[test]
fn outcomes_follow_document_order() {
    let mut doc = minor_units_document();
    let second = doc["orders"][0].clone();
    doc["orders"].as_array_mut().unwrap().push(second);

    let report = run_checks(&doc, &minor_units::rule_set());

    let labels: Vec<&str> = report.outcomes.iter().map(|o| o.label.as_str()).collect();
    let position = |label: &str| labels.iter().position(|l| *l == label).unwrap();

    assert_eq!(position("response has an \"orders\" array"), 0);
    assert!(position("pagination is an object") < position("orders[0].id is present"));
    assert!(position("orders[0].created_at is an ISO 8601 timestamp") < position("orders[0].items[0].product_id is present"));
    assert!(position("orders[0].items[0].unit_price_cents is a positive integer") < position("orders[1].id is present"));
    assert_eq!(
        *labels.last().unwrap(),
        "all items carry product_name and thumbnail_url inline (no follow-up fetch)"
    );
}
