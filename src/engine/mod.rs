//! Constraint-checking engine.
//!
//! `run_checks` walks a [`RuleSet`] over a parsed response body and returns
//! every outcome in evaluation order. It has no side effects; printing and
//! exit status belong to [`crate::report`].

pub mod document;
pub mod predicate;
pub mod rule;

use serde_json::Value;

use crate::report::{CheckOutcome, RunReport};
use document::Node;
use rule::{Rule, RuleGroup, RuleSet, Scope};

/// Evaluate `rule_set` against `document`.
///
/// Deterministic: the same inputs always produce the same ordered outcomes.
/// Groups are walked depth-first; array elements are visited in index order.
pub fn run_checks(document: &Value, rule_set: &RuleSet) -> RunReport {
    let mut outcomes = Vec::new();
    run_group(&rule_set.root, Node::new(document), "", &mut outcomes);
    RunReport::from_outcomes(outcomes)
}

fn run_group(group: &RuleGroup, parent: Node<'_>, path: &str, out: &mut Vec<CheckOutcome>) {
    if let Some(precondition) = &group.precondition {
        if precondition.applies(parent) && !record(precondition, parent, path, out) {
            return;
        }
    }

    match group.scope {
        Scope::Current => run_body(group, parent, path, out),
        Scope::Field(name) => {
            if let Some(node) = parent.field(name).as_node() {
                run_body(group, node, &join(path, name), out);
            }
        }
        Scope::Each(name) => {
            if let Some(elements) = parent.elements(name) {
                let base = join(path, name);
                for (index, element) in elements.iter().enumerate() {
                    run_body(group, Node::new(element), &format!("{base}[{index}]"), out);
                }
            }
        }
    }
}

fn run_body(group: &RuleGroup, node: Node<'_>, path: &str, out: &mut Vec<CheckOutcome>) {
    for rule in &group.rules {
        if rule.applies(node) {
            record(rule, node, path, out);
        }
    }
    for child in &group.children {
        run_group(child, node, path, out);
    }
}

fn record(rule: &Rule, node: Node<'_>, path: &str, out: &mut Vec<CheckOutcome>) -> bool {
    let label = rule.label_at(path);
    let outcome = if rule.evaluate(node) {
        CheckOutcome::pass(label)
    } else {
        CheckOutcome::fail(label, rule.detail(node))
    };
    let passed = outcome.passed;
    out.push(outcome);
    passed
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
