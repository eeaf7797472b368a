//! Sequential scenario execution.
//!
//! Each scenario is one request plus the checks run against its response.
//! Scenarios run strictly in order; the next request is issued only after
//! the previous response has been fully checked.

use crate::engine::rule::RuleSet;
use crate::engine::run_checks;
use crate::fetch::{FetchResponse, Fetcher};
use crate::report::{Abort, CheckOutcome, RunReport, ScenarioReport, SessionReport};

/// Checks on the HTTP exchange itself, independent of the body's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeChecks {
    pub expect_status: u16,
    /// Off unless a contract asks for it; the body is parsed either way.
    pub require_json_content_type: bool,
    /// All data for the view must arrive in exactly one request.
    pub single_request: bool,
    /// Exclusive upper bound on the raw body size in bytes.
    pub max_payload_bytes: Option<usize>,
}

impl Default for ExchangeChecks {
    fn default() -> Self {
        Self {
            expect_status: 200,
            require_json_content_type: false,
            single_request: false,
            max_payload_bytes: None,
        }
    }
}

impl ExchangeChecks {
    fn evaluate(&self, response: &FetchResponse, requests: usize, out: &mut Vec<CheckOutcome>) {
        out.push(CheckOutcome::check(
            format!("HTTP status is {}", self.expect_status),
            response.status == self.expect_status,
            || format!("got {}", response.status),
        ));

        if self.require_json_content_type {
            let content_type = response.content_type.as_deref().unwrap_or("");
            out.push(CheckOutcome::check(
                "Content-Type is application/json",
                content_type.contains("application/json"),
                || format!("got {content_type:?}"),
            ));
        }

        if self.single_request {
            out.push(CheckOutcome::check(
                "data retrieved in exactly 1 HTTP request",
                requests == 1,
                || format!("{requests} requests issued"),
            ));
        }

        if let Some(limit) = self.max_payload_bytes {
            let size = response.body_len();
            out.push(CheckOutcome::check(
                format!("payload size is under {limit} bytes"),
                size < limit,
                || format!("body is {size} bytes ({:.2} KiB)", size as f64 / 1024.0),
            ));
        }
    }
}

/// One request and the contract its response must satisfy.
#[derive(Debug)]
pub struct Scenario {
    pub name: String,
    pub query: Vec<(String, String)>,
    pub exchange: ExchangeChecks,
    pub rules: RuleSet,
}

impl Scenario {
    pub fn new(name: impl Into<String>, rules: RuleSet) -> Self {
        Self {
            name: name.into(),
            query: Vec::new(),
            exchange: ExchangeChecks::default(),
            rules,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn exchange(mut self, exchange: ExchangeChecks) -> Self {
        self.exchange = exchange;
        self
    }
}

/// Run every scenario in order and collect their outcomes.
///
/// A transport failure stops the session immediately. A body that is not
/// JSON records one failing check and stops the session.
pub async fn run_session<F: Fetcher>(
    contract: &str,
    fetcher: &mut F,
    scenarios: &[Scenario],
) -> SessionReport {
    let mut session = SessionReport {
        contract: contract.to_string(),
        ..SessionReport::default()
    };

    for scenario in scenarios {
        let target = fetcher.target(&scenario.query);
        let issued_before = fetcher.requests_issued();

        let response = match fetcher.fetch(&scenario.query).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(scenario = %scenario.name, %target, error = %e, "transport failure");
                session.abort = Some(Abort::Transport {
                    target,
                    message: e.to_string(),
                });
                return session;
            }
        };

        let requests = fetcher.requests_issued() - issued_before;
        let mut outcomes = Vec::new();
        scenario.exchange.evaluate(&response, requests, &mut outcomes);

        let document = match response.parse_json() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(scenario = %scenario.name, error = %e, "response body is not JSON");
                outcomes.push(CheckOutcome::fail(
                    "response body is valid JSON",
                    Some(format!("parse error: {e}")),
                ));
                session.scenarios.push(ScenarioReport {
                    name: scenario.name.clone(),
                    target: target.clone(),
                    report: RunReport::from_outcomes(outcomes),
                });
                session.abort = Some(Abort::Parse {
                    target,
                    message: e.to_string(),
                });
                return session;
            }
        };

        outcomes.extend(run_checks(&document, &scenario.rules).outcomes);
        let report = RunReport::from_outcomes(outcomes);
        tracing::debug!(
            scenario = %scenario.name,
            passed = report.pass_count,
            failed = report.fail_count,
            "scenario checked"
        );

        session.scenarios.push(ScenarioReport {
            name: scenario.name.clone(),
            target,
            report,
        });
    }

    session
}
