use std::io::Write;

use orders_contract_check::config::CheckerConfig;
use orders_contract_check::contract::ENDPOINT_PATH;
use orders_contract_check::fetch::HttpFetcher;
use orders_contract_check::report::{self, EXIT_CHECKS_FAILED, EXIT_TRANSPORT};
use orders_contract_check::scenario::run_session;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match CheckerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("orders-contract-check: configuration error: {e}");
            std::process::exit(EXIT_CHECKS_FAILED);
        }
    };

    let mut fetcher = match HttpFetcher::new(&config.base_url, ENDPOINT_PATH, config.timeout) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("orders-contract-check: {e}");
            std::process::exit(EXIT_TRANSPORT);
        }
    };

    tracing::info!(
        contract = %config.contract,
        base_url = %config.base_url,
        timeout_secs = config.timeout.as_secs(),
        "starting contract check"
    );

    let scenarios = config.contract.scenarios(config.max_payload_bytes);
    let session = run_session(config.contract.name(), &mut fetcher, &scenarios).await;

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = report::render(&session, config.format, &mut stdout).and_then(|()| stdout.flush()) {
        eprintln!("orders-contract-check: failed to write report: {e}");
    }

    std::process::exit(session.exit_code());
}
