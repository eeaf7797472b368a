use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::{Client, Url};

/// Redirect hops followed for a single fetch before giving up.
const MAX_REDIRECTS: usize = 10;

/// The server could not be reached or did not deliver a full response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid target URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Raw result of one GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Size of the body as received, in bytes.
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    pub fn parse_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Issues requests against the endpoint under test.
///
/// Implementations count every request they attempt so the request-count
/// contract can be checked from the outside.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Full URL for the given query, used in reports.
    fn target(&self, query: &[(String, String)]) -> String;

    async fn fetch(&mut self, query: &[(String, String)]) -> Result<FetchResponse, TransportError>;

    fn requests_issued(&self) -> usize;
}

/// `Fetcher` backed by a `reqwest` client with an explicit timeout.
///
/// Redirects are followed, but every hop counts as one more issued request.
pub struct HttpFetcher {
    client: Client,
    endpoint: Url,
    timeout: Duration,
    requests: usize,
    redirects: Arc<AtomicUsize>,
}

impl HttpFetcher {
    pub fn new(base_url: &str, path: &str, timeout: Duration) -> Result<Self, TransportError> {
        let joined = format!("{}{}", base_url.trim_end_matches('/'), path);
        let endpoint = Url::parse(&joined).map_err(|e| TransportError::InvalidUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })?;

        let redirects = Arc::new(AtomicUsize::new(0));
        let hops = Arc::clone(&redirects);
        let policy = Policy::custom(move |attempt| {
            if attempt.previous().len() > MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else {
                hops.fetch_add(1, Ordering::Relaxed);
                attempt.follow()
            }
        });

        let client = Client::builder()
            .timeout(timeout)
            .redirect(policy)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout,
            requests: 0,
            redirects,
        })
    }

    fn url_for(&self, query: &[(String, String)]) -> Url {
        let mut url = self.endpoint.clone();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

impl Fetcher for HttpFetcher {
    fn target(&self, query: &[(String, String)]) -> String {
        self.url_for(query).to_string()
    }

    async fn fetch(&mut self, query: &[(String, String)]) -> Result<FetchResponse, TransportError> {
        let url = self.url_for(query);
        self.requests += 1;
        tracing::info!(%url, "issuing request");

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        tracing::debug!(%url, status, bytes = body.len(), "response received");

        Ok(FetchResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }

    fn requests_issued(&self) -> usize {
        self.requests + self.redirects.load(Ordering::Relaxed)
    }
}
