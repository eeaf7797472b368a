//! Shared fixtures: response bodies and a minimal in-process HTTP stub.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// The minor-units document every check passes on.
pub fn minor_units_document() -> Value {
    json!({
        "orders": [{
            "id": "o1",
            "status": "shipped",
            "total_cents": 500,
            "currency": "USD",
            "created_at": "2024-01-01T00:00:00Z",
            "items": [{
                "product_id": "p1",
                "product_name": "Widget",
                "thumbnail_url": "https://x.test/a.png",
                "quantity": 2,
                "unit_price_cents": 250
            }]
        }],
        "pagination": { "limit": 20, "offset": 0, "total": 1 }
    })
}

/// A major-units order with `n` items priced in descending order.
pub fn major_units_order(id: &str, status: &str, total: f64, prices: &[f64]) -> Value {
    let items: Vec<Value> = prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            json!({
                "product_id": format!("{id}-p{i}"),
                "product_name": format!("Product {i}"),
                "thumbnail_url": format!("https://cdn.example.com/{id}/{i}.jpg"),
                "quantity": 1,
                "unit_price": price
            })
        })
        .collect();
    json!({
        "order_id": id,
        "status": status,
        "created_at": "2025-01-15T10:30:00Z",
        "total_amount": total,
        "currency": "USD",
        "item_count": items.len(),
        "items": items
    })
}

pub fn major_units_document(orders: Vec<Value>) -> Value {
    let count = orders.len();
    json!({
        "orders": orders,
        "pagination": { "page": 1, "page_size": 20, "total_count": count, "total_pages": 1 }
    })
}

/// Canned response served by [`StubServer`].
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn json(value: &Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            location: None,
            body: serde_json::to_vec(value).unwrap(),
        }
    }

    /// `302 Found` pointing at `location` (a path on the same server).
    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            content_type: "text/plain",
            location: Some(location.to_string()),
            body: Vec::new(),
        }
    }

    pub fn raw(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            location: None,
            body: body.into(),
        }
    }
}

/// One-connection-per-request HTTP/1.1 server on an ephemeral port.
///
/// Serves the queued responses in order (repeating the last one) and
/// records each request target it receives.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        tokio::spawn(async move {
            let mut served = 0usize;
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let target = read_request_target(&mut socket).await;
                seen.lock().unwrap().push(target);

                let response = responses
                    .get(served)
                    .or_else(|| responses.last())
                    .cloned()
                    .unwrap();
                served += 1;

                let location = response
                    .location
                    .as_deref()
                    .map(|l| format!("Location: {l}\r\n"))
                    .unwrap_or_default();
                let head = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n",
                    response.status,
                    response.content_type,
                    location,
                    response.body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&response.body).await;
                let _ = socket.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Request targets (path and query) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request_target(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let head = String::from_utf8_lossy(&buf);
    head.lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}

/// An address nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// A server that accepts connections and reads requests but never answers.
pub async fn silent_server_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            read_request_target(&mut socket).await;
            held.push(socket);
        }
    });
    format!("http://{addr}")
}
