//! Shared fixtures for the cable shop integration tests.
//!
//! Provides a tiny in-process HTTP server that answers canned JSON per
//! `(method, path)` and records every request it saw, plus sample products
//! and orders for the aggregation tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use cable_shop::models::{Order, OrderItem, Product};
use cable_shop::ShopClient;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Stub server
// ---------------------------------------------------------------------------

/// One request as the stub server received it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    pub query: Option<String>,
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    status: u16,
    body: String,
}

/// Canned-response HTTP server on `127.0.0.1`.
///
/// Unmatched requests get a 404. The accept loop runs on a detached thread
/// for the lifetime of the test process.
pub struct StubServer {
    addr: String,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let routes: Arc<Mutex<Vec<Route>>> = Arc::new(Mutex::new(Vec::new()));
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::new(Mutex::new(Vec::new()));

        let r = routes.clone();
        let q = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                handle(stream, &r, &q);
            }
        });

        Self {
            addr,
            routes,
            requests,
        }
    }

    /// Answer `method path` with `status` and a JSON body. Later routes for
    /// the same method and path replace earlier ones.
    pub fn route(&self, method: &str, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.route_raw(method, path, status, &body.to_string())
    }

    pub fn route_raw(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        let mut routes = self.routes.lock().unwrap();
        routes.retain(|r| !(r.method == method && r.path == path));
        routes.push(Route {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
        self
    }

    /// Root URL, e.g. `http://127.0.0.1:41234/`.
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// The API base the client is pointed at.
    pub fn api_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }

    pub fn client(&self) -> ShopClient {
        ShopClient::builder().base_url(self.api_url()).build().unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request received")
    }
}

fn handle(stream: TcpStream, routes: &Mutex<Vec<Route>>, requests: &Mutex<Vec<Recorded>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();
    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p.to_string(), Some(q.to_string())),
        None => (target.clone(), None),
    };

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let body = if headers
        .get("transfer-encoding")
        .map(|v| v.eq_ignore_ascii_case("chunked"))
        .unwrap_or(false)
    {
        read_chunked(&mut reader)
    } else {
        let len: usize = headers
            .get("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf).unwrap();
        buf
    };

    let route = routes
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.method == method && r.path == path)
        .cloned();

    requests.lock().unwrap().push(Recorded {
        method,
        path,
        query,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let (status, body) = match route {
        Some(r) => (r.status, r.body),
        None => (404, "\"not found\"".to_string()),
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let mut size_line = String::new();
        if reader.read_line(&mut size_line).unwrap_or(0) == 0 {
            break;
        }
        let size = usize::from_str_radix(size_line.trim().split(';').next().unwrap_or("0"), 16)
            .unwrap_or(0);
        if size == 0 {
            let mut trailer = String::new();
            let _ = reader.read_line(&mut trailer);
            break;
        }
        let mut chunk = vec![0u8; size];
        reader.read_exact(&mut chunk).unwrap();
        out.extend_from_slice(&chunk);
        let mut crlf = [0u8; 2];
        reader.read_exact(&mut crlf).unwrap();
    }
    out
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

/// A URL nothing is listening on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/", addr)
}

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn product(n: u128, name: &str, category: Option<&str>, price: i64, quantity: i32) -> Product {
    Product {
        id: id(n),
        name: name.to_string(),
        category: category.map(str::to_string),
        image_url: None,
        price: Decimal::from(price),
        quantity,
    }
}

pub fn item(product_id: Uuid, name: &str, quantity: i32, unit_price: i64) -> OrderItem {
    OrderItem {
        id: None,
        order_id: None,
        product_id,
        product_name: name.to_string(),
        quantity,
        unit_price: Decimal::from(unit_price),
        total_price: Decimal::from(unit_price * i64::from(quantity)),
        product: None,
    }
}

/// An order at noon UTC on the given day; totals follow the items.
pub fn order(n: u128, y: i32, m: u32, d: u32, items: Vec<OrderItem>) -> Order {
    let sub_total: Decimal = items.iter().map(|i| i.total_price).sum();
    Order {
        id: id(1000 + n),
        order_time: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        sub_total,
        discount: Decimal::ZERO,
        total_amount: sub_total,
        order_items: items,
        is_returned: false,
    }
}

/// Server-side JSON for an order, as `GET /Order` returns it.
pub fn order_json(order: &Order) -> serde_json::Value {
    serde_json::to_value(order).unwrap()
}
