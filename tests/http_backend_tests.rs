// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use minifin::api::{Backend, HttpBackend};
use minifin::config::{Config, RouteStyle};
use minifin::error::Error;
use minifin::models::{NewRecord, Period, RecordType, RecordUpdate};
use rust_decimal::Decimal;
use serde_json::{Value, json};

/// Answers one request with `status` and `body`; the join handle yields the raw request.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request
    });
    (format!("http://{}", addr), handle)
}

fn read_request(stream: &mut std::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .map(|v| v.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if buf.len() >= pos + 4 + len {
                break;
            }
        }
    }
    String::from_utf8(buf).unwrap()
}

fn request_line(req: &str) -> &str {
    req.lines().next().unwrap()
}

fn request_body(req: &str) -> Value {
    let (_, body) = req.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

fn backend(url: String, routes: RouteStyle) -> HttpBackend {
    let config = Config {
        backend_url: url,
        routes,
        ..Config::default()
    };
    HttpBackend::new(&config).unwrap()
}

#[test]
fn report_requests_period_and_user() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"period_label":"Week","income":500,"expense":200,"start_balance":100}"#,
    );
    let report = backend(url, RouteStyle::Records)
        .report("42", Period::Week)
        .unwrap();
    let req = server.join().unwrap();
    assert_eq!(
        request_line(&req),
        "GET /api/report?period=week&user_id=42 HTTP/1.1"
    );
    assert_eq!(report.period_label, "Week");
    assert_eq!(report.balance(None), Decimal::new(400, 0));
}

#[test]
fn missing_profile_is_none() {
    let (url, server) = serve_once("404 Not Found", r#"{"detail":"not found"}"#);
    let profile = backend(url, RouteStyle::Records).get_user("42").unwrap();
    let req = server.join().unwrap();
    assert!(request_line(&req).starts_with("GET /api/get_user?user_id=42 "));
    assert!(profile.is_none());
}

#[test]
fn add_posts_record_with_user_id() {
    let (url, server) = serve_once("200 OK", r#"{"status":"ok","id":9}"#);
    backend(url, RouteStyle::Records)
        .add_record(
            "42",
            &NewRecord {
                r#type: RecordType::Expense,
                amount: Decimal::new(1250, 2),
                currency: "₽".into(),
                category_id: Some(3),
                description: None,
            },
        )
        .unwrap();
    let req = server.join().unwrap();
    assert_eq!(request_line(&req), "POST /api/add HTTP/1.1");
    assert_eq!(
        request_body(&req),
        json!({"type": "expense", "amount": 12.5, "currency": "₽", "category_id": 3, "user_id": "42"})
    );
}

#[test]
fn update_path_follows_route_style() {
    let patch = RecordUpdate {
        amount: Some(Decimal::new(5, 0)),
        ..Default::default()
    };

    let (url, server) = serve_once("200 OK", "{}");
    backend(url, RouteStyle::Records)
        .update_record("42", 7, &patch)
        .unwrap();
    let req = server.join().unwrap();
    assert_eq!(request_line(&req), "PUT /api/update/7 HTTP/1.1");
    assert_eq!(request_body(&req), json!({"amount": 5.0, "user_id": "42"}));

    let (url, server) = serve_once("200 OK", "{}");
    backend(url, RouteStyle::Operations)
        .update_record("42", 7, &patch)
        .unwrap();
    let req = server.join().unwrap();
    assert_eq!(request_line(&req), "PUT /api/operations/7 HTTP/1.1");
}

#[test]
fn records_accept_bare_and_wrapped_lists() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"id":2,"type":"expense","amount":20,"currency":"₽"},{"id":1,"type":"income","amount":50,"currency":"₽"}]"#,
    );
    let records = backend(url, RouteStyle::Records).records("42").unwrap();
    let req = server.join().unwrap();
    assert_eq!(request_line(&req), "GET /api/records?user_id=42 HTTP/1.1");
    assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);

    let (url, server) = serve_once(
        "200 OK",
        r#"{"operations":[{"id":5,"type":"income","amount":"1.5","currency":"$"}]}"#,
    );
    let records = backend(url, RouteStyle::Operations).records("42").unwrap();
    let req = server.join().unwrap();
    assert_eq!(request_line(&req), "GET /api/operations?user_id=42 HTTP/1.1");
    assert_eq!(records[0].amount, Decimal::new(15, 1));
}

#[test]
fn categories_and_init_user() {
    let (url, server) = serve_once("200 OK", r#"[{"id":1,"name":"Food"}]"#);
    let cats = backend(url, RouteStyle::Records).categories().unwrap();
    let req = server.join().unwrap();
    assert_eq!(request_line(&req), "GET /api/categories HTTP/1.1");
    assert_eq!(cats[0].name, "Food");

    let (url, server) = serve_once("201 Created", "{}");
    backend(url, RouteStyle::Records)
        .init_user(&minifin::models::UserProfile {
            user_id: "42".into(),
            currency: "$".into(),
            start_balance: Some(Decimal::new(100, 0)),
        })
        .unwrap();
    let req = server.join().unwrap();
    assert_eq!(request_line(&req), "POST /api/init_user HTTP/1.1");
    assert_eq!(
        request_body(&req),
        json!({"user_id": "42", "currency": "$", "start_balance": 100.0})
    );
}

#[test]
fn server_error_surfaces_status_and_body() {
    let (url, server) = serve_once("500 Internal Server Error", r#"{"detail":"db down"}"#);
    let err = backend(url, RouteStyle::Records)
        .report("42", Period::Day)
        .unwrap_err();
    server.join().unwrap();
    match err {
        Error::Status { code, body } => {
            assert_eq!(code, 500);
            assert!(body.contains("db down"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}
