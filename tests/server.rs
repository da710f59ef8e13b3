//! End-to-end tests: real sockets, the bridge and a handler.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use message_bridge::message::Stream;
use message_bridge::{BridgeConfig, EchoHandler, Handler, Response, ServerRequest, UriOptions};

use common::{send_raw, start_bridge};

/// Replies with a custom reason phrase and a split set of headers.
struct TeapotHandler;

impl Handler for TeapotHandler {
    async fn handle(&self, _request: ServerRequest) -> Response {
        Response::new(StatusCode::IM_A_TEAPOT, "Short And Stout")
            .with_header("X-Tea", vec!["green".into(), "black".into()])
            .with_body(Stream::from_bytes("tip me over"))
    }
}

fn config_with(uri: UriOptions) -> BridgeConfig {
    BridgeConfig {
        uri,
        ..BridgeConfig::default()
    }
}

#[tokio::test]
async fn test_echo_query_and_cookies() {
    let (addr, shutdown) = start_bridge(BridgeConfig::default(), EchoHandler::new(1024)).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{addr}/users?filter[name]=ann&tags[]=a&tags[]=b"))
        .header("Cookie", "session=abc; theme=dark")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["method"], "GET");
    assert_eq!(body["protocol_version"], "1.1");
    assert_eq!(
        body["uri"],
        format!("http://{addr}/users?filter[name]=ann&tags[]=a&tags[]=b")
    );
    assert_eq!(body["query"]["filter"], json!({ "name": "ann" }));
    assert_eq!(body["query"]["tags"], json!(["a", "b"]));
    assert_eq!(body["cookies"], json!({ "session": "abc", "theme": "dark" }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_echo_post_body() {
    let (addr, shutdown) = start_bridge(BridgeConfig::default(), EchoHandler::new(1024)).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{addr}/submit"))
        .body("payload")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["method"], "POST");
    assert_eq!(body["body"], "payload");

    shutdown.trigger();
}

#[tokio::test]
async fn test_echo_rejects_oversized_body() {
    let (addr, shutdown) = start_bridge(BridgeConfig::default(), EchoHandler::new(4)).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{addr}/submit"))
        .body("far too long")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 413);

    shutdown.trigger();
}

#[tokio::test]
async fn test_host_header_drives_uri() {
    let (addr, shutdown) = start_bridge(BridgeConfig::default(), EchoHandler::new(1024)).await;

    let reply = send_raw(
        addr,
        "GET /a/b?x=1 HTTP/1.1\r\nHost: example.com:9000\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(reply.contains(r#""uri":"http://example.com:9000/a/b?x=1""#));

    shutdown.trigger();
}

#[tokio::test]
async fn test_trust_proxy_headers() {
    let config = config_with(UriOptions::TrustProxyHeaders);
    let (addr, shutdown) = start_bridge(config, EchoHandler::new(1024)).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{addr}/orders"))
        .header("X-Forwarded-Proto", "https")
        .header("X-Forwarded-Host", "shop.example.com")
        .header("X-Forwarded-Port", "8443")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["uri"], "https://shop.example.com:8443/orders");

    shutdown.trigger();
}

#[tokio::test]
async fn test_trust_proxy_headers_missing() {
    let config = config_with(UriOptions::TrustProxyHeaders);
    let (addr, shutdown) = start_bridge(config, EchoHandler::new(1024)).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{addr}/orders"))
        .header("X-Forwarded-Proto", "https")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    assert_eq!(
        res.text().await.unwrap(),
        r#"Missing "x-forwarded-host", "x-forwarded-port" header(s)."#
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_override_scheme_and_host() {
    let config = config_with(UriOptions::override_scheme_and_host("https", "api.example.com"));
    let (addr, shutdown) = start_bridge(config, EchoHandler::new(1024)).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{addr}/v1/items?page=2"))
        .send()
        .await
        .unwrap();

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["uri"], "https://api.example.com/v1/items?page=2");
    assert_eq!(body["query"]["page"], "2");

    shutdown.trigger();
}

#[tokio::test]
async fn test_custom_reason_phrase_and_headers() {
    let (addr, shutdown) = start_bridge(BridgeConfig::default(), TeapotHandler).await;

    let reply = send_raw(
        addr,
        "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    let lower = reply.to_ascii_lowercase();

    assert!(reply.starts_with("HTTP/1.1 418 Short And Stout\r\n"));
    assert!(lower.contains("x-tea: green\r\n"));
    assert!(lower.contains("x-tea: black\r\n"));
    assert!(reply.contains("tip me over"));

    shutdown.trigger();
}
