//! Task lifecycle tests against a scripted local HTTP server.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use aml_provider::{Chain, FetchRequest, GraphProvider, ProviderConfig, ProviderError, TrustInClient};

/// One recorded request: request target (path + query) and body.
#[derive(Debug)]
struct Seen {
    target: String,
    body: String,
}

/// Serve the scripted responses, one connection each, and record what arrived.
async fn scripted_server(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<Seen>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            seen.push(read_request(&mut socket).await);

            let reply = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        seen
    });
    (base, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Seen {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(split) = text.find("\r\n\r\n") {
            let head = &text[..split];
            let length = head
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if buf.len() >= split + 4 + length || n == 0 {
                let target = head
                    .lines()
                    .next()
                    .and_then(|l| l.split_whitespace().nth(1))
                    .unwrap_or_default()
                    .to_string();
                let body = text[split + 4..].to_string();
                return Seen { target, body };
            }
        }
        if n == 0 {
            return Seen { target: String::new(), body: String::new() };
        }
    }
}

fn config(base: &str, retries: u32) -> ProviderConfig {
    ProviderConfig {
        api_key: Some("test-key".into()),
        base_url: base.to_string(),
        max_retries: retries,
        poll_interval: Duration::from_millis(5),
        request_timeout: Duration::from_secs(5),
        ..ProviderConfig::default()
    }
}

#[tokio::test]
async fn submit_poll_result_round() {
    let graph = json!({ "paths": [{ "direction": -1, "path": [{ "address": "S" }, { "address": "TXyz" }] }], "tags": [] });
    let (base, server) = scripted_server(vec![
        (200, json!({ "code": 0, "data": 4242 }).to_string()),
        (200, json!({ "code": 0, "data": "running" }).to_string()),
        (200, json!({ "code": 0, "data": "finished" }).to_string()),
        (200, json!({ "code": 0, "msg": "ok", "data": graph.to_string() }).to_string()),
    ])
    .await;

    let client = TrustInClient::new(config(&base, 5)).unwrap();
    let mut request = FetchRequest::new(Chain::Tron, "TXyz");
    request.inflow_hops = 2;
    let fetched = client.fetch_graph(&request).await.unwrap();

    assert_eq!(fetched.graph_data["data"], graph);
    let doc = fetched.document().unwrap();
    assert_eq!(doc.paths().len(), 1);

    let seen = server.await.unwrap();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[0].target, "/submit_task?apikey=test-key");
    let submit: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(submit["chain_name"], "Tron");
    assert_eq!(submit["inflow_hops"], 2);
    assert_eq!(seen[1].target, "/get_status?apikey=test-key");
    assert_eq!(serde_json::from_str::<Value>(&seen[1].body).unwrap(), json!({ "task_id": 4242 }));
    assert_eq!(
        serde_json::from_str::<Value>(&seen[3].body).unwrap(),
        json!({ "task_id": 4242, "token": "usdt" })
    );
}

#[tokio::test]
async fn unauthorized_is_reported() {
    let (base, _server) = scripted_server(vec![(401, "{}".to_string())]).await;
    let client = TrustInClient::new(config(&base, 1)).unwrap();

    let err = client.fetch_graph(&FetchRequest::new(Chain::Ethereum, "0xabc")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Unauthorized));
}

#[tokio::test]
async fn rejected_submit_carries_message() {
    let (base, _server) =
        scripted_server(vec![(200, json!({ "code": 7, "msg": "quota exceeded" }).to_string())]).await;
    let client = TrustInClient::new(config(&base, 1)).unwrap();

    let err = client.fetch_graph(&FetchRequest::new(Chain::Bitcoin, "bc1q")).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to submit task: quota exceeded");
}

#[tokio::test]
async fn polling_gives_up_after_max_retries() {
    let (base, server) = scripted_server(vec![
        (200, json!({ "code": 0, "data": "t-1" }).to_string()),
        (200, json!({ "code": 0, "data": "running" }).to_string()),
        (200, json!({ "code": 0, "data": "running" }).to_string()),
    ])
    .await;
    let client = TrustInClient::new(config(&base, 2)).unwrap();

    let err = client.fetch_graph(&FetchRequest::new(Chain::Solana, "So1")).await.unwrap_err();
    assert!(matches!(err, ProviderError::TaskTimedOut { attempts: 2, .. }));
    assert_eq!(server.await.unwrap().len(), 3);
}
