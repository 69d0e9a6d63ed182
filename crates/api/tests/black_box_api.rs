use std::time::Duration;

use inkshop_api::config::Config;
use reqwest::StatusCode;
use serde_json::{Value, json};

const SESSION_HEADER: &str = "x-session-id";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(vars: &[(&str, &str)]) -> Self {
        inkshop_observability::tracing::init_for_tests();

        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = Config::from_lookup(|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .expect("valid test config");

        // Build app (same router as prod), but bind to an ephemeral port.
        let app = inkshop_api::app::build_app(&config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn abc() -> Self {
        Self::spawn(&[
            ("INKSHOP_CATALOG", "A=10.00;B=12.50;C=8.00"),
            ("INKSHOP_CURRENCY", "$"),
        ])
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn open_session(client: &reqwest::Client, server: &TestServer) -> String {
    let res = client.post(server.url("/sessions")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["session_id"].as_str().unwrap().to_string()
}

async fn get_json(client: &reqwest::Client, server: &TestServer, session: &str, path: &str) -> Value {
    let res = client
        .get(server.url(path))
        .header(SESSION_HEADER, session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK, "GET {path}");
    res.json().await.unwrap()
}

async fn purchase(client: &reqwest::Client, server: &TestServer, session: &str, selection: Value) -> Value {
    let res = client
        .post(server.url("/purchase"))
        .header(SESSION_HEADER, session)
        .json(&json!({ "selection": selection }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

fn names(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::abc().await;
    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn default_catalog_is_served_in_display_order() {
    let server = TestServer::spawn(&[]).await;
    let client = reqwest::Client::new();
    let session = open_session(&client, &server).await;

    let catalog = get_json(&client, &server, &session, "/catalog").await;
    assert_eq!(
        names(&catalog["items"]),
        vec!["Space Cat", "Blue Dragon", "Pixel Unicorn", "Retro Robot", "Magic Forest"]
    );
    assert_eq!(catalog["items"][4]["price"], "9.99");
    assert_eq!(catalog["version"], 0);
}

#[tokio::test]
async fn purchase_removes_items_and_reports_total() {
    let server = TestServer::abc().await;
    let client = reqwest::Client::new();
    let session = open_session(&client, &server).await;

    let body = purchase(&client, &server, &session, json!({"A": true, "B": false, "C": true})).await;
    assert_eq!(body["message"], "You bought: A, C for $18.00");
    assert_eq!(body["purchased"], json!(["A", "C"]));
    assert_eq!(body["total"], "18.00");
    assert_eq!(names(&body["catalog"]), vec!["B"]);

    let catalog = get_json(&client, &server, &session, "/catalog").await;
    assert_eq!(names(&catalog["items"]), vec!["B"]);
    assert_eq!(catalog["items"][0]["price"], "12.50");

    let log = get_json(&client, &server, &session, "/purchases").await;
    assert_eq!(log["purchased"], json!(["A", "C"]));
    assert_eq!(log["spent"], "18.00");
}

#[tokio::test]
async fn empty_and_stale_selections_change_nothing() {
    let server = TestServer::abc().await;
    let client = reqwest::Client::new();
    let session = open_session(&client, &server).await;

    let body = purchase(&client, &server, &session, json!({})).await;
    assert_eq!(body["message"], "No drawing selected.");
    assert_eq!(body["purchased"], json!([]));
    assert_eq!(body["total"], "0.00");

    purchase(&client, &server, &session, json!({"B": true})).await;
    // Same selection again: B is gone, so nothing is selected.
    let again = purchase(&client, &server, &session, json!({"B": true, "Ghost": true})).await;
    assert_eq!(again["message"], "No drawing selected.");
    assert_eq!(names(&again["catalog"]), vec!["A", "C"]);

    let log = get_json(&client, &server, &session, "/purchases").await;
    assert_eq!(log["purchased"], json!(["B"]));

    let history = get_json(&client, &server, &session, "/history").await;
    let events = history["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_type"], "shop.items.purchased");
    assert_eq!(events[0]["sequence_number"], 1);
}

#[tokio::test]
async fn sessions_are_independent() {
    let server = TestServer::abc().await;
    let client = reqwest::Client::new();
    let first = open_session(&client, &server).await;
    let second = open_session(&client, &server).await;
    assert_ne!(first, second);

    purchase(&client, &server, &first, json!({"A": true})).await;

    let first_catalog = get_json(&client, &server, &first, "/catalog").await;
    let second_catalog = get_json(&client, &server, &second, "/catalog").await;
    assert_eq!(names(&first_catalog["items"]), vec!["B", "C"]);
    assert_eq!(names(&second_catalog["items"]), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn session_header_is_validated() {
    let server = TestServer::abc().await;
    let client = reqwest::Client::new();

    let missing = client.get(server.url("/catalog")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "missing_session");

    let malformed = client
        .get(server.url("/catalog"))
        .header(SESSION_HEADER, "not-a-uuid")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    let unknown = client
        .get(server.url("/catalog"))
        .header(SESSION_HEADER, "0191f3a0-0000-7000-8000-000000000000")
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ended_sessions_are_gone_and_free_capacity() {
    let server = TestServer::spawn(&[("INKSHOP_MAX_SESSIONS", "1")]).await;
    let client = reqwest::Client::new();
    let session = open_session(&client, &server).await;

    let full = client.post(server.url("/sessions")).send().await.unwrap();
    assert_eq!(full.status(), StatusCode::CONFLICT);

    let res = client
        .delete(server.url("/sessions/current"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(server.url("/catalog"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    open_session(&client, &server).await;
}

#[tokio::test]
async fn stream_notifies_catalog_updates() {
    let server = TestServer::abc().await;
    let client = reqwest::Client::new();
    let session = open_session(&client, &server).await;

    let mut stream = client
        .get(server.url("/stream"))
        .header(SESSION_HEADER, &session)
        .send()
        .await
        .unwrap();
    assert_eq!(stream.status(), StatusCode::OK);

    purchase(&client, &server, &session, json!({"C": true})).await;

    let received = tokio::time::timeout(Duration::from_secs(5), async {
        let mut buf = String::new();
        while let Some(chunk) = stream.chunk().await.unwrap() {
            buf.push_str(&String::from_utf8_lossy(&chunk));
            if buf.contains("\"remaining\"") {
                break;
            }
        }
        buf
    })
    .await
    .expect("no realtime event within timeout");

    assert!(received.contains("event: shop.catalog_updated"), "{received}");
    assert!(received.contains("\"remaining\":2"), "{received}");
}

#[tokio::test]
async fn idle_sessions_expire_and_free_capacity() {
    let server = TestServer::spawn(&[
        ("INKSHOP_MAX_SESSIONS", "2"),
        ("INKSHOP_SESSION_IDLE_SECS", "1"),
    ])
    .await;
    let client = reqwest::Client::new();
    let abandoned = open_session(&client, &server).await;
    open_session(&client, &server).await;

    let full = client.post(server.url("/sessions")).send().await.unwrap();
    assert_eq!(full.status(), StatusCode::CONFLICT);

    tokio::time::sleep(Duration::from_millis(2100)).await;

    open_session(&client, &server).await;
    open_session(&client, &server).await;

    let res = client
        .get(server.url("/catalog"))
        .header(SESSION_HEADER, &abandoned)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_purchases_on_one_session_buy_the_item_once() {
    let server = TestServer::spawn(&[("INKSHOP_CATALOG", "A=0.10;B=5.00")]).await;
    let client = reqwest::Client::new();
    let session = open_session(&client, &server).await;

    let requests: Vec<_> = (0..32)
        .map(|_| {
            let client = client.clone();
            let url = server.url("/purchase");
            let session = session.clone();
            tokio::spawn(async move {
                let res = client
                    .post(url)
                    .header(SESSION_HEADER, session)
                    .json(&json!({ "selection": {"A": true} }))
                    .send()
                    .await
                    .unwrap();
                assert_eq!(res.status(), StatusCode::OK);
                res.json::<Value>().await.unwrap()
            })
        })
        .collect();

    let mut successes = 0;
    for request in requests {
        let body = request.await.unwrap();
        if body["purchased"] == json!(["A"]) {
            successes += 1;
        } else {
            assert_eq!(body["message"], "No drawing selected.");
        }
    }
    assert_eq!(successes, 1);

    let log = get_json(&client, &server, &session, "/purchases").await;
    assert_eq!(log["purchased"], json!(["A"]));
    assert_eq!(log["spent"], "0.10");

    let catalog = get_json(&client, &server, &session, "/catalog").await;
    assert_eq!(names(&catalog["items"]), vec!["B"]);
}

#[tokio::test]
async fn malformed_selection_gets_json_error() {
    let server = TestServer::spawn(&[]).await;
    let client = reqwest::Client::new();
    let session = open_session(&client, &server).await;

    let res = client
        .post(server.url("/purchase"))
        .header(SESSION_HEADER, &session)
        .json(&json!({ "selection": {"Space Cat": "yes"} }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");
    assert!(body["message"].as_str().unwrap().contains("deserialize"));

    let catalog = get_json(&client, &server, &session, "/catalog").await;
    assert_eq!(catalog["items"].as_array().unwrap().len(), 5);
}
