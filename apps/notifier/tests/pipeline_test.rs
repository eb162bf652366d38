//! Full run against wiremock stand-ins for coins.ph, jsonbin and Telegram.

use notifier::{Config, Error, Pipeline, config::Endpoints};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOT: &str = "123:abc";
const BIN_ID: &str = "5f1a";
const SECRET: &str = "s3cret";

fn config(server: &MockServer) -> Config {
    Config {
        symbols: vec!["BTC-PHP".to_string(), "ETH-PHP".to_string()],
        bot_token: BOT.to_string(),
        store_secret: SECRET.to_string(),
        store_id: BIN_ID.to_string(),
        all_chat_id: "-100all".to_string(),
        single_chat_id: "-100btc".to_string(),
        endpoints: Endpoints {
            quotes: format!("{}/v2/markets?region=PH", server.uri()),
            store: format!("{}/b", server.uri()),
            telegram: server.uri(),
        },
        ..Config::default()
    }
}

async fn mount_quotes(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "markets": [
                {"symbol": "ETH-PHP", "product": "ETH", "ask": "120500.50"},
                {"symbol": "XRP-PHP", "product": "XRP", "ask": "28.10"},
                {"symbol": "BTC-PHP", "product": "BTC", "ask": "3500000"}
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_old(server: &MockServer, old: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/b/{BIN_ID}/latest")))
        .and(header("secret-key", SECRET))
        .respond_with(ResponseTemplate::new(200).set_body_json(old))
        .mount(server)
        .await;
}

fn sent_to(chat_id: &str, text: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path(format!("/bot{BOT}/sendMessage")))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "markdown"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
}

const ALL: &str = "BTC: *₱3,500,000 (+₱100,000)*\nETH: *₱120,500 (+₱500)*";
const SINGLE: &str = "*₱3,500,000 (+₱100,000)*";

fn baseline() -> Value {
    json!({
        "markets": [
            {"symbol": "BTC-PHP", "product": "BTC", "ask": "3400000", "amt": 3400000.0},
            {"symbol": "ETH-PHP", "product": "ETH", "ask": "120000.50", "amt": 120000.5}
        ]
    })
}

#[tokio::test]
async fn notifies_then_persists_ranked_selection() {
    let server = MockServer::start().await;
    mount_quotes(&server).await;
    mount_old(&server, baseline()).await;

    sent_to("-100all", ALL).expect(1).mount(&server).await;
    sent_to("-100btc", SINGLE).expect(1).mount(&server).await;

    Mock::given(method("PUT"))
        .and(path(format!("/b/{BIN_ID}")))
        .and(header("secret-key", SECRET))
        .and(body_json(json!({
            "markets": [
                {"symbol": "BTC-PHP", "product": "BTC", "ask": "3500000", "amt": 3500000.0},
                {"symbol": "ETH-PHP", "product": "ETH", "ask": "120500.50", "amt": 120500.5}
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server);
    let report = Pipeline::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.all_message.as_deref(), Some(ALL));
    assert_eq!(report.single_message.as_deref(), Some(SINGLE));
    assert!(ALL.lines().all(|line| line.contains("(+")));
    assert!(ALL.starts_with(&format!("BTC: {SINGLE}")));
}

#[tokio::test]
async fn store_failure_after_notify_is_reported() {
    let server = MockServer::start().await;
    mount_quotes(&server).await;
    mount_old(&server, baseline()).await;

    sent_to("-100all", ALL).expect(1).mount(&server).await;
    sent_to("-100btc", SINGLE).expect(0).mount(&server).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = config(&server);
    let err = Pipeline::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Market(market::Error::Store(_))));
}

#[tokio::test]
async fn bad_price_aborts_before_any_request_to_store() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "markets": [{"symbol": "BTC-PHP", "product": "BTC", "ask": "--"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/b/{BIN_ID}/latest")))
        .respond_with(ResponseTemplate::new(200).set_body_json(baseline()))
        .expect(0)
        .mount(&server)
        .await;

    let config = config(&server);
    let err = Pipeline::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Market(market::Error::Parse { .. })));
}

#[tokio::test]
async fn empty_baseline_skips_messages_but_persists() {
    let server = MockServer::start().await;
    mount_quotes(&server).await;
    mount_old(&server, json!({"markets": []})).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/b/{BIN_ID}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server);
    let report = Pipeline::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.all_message, None);
    assert_eq!(report.single_message, None);
}

#[tokio::test]
async fn telegram_rejection_is_a_notify_error() {
    let server = MockServer::start().await;
    mount_quotes(&server).await;
    mount_old(&server, baseline()).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = config(&server);
    let err = Pipeline::from_config(&config)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    match err {
        Error::Notify { chat_id, .. } => assert_eq!(chat_id, "-100all"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn settings_are_fixed_when_the_pipeline_is_built() {
    let server = MockServer::start().await;
    mount_quotes(&server).await;
    mount_old(&server, baseline()).await;

    sent_to("-100all", ALL).expect(1).mount(&server).await;
    sent_to("-100btc", SINGLE).expect(1).mount(&server).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config(&server);
    let pipeline = Pipeline::from_config(&config).unwrap();

    config.symbols = vec!["XRP-PHP".to_string()];
    config.all_chat_id = "-100other".to_string();
    config.single_symbol = "XRP-PHP".to_string();

    let report = pipeline.run().await.unwrap();
    assert_eq!(report.all_message.as_deref(), Some(ALL));
    assert_eq!(report.single_message.as_deref(), Some(SINGLE));
    drop(config);
}
