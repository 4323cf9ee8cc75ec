//! End-to-end pipeline tests against HTTP fakes

use kol_agent::config::{Config, Credentials};
use kol_agent::generation::GenerationError;
use kol_agent::pipeline::{
    EventPipeline, PipelineError, PipelineOutcome, RejectReason, TransferEvent,
};
use kol_agent::post::PublishError;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MINT: &str = "FooMint1111111111111111111111111111111111111";

struct Fakes {
    dex: MockServer,
    openai: MockServer,
    twitter: MockServer,
}

impl Fakes {
    async fn start() -> Self {
        Self {
            dex: MockServer::start().await,
            openai: MockServer::start().await,
            twitter: MockServer::start().await,
        }
    }

    fn config(&self) -> Config {
        let mut config = Config::default();
        config.pipeline.min_transaction_usd = Some(dec!(25));
        config.price.base_url = self.dex.uri();
        config.generation.base_url = self.openai.uri();
        config.generation.base_delay_ms = 1;
        config.publish.base_url = self.twitter.uri();
        config.publish.retry_delay_ms = 1;
        config
    }

    fn pipeline(&self, config: &Config) -> EventPipeline {
        let credentials = Credentials {
            openai_api_key: Some("sk-test".to_string()),
            twitter_access_token: Some("tw-test".to_string()),
        };
        EventPipeline::from_config(config, &credentials).unwrap()
    }

    async fn price(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/latest/dex/tokens/.+$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.dex)
            .await;
    }

    async fn completion(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]
            })))
            .mount(&self.openai)
            .await;
    }

    async fn tweet_ok(&self) {
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .and(header("authorization", "Bearer tw-test"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"id": "1850000000000000001", "text": "ignored"}
            })))
            .mount(&self.twitter)
            .await;
    }

    async fn requests(server: &MockServer) -> Vec<wiremock::Request> {
        server.received_requests().await.unwrap_or_default()
    }
}

fn foo_pairs(price: &str) -> Value {
    json!({
        "schemaVersion": "1.0.0",
        "pairs": [{
            "chainId": "solana",
            "baseToken": {"address": MINT, "name": "Foo Coin", "symbol": "FOO"},
            "priceUsd": price
        }]
    })
}

#[tokio::test]
async fn test_eligible_transfer_is_published() {
    let fakes = Fakes::start().await;
    fakes.price(foo_pairs("0.05")).await;
    fakes
        .completion("\"FOO is heating up. Holders know what's coming! #FOO #Solana\"")
        .await;
    fakes.tweet_ok().await;

    let config = fakes.config();
    let outcome = fakes
        .pipeline(&config)
        .process(TransferEvent::new(MINT, dec!(1000)))
        .await
        .unwrap();

    let PipelineOutcome::Published { post_id, text } = outcome else {
        panic!("expected a published post, got {:?}", outcome);
    };
    assert_eq!(post_id, "1850000000000000001");
    assert!(text.ends_with("\n\n#FOO"));
    assert_eq!(text.matches('#').count(), 1);
    assert!(text.chars().count() <= 280);
    assert!(!text.starts_with('"'));
    assert_eq!(text, "FOO is heating up. Holders know what's coming!\n\n#FOO");

    assert_eq!(Fakes::requests(&fakes.openai).await.len(), 1);
    let tweets = Fakes::requests(&fakes.twitter).await;
    assert_eq!(tweets.len(), 1);
    let body: Value = serde_json::from_slice(&tweets[0].body).unwrap();
    assert_eq!(body["text"], Value::String(text));
}

#[tokio::test]
async fn test_generation_request_shape() {
    let fakes = Fakes::start().await;
    fakes.price(foo_pairs("0.05")).await;
    fakes.completion("gm").await;
    fakes.tweet_ok().await;

    let config = fakes.config();
    fakes
        .pipeline(&config)
        .process(TransferEvent::new(MINT, dec!(1000)))
        .await
        .unwrap();

    let requests = Fakes::requests(&fakes.openai).await;
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4");
    assert_eq!(body["max_tokens"], 100);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.first().unwrap()["role"], "system");
    let user = messages.last().unwrap();
    assert_eq!(user["role"], "user");
    assert!(user["content"].as_str().unwrap().contains(MINT));
}

#[tokio::test]
async fn test_below_threshold_makes_no_downstream_calls() {
    let fakes = Fakes::start().await;
    fakes.price(foo_pairs("0.001")).await;
    fakes.completion("gm").await;
    fakes.tweet_ok().await;

    let config = fakes.config();
    let outcome = fakes
        .pipeline(&config)
        .process(TransferEvent::new(MINT, dec!(1000)))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        PipelineOutcome::Skipped(RejectReason::BelowThreshold {
            value: dec!(1),
            minimum: dec!(25),
        })
    );
    assert!(Fakes::requests(&fakes.openai).await.is_empty());
    assert!(Fakes::requests(&fakes.twitter).await.is_empty());
}

#[tokio::test]
async fn test_empty_pairs_is_unknown_token() {
    let fakes = Fakes::start().await;
    fakes.price(json!({"schemaVersion": "1.0.0", "pairs": []})).await;
    fakes.completion("gm").await;

    let config = fakes.config();
    let outcome = fakes
        .pipeline(&config)
        .process(TransferEvent::new(MINT, dec!(1000)))
        .await
        .unwrap();

    assert_eq!(outcome, PipelineOutcome::Skipped(RejectReason::UnknownToken));
    assert!(Fakes::requests(&fakes.openai).await.is_empty());
}

#[tokio::test]
async fn test_price_index_outage_is_unknown_token() {
    let fakes = Fakes::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&fakes.dex)
        .await;

    let config = fakes.config();
    let outcome = fakes
        .pipeline(&config)
        .process(TransferEvent::new(MINT, dec!(1000)))
        .await
        .unwrap();

    assert_eq!(outcome, PipelineOutcome::Skipped(RejectReason::UnknownToken));
}

#[tokio::test]
async fn test_excluded_address_makes_no_calls() {
    let fakes = Fakes::start().await;
    fakes.price(foo_pairs("100")).await;

    let mut config = fakes.config();
    config.pipeline.excluded_addresses = vec![MINT.to_string()];
    let outcome = fakes
        .pipeline(&config)
        .process(TransferEvent::new(MINT, dec!(1000)))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        PipelineOutcome::Skipped(RejectReason::ExcludedAddress)
    );
    assert!(Fakes::requests(&fakes.dex).await.is_empty());
    assert!(Fakes::requests(&fakes.openai).await.is_empty());
    assert!(Fakes::requests(&fakes.twitter).await.is_empty());
}

#[tokio::test]
async fn test_persistent_generation_rate_limit_uses_budget() {
    let fakes = Fakes::start().await;
    fakes.price(foo_pairs("0.05")).await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&fakes.openai)
        .await;

    let mut config = fakes.config();
    config.generation.max_attempts = 4;
    let err = fakes
        .pipeline(&config)
        .process(TransferEvent::new(MINT, dec!(1000)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::GenerationFailed(GenerationError::RetriesExhausted { attempts: 4 })
    ));
    assert_eq!(Fakes::requests(&fakes.openai).await.len(), 4);
    assert!(Fakes::requests(&fakes.twitter).await.is_empty());
}

#[tokio::test]
async fn test_persistent_publish_rate_limit_uses_budget() {
    let fakes = Fakes::start().await;
    fakes.price(foo_pairs("0.05")).await;
    fakes.completion("gm").await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(429).insert_header("x-rate-limit-reset", "1700000000"))
        .mount(&fakes.twitter)
        .await;

    let config = fakes.config();
    let err = fakes
        .pipeline(&config)
        .process(TransferEvent::new(MINT, dec!(1000)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::PublishFailed(PublishError::RetriesExhausted { attempts: 3 })
    ));
    assert_eq!(Fakes::requests(&fakes.twitter).await.len(), 3);
}

#[tokio::test]
async fn test_publish_rejection_is_not_retried() {
    let fakes = Fakes::start().await;
    fakes.price(foo_pairs("0.05")).await;
    fakes.completion("gm").await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "title": "Forbidden",
            "detail": "You are not allowed to create a Tweet with duplicate content.",
            "status": 403
        })))
        .mount(&fakes.twitter)
        .await;

    let config = fakes.config();
    let err = fakes
        .pipeline(&config)
        .process(TransferEvent::new(MINT, dec!(1000)))
        .await
        .unwrap_err();

    match err {
        PipelineError::PublishFailed(PublishError::Rejected { status, title, detail }) => {
            assert_eq!(status, 403);
            assert_eq!(title.as_deref(), Some("Forbidden"));
            assert!(detail.contains("duplicate"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(Fakes::requests(&fakes.twitter).await.len(), 1);
}

#[tokio::test]
async fn test_dry_run_skips_twitter() {
    let fakes = Fakes::start().await;
    fakes.price(foo_pairs("0.05")).await;
    fakes.completion("gm").await;
    fakes.tweet_ok().await;

    let mut config = fakes.config();
    config.publish.dry_run = true;
    let credentials = Credentials {
        openai_api_key: Some("sk-test".to_string()),
        twitter_access_token: None,
    };
    let outcome = EventPipeline::from_config(&config, &credentials)
        .unwrap()
        .process(TransferEvent::new(MINT, dec!(1000)))
        .await
        .unwrap();

    let PipelineOutcome::Published { post_id, text } = outcome else {
        panic!("expected a published post");
    };
    assert!(post_id.starts_with("dry-run-"));
    assert_eq!(text, "gm\n\n#FOO");
    assert!(Fakes::requests(&fakes.twitter).await.is_empty());
}

#[tokio::test]
async fn test_missing_credentials_fail_at_construction() {
    let config = Config::default();
    assert!(EventPipeline::from_config(&config, &Credentials::default()).is_err());

    let credentials = Credentials {
        openai_api_key: Some("sk-test".to_string()),
        twitter_access_token: None,
    };
    assert!(EventPipeline::from_config(&config, &credentials).is_err());
}
