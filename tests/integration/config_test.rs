//! Configuration loading tests

use kol_agent::config::{Config, LogFormat};
use kol_agent::retry::Backoff;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_example_config() {
    let file = write_config(include_str!("../../config.toml.example"));
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.server.webhook_path, "/webhook");
    assert_eq!(config.publish.char_limit, 280);
    assert_eq!(config.generation.backoff, Backoff::Linear);
}

#[test]
fn test_load_partial_config() {
    let file = write_config(
        r#"
        [pipeline]
        min_transaction_usd = "25.50"
        excluded_addresses = ["So11111111111111111111111111111111111111112"]

        [telemetry]
        log_format = "json"
        "#,
    );
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.pipeline.min_transaction_usd, Some(dec!(25.50)));
    assert_eq!(config.pipeline.excluded_addresses.len(), 1);
    assert_eq!(config.telemetry.log_format, LogFormat::Json);
    assert_eq!(config.server.listen.port(), 3000);
    assert_eq!(config.generation.max_attempts, 3);
}

#[test]
fn test_load_rejects_invalid_values() {
    let file = write_config(
        r#"
        [publish]
        max_attempts = 0
        "#,
    );
    assert!(Config::load(file.path()).is_err());

    let file = write_config(
        r#"
        [server]
        webhook_path = "no-slash"
        "#,
    );
    assert!(Config::load(file.path()).is_err());
}

#[test]
fn test_load_rejects_bad_toml() {
    let file = write_config("[server\nlisten = ");
    assert!(Config::load(file.path()).is_err());
}
