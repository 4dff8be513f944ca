//! End-to-end tests over a real socket.
//!
//! The service is spawned on a random port with a mock provider, so no
//! Gemini credentials are needed.

use ask_gemini_service::config::{AskGeminiConfig, GeminiSettings, DEFAULT_MODEL};
use ask_gemini_service::services::providers::mock::MockChatProvider;
use ask_gemini_service::services::ChatProvider;
use ask_gemini_service::startup::{AppState, Application};
use reqwest::Client;
use serde_json::json;
use service_core::config::Config;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

fn test_config() -> AskGeminiConfig {
    AskGeminiConfig {
        common: Config {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0, // Random port
            log_level: "debug".to_string(),
        },
        gemini: GeminiSettings {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(5),
        },
    }
}

/// Spawn the application on a random port and return the port number.
async fn spawn_app(provider: Option<Arc<dyn ChatProvider>>) -> u16 {
    let app = Application::build_with_state(test_config(), AppState::new(provider))
        .await
        .expect("Failed to build application");

    let port = app.port();

    // Spawn the server in the background
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    port
}

#[tokio::test]
async fn health_check_returns_ok() {
    let port = spawn_app(None).await;
    let client = Client::new();

    let response = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "ask-gemini-service");
}

#[tokio::test]
async fn ask_round_trip_over_http() {
    let provider: Arc<dyn ChatProvider> = Arc::new(MockChatProvider::replying("Hi there"));
    let port = spawn_app(Some(provider)).await;
    let client = Client::new();

    let response = client
        .post(format!("http://127.0.0.1:{}/", port))
        .json(&json!({"data": {"prompt": "Hello", "history": []}}))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({"result": {"text": "Hi there"}}));
}

#[tokio::test]
async fn build_without_api_key_leaves_provider_unset() {
    let app = Application::build(test_config())
        .await
        .expect("Failed to build application");
    let port = app.port();
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/", port))
        .json(&json!({"data": {"prompt": "Hello"}}))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body["error"]["message"],
        "The server is missing its API configuration."
    );
}
