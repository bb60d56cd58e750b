//! Integration tests for the request client against a mocked endpoint

use mockito::Matcher;
use qa_agent::{ModelConfig, QaError, RequestClient};
use serde_json::{json, Value};

fn completion_body(message: Value) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000u32,
        "model": "deepseek/deepseek-r1:free",
        "choices": [{
            "index": 0,
            "message": message,
            "finish_reason": "stop",
            "logprobs": null
        }]
    })
    .to_string()
}

fn config_for(server: &mockito::Server) -> ModelConfig {
    ModelConfig::new(server.url(), "deepseek/deepseek-r1:free").with_api_key("test-key")
}

#[tokio::test]
async fn test_send_returns_first_choice_text() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "deepseek/deepseek-r1:free",
            "stream": false,
            "messages": [
                { "role": "system", "content": "You are a QA engineer." },
                { "role": "user", "content": "Analyze:\n\n1 passed" }
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": "All green.\nNo action needed."
        })))
        .expect(1)
        .create_async()
        .await;

    let client = RequestClient::new(&config_for(&server), "You are a QA engineer.").unwrap();
    let reply = client.send("Analyze:\n\n1 passed").await.unwrap();

    assert_eq!(reply, "All green.\nNo action needed.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_null_content_is_empty_response() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({ "role": "assistant", "content": null })))
        .expect(1)
        .create_async()
        .await;

    let client = RequestClient::new(&config_for(&server), "setup").unwrap();
    let result = client.send("hello").await;

    assert!(matches!(result, Err(QaError::EmptyResponse { refusal: None })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_content_carries_refusal() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({
            "role": "assistant",
            "content": "",
            "refusal": "I can't help with that."
        })))
        .create_async()
        .await;

    let client = RequestClient::new(&config_for(&server), "setup").unwrap();
    let err = client.send("hello").await.unwrap_err();

    match &err {
        QaError::EmptyResponse { refusal } => {
            assert_eq!(refusal.as_deref(), Some("I can't help with that."));
        }
        other => panic!("expected EmptyResponse, got {:?}", other),
    }
    assert!(err.to_string().contains("I can't help with that."));
}

#[tokio::test]
async fn test_backend_error_propagates() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "message": "model not found",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": null
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = RequestClient::new(&config_for(&server), "setup").unwrap();
    let result = client.send("hello").await;

    assert!(matches!(result, Err(QaError::Api(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_credential_makes_no_request() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let config = ModelConfig::new(server.url(), "deepseek/deepseek-r1:free");
    let result = RequestClient::new(&config, "setup");

    assert!(matches!(result, Err(QaError::MissingCredential)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_each_send_is_one_request() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(json!({ "role": "assistant", "content": "ok" })))
        .expect(2)
        .create_async()
        .await;

    let client = RequestClient::new(&config_for(&server), "setup").unwrap();
    assert_eq!(client.send("first").await.unwrap(), "ok");
    assert_eq!(client.send("second").await.unwrap(), "ok");

    mock.assert_async().await;
}
