//! HTTP-level tests for the Gemini client against a local mock server.

use azai_abstraction::{AspectRatio, Attachment, Model, ModelError, ModelParameters, ModelRequest};
use azai_models::GeminiModel;
use mockito::{Matcher, Server};
use serde_json::json;

fn model_for(server: &Server) -> GeminiModel {
    GeminiModel::with_api_key("test-model".to_string(), "test-key".to_string())
        .with_base_url(server.url())
}

#[tokio::test]
async fn test_generate_sends_persona_framing_and_parses_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/models/test-model:generateContent")
        .match_query(Matcher::UrlEncoded("key".to_string(), "test-key".to_string()))
        .match_body(Matcher::PartialJson(json!({
            "systemInstruction": {"parts": [{"text": "You are concise."}]},
            "contents": [{"role": "user", "parts": [{"text": "What is Rust?"}]}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "A systems language."}]},
                    "finishReason": "STOP"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = ModelRequest::new("What is Rust?")
        .with_system_instruction("You are concise.")
        .with_parameters(ModelParameters::with_temperature(0.7));
    let response = model_for(&server).generate(&request).await.unwrap();

    assert_eq!(response.content, "A systems language.");
    assert!(response.image.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_image_request_returns_inline_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/models/test-model:generateContent")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": {"imageConfig": {"aspectRatio": "9:16"}}
        })))
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{
                    "content": {"parts": [
                        {"text": "A fox at dusk."},
                        {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
                    ]}
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = ModelRequest::new("draw a fox")
        .with_attachment(Some(Attachment::new("image/jpeg", vec![1, 2, 3])))
        .with_parameters(ModelParameters {
            aspect_ratio: Some(AspectRatio::Portrait),
            ..ModelParameters::default()
        });
    let response = model_for(&server).generate(&request).await.unwrap();

    assert_eq!(response.content, "A fox at dusk.");
    assert_eq!(response.image.unwrap().data, b"hello");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_grounded_request_collects_citations() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/test-model:generateContent")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"tools": [{"google_search": {}}]})))
        .with_status(200)
        .with_body(
            json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Sunny."}]},
                    "groundingMetadata": {"groundingChunks": [
                        {"web": {"uri": "https://weather.example/paris", "title": "Paris weather"}}
                    ]}
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = ModelRequest::new("current weather in Paris").with_parameters(ModelParameters {
        enable_grounding: true,
        ..ModelParameters::default()
    });
    let response = model_for(&server).generate(&request).await.unwrap();

    assert_eq!(response.citations.len(), 1);
    assert_eq!(response.citations[0].title, "Paris weather");
}

#[tokio::test]
async fn test_rate_limit_maps_to_quota_exceeded() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/test-model:generateContent")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(r#"{"error": {"status": "RESOURCE_EXHAUSTED"}}"#)
        .create_async()
        .await;

    let err = model_for(&server).generate(&ModelRequest::new("hi")).await.unwrap_err();
    assert!(matches!(err, ModelError::QuotaExceeded { ref provider, .. } if provider == "gemini"));
}

#[tokio::test]
async fn test_server_error_maps_to_response_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/test-model:generateContent")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = model_for(&server).generate(&ModelRequest::new("hi")).await.unwrap_err();
    assert!(matches!(err, ModelError::ModelResponseError(ref msg) if msg.contains("boom")));
}

#[tokio::test]
async fn test_malformed_body_maps_to_serialization_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/test-model:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = model_for(&server).generate(&ModelRequest::new("hi")).await.unwrap_err();
    assert!(matches!(err, ModelError::SerializationError(_)));
}
