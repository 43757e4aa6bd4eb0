//! Shared test utilities and fixtures
//!
//! Mock Gemini endpoints and ready-made quiz payloads.

#![allow(dead_code)]

use mcq_engine::{GeminiConfig, GeminiSource};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_MODEL: &str = "gemini-test";
pub const TEST_API_KEY: &str = "test-key";

pub fn generate_path() -> String {
    format!("/models/{TEST_MODEL}:generateContent")
}

/// A source pointed at the mock server.
pub fn gemini_source(server: &MockServer) -> GeminiSource {
    GeminiSource::new(gemini_config(server)).expect("client builds")
}

pub fn gemini_config(server: &MockServer) -> GeminiConfig {
    GeminiConfig {
        api_key: Some(TEST_API_KEY.to_string()),
        model: TEST_MODEL.to_string(),
        base_url: server.uri(),
        ..GeminiConfig::default()
    }
}

/// Five photosynthesis questions. Correct answers: B, A, C, D, B.
pub fn photosynthesis_questions() -> Value {
    json!([
        {
            "question": "Which pigment absorbs light in photosynthesis?",
            "options": {"A": "Hemoglobin", "B": "Chlorophyll", "C": "Melanin", "D": "Keratin"},
            "correctAnswer": "B",
            "explanation": "Chlorophyll absorbs red and blue light."
        },
        {
            "question": "Where do the light reactions take place?",
            "options": {"A": "Thylakoid membrane", "B": "Stroma", "C": "Nucleus", "D": "Cell wall"},
            "correctAnswer": "A",
            "explanation": "Photosystems sit in the thylakoid membrane."
        },
        {
            "question": "Which gas is released as a by-product?",
            "options": {"A": "Carbon dioxide", "B": "Nitrogen", "C": "Oxygen", "D": "Methane"},
            "correctAnswer": "C",
            "explanation": "Splitting water releases oxygen."
        },
        {
            "question": "What does the Calvin cycle produce?",
            "options": {"A": "ATP", "B": "Water", "C": "Oxygen", "D": "G3P sugar"},
            "correctAnswer": "D",
            "explanation": "Carbon fixation yields G3P."
        },
        {
            "question": "Which enzyme fixes carbon dioxide?",
            "options": {"A": "Amylase", "B": "RuBisCO", "C": "Lipase", "D": "Pepsin"},
            "correctAnswer": "B",
            "explanation": "RuBisCO attaches CO2 to RuBP."
        }
    ])
}

/// Wrap question JSON the way the API returns it: as text inside a candidate.
pub fn envelope(questions_text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": questions_text}]
            },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 120,
            "candidatesTokenCount": 480,
            "totalTokenCount": 600
        }
    })
}

/// Mount a successful generateContent response.
pub async fn mount_questions(server: &MockServer, questions: &Value) {
    mount_envelope(server, envelope(&questions.to_string())).await;
}

pub async fn mount_envelope(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount an HTTP error response with a Gemini-style error body.
pub async fn mount_error(server: &MockServer, status: u16, message: &str) {
    let body = json!({
        "error": {"code": status, "message": message, "status": "INVALID_ARGUMENT"}
    });
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}
