//! Gemini source against a mock server

use mcq_engine::{GenerationError, QuestionSource, Topic};
use mcq_providers::gemini::build_prompt;
use mcq_types::{CorrectAnswer, OptionKey};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    TEST_API_KEY, envelope, gemini_config, gemini_source, generate_path, mount_envelope,
    mount_error, mount_questions, photosynthesis_questions,
};

fn topic(raw: &str) -> Topic {
    Topic::new(raw).unwrap()
}

#[tokio::test]
async fn request_carries_key_prompt_and_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path()))
        .and(header("x-goog-api-key", TEST_API_KEY))
        .and(body_partial_json(json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": build_prompt("Photosynthesis", 5)}]
            }],
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(&photosynthesis_questions().to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let drafts = gemini_source(&server)
        .generate(&topic("Photosynthesis"))
        .await
        .unwrap();

    assert_eq!(drafts.len(), 5);
    assert_eq!(
        drafts[0].question,
        "Which pigment absorbs light in photosynthesis?"
    );
    assert_eq!(drafts[0].options.b, "Chlorophyll");
    assert_eq!(drafts[3].correct_answer, CorrectAnswer::Key(OptionKey::D));
    assert_eq!(drafts[4].explanation, "RuBisCO attaches CO2 to RuBP.");
}

#[tokio::test]
async fn fenced_json_is_accepted() {
    let server = MockServer::start().await;
    let fenced = format!("```json\n{}\n```", photosynthesis_questions());
    mount_envelope(&server, envelope(&fenced)).await;

    let drafts = gemini_source(&server)
        .generate(&topic("Photosynthesis"))
        .await
        .unwrap();
    assert_eq!(drafts.len(), 5);
}

#[tokio::test]
async fn unexpected_count_is_still_returned() {
    let server = MockServer::start().await;
    let mut questions = photosynthesis_questions();
    questions.as_array_mut().unwrap().truncate(3);
    mount_questions(&server, &questions).await;

    let drafts = gemini_source(&server)
        .generate(&topic("Photosynthesis"))
        .await
        .unwrap();
    assert_eq!(drafts.len(), 3);
}

#[tokio::test]
async fn lowercase_and_unknown_answers_survive_parsing() {
    let server = MockServer::start().await;
    let mut questions = photosynthesis_questions();
    questions[0]["correctAnswer"] = json!(" b ");
    questions[1]["correctAnswer"] = json!("E");
    mount_questions(&server, &questions).await;

    let drafts = gemini_source(&server)
        .generate(&topic("Photosynthesis"))
        .await
        .unwrap();
    assert_eq!(drafts[0].correct_answer, CorrectAnswer::Key(OptionKey::B));
    assert!(matches!(
        drafts[1].correct_answer,
        CorrectAnswer::Unrecognized(_)
    ));
}

#[tokio::test]
async fn http_error_maps_to_api_error() {
    let server = MockServer::start().await;
    mount_error(&server, 400, "API key not valid").await;

    let err = gemini_source(&server)
        .generate(&topic("Photosynthesis"))
        .await
        .unwrap_err();
    match err {
        GenerationError::Api { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("API key not valid"), "{body}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_text_is_malformed() {
    let server = MockServer::start().await;
    mount_envelope(&server, envelope("Sure! Here are five questions...")).await;

    let err = gemini_source(&server)
        .generate(&topic("Photosynthesis"))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Malformed(_)), "{err:?}");
}

#[tokio::test]
async fn empty_array_is_an_empty_response() {
    let server = MockServer::start().await;
    mount_questions(&server, &json!([])).await;

    let err = gemini_source(&server)
        .generate(&topic("Photosynthesis"))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse), "{err:?}");
}

#[tokio::test]
async fn blocked_prompt_is_reported() {
    let server = MockServer::start().await;
    mount_envelope(
        &server,
        json!({"promptFeedback": {"blockReason": "SAFETY"}}),
    )
    .await;

    let err = gemini_source(&server)
        .generate(&topic("Photosynthesis"))
        .await
        .unwrap_err();
    match err {
        GenerationError::Blocked(reason) => assert_eq!(reason, "SAFETY"),
        other => panic!("expected Blocked, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_key_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = gemini_config(&server);
    config.api_key = Some("   ".to_string());
    let source = mcq_engine::GeminiSource::new(config).unwrap();

    let err = source.generate(&topic("Photosynthesis")).await.unwrap_err();
    assert!(matches!(err, GenerationError::MissingApiKey), "{err:?}");
}
