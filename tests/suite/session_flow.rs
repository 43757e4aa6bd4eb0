//! End-to-end quiz rounds through the app against a mock Gemini server

use std::sync::Arc;
use std::time::Duration;

use mcq_engine::{
    App, AppOptions, ExportRequest, GENERATION_FAILED_MESSAGE, OptionKey, StatusTier, View,
};
use wiremock::MockServer;

use crate::common::{gemini_source, mount_error, mount_questions, photosynthesis_questions};

fn app_for(server: &MockServer) -> App {
    App::new(
        Arc::new(gemini_source(server)),
        None,
        AppOptions::default(),
    )
}

async fn settle(app: &mut App) {
    for _ in 0..1000 {
        app.tick();
        if !app.is_generating() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("generation did not settle");
}

#[tokio::test]
async fn photosynthesis_round_scores_three_of_five() {
    let server = MockServer::start().await;
    mount_questions(&server, &photosynthesis_questions()).await;

    let mut app = app_for(&server);
    app.topic_insert_text("Photosynthesis");
    app.generate().unwrap();
    settle(&mut app).await;
    assert_eq!(app.view(), View::Quiz);
    assert_eq!(app.session().questions().len(), 5);

    // Correct: B, A, C, D, B. The last two are answered wrong.
    for key in [
        OptionKey::B,
        OptionKey::A,
        OptionKey::C,
        OptionKey::A,
        OptionKey::C,
    ] {
        app.select_focused(key).unwrap();
    }
    assert!(app.finish());
    assert_eq!(app.view(), View::Results);

    let score = app.session().score();
    assert_eq!((score.correct, score.total), (3, 5));
    assert_eq!(app.session().percentage(), Some(60));
    assert_eq!(app.session().status_tier(), Some(StatusTier::Mid));

    app.print_results();
    let Some(ExportRequest::Print { topic, report }) = app.take_export() else {
        panic!("expected a print export");
    };
    assert_eq!(topic, "Photosynthesis");
    assert!(report.contains("Correct: 3 / 5"));
    assert!(report.contains("Score: 60%"));
    assert!(report.contains("Status: Good job! You have a solid understanding."));

    app.reset();
    assert_eq!(app.view(), View::Landing);
    assert!(app.session().questions().is_empty());
    assert_eq!(app.session().topic(), "");
}

#[tokio::test]
async fn answers_can_change_before_finishing() {
    let server = MockServer::start().await;
    mount_questions(&server, &photosynthesis_questions()).await;

    let mut app = app_for(&server);
    app.topic_insert_text("Photosynthesis");
    app.generate().unwrap();
    settle(&mut app).await;

    let first = app.session().questions()[0].id().clone();
    app.select(&first, OptionKey::A).unwrap();
    app.select(&first, OptionKey::B).unwrap();
    assert_eq!(app.session().answer_for(&first), Some(OptionKey::B));
    assert_eq!(app.session().answered_count(), 1);
}

#[tokio::test]
async fn api_failure_shows_retry_message() {
    let server = MockServer::start().await;
    mount_error(&server, 503, "The model is overloaded").await;

    let mut app = app_for(&server);
    app.topic_insert_text("Photosynthesis");
    app.generate().unwrap();
    settle(&mut app).await;

    assert_eq!(app.view(), View::Landing);
    assert_eq!(app.session().error(), Some(GENERATION_FAILED_MESSAGE));
    assert!(app.session().questions().is_empty());

    // The topic is kept, so a retry is one keypress away.
    assert_eq!(app.topic_input().text(), "Photosynthesis");
}

#[tokio::test]
async fn copy_transcript_lists_every_question() {
    let server = MockServer::start().await;
    mount_questions(&server, &photosynthesis_questions()).await;

    let mut app = app_for(&server);
    app.topic_insert_text("Photosynthesis");
    app.generate().unwrap();
    settle(&mut app).await;

    app.copy_questions();
    let Some(ExportRequest::Clipboard { text }) = app.take_export() else {
        panic!("expected a clipboard export");
    };
    assert!(text.starts_with(
        "Q1: Which pigment absorbs light in photosynthesis?\nA) Hemoglobin\nB) Chlorophyll\n"
    ));
    assert!(text.contains("Correct: B\nExplanation: Chlorophyll absorbs red and blue light.\n\n"));
    assert!(text.contains("Q5: Which enzyme fixes carbon dioxide?"));
}
