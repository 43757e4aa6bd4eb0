//! Shared fixtures for rendering and input tests.

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use mcq_engine::mcq_types::Options;
use mcq_engine::{
    App, AppOptions, CorrectAnswer, GenerationError, OptionKey, QuestionDraft, QuestionSource,
    Topic,
};

/// Answers: B, A, D, C, B.
pub(crate) struct FixedSource;

impl QuestionSource for FixedSource {
    fn generate<'a>(
        &'a self,
        _topic: &'a Topic,
    ) -> BoxFuture<'a, Result<Vec<QuestionDraft>, GenerationError>> {
        async move {
            let keys = [
                OptionKey::B,
                OptionKey::A,
                OptionKey::D,
                OptionKey::C,
                OptionKey::B,
            ];
            Ok(keys
                .into_iter()
                .enumerate()
                .map(|(i, key)| {
                    let n = i + 1;
                    QuestionDraft {
                        question: format!("Which pigment drives step {n}?"),
                        options: Options {
                            a: format!("Carotene {n}"),
                            b: format!("Chlorophyll {n}"),
                            c: format!("Xanthophyll {n}"),
                            d: format!("Anthocyanin {n}"),
                        },
                        correct_answer: CorrectAnswer::Key(key),
                        explanation: format!("Step {n} absorbs red and blue light."),
                    }
                })
                .collect())
        }
        .boxed()
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

pub(crate) fn landing_app() -> App {
    App::new(Arc::new(FixedSource), None, AppOptions::default())
}

pub(crate) async fn settle(app: &mut App) {
    for _ in 0..400 {
        app.tick();
        if !app.is_generating() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("generation did not settle");
}

pub(crate) async fn quiz_app() -> App {
    let mut app = landing_app();
    app.topic_insert_text("Photosynthesis");
    app.generate().unwrap();
    settle(&mut app).await;
    app
}
