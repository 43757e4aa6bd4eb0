//! Question sources backed by hosted language models.
//!
//! # Architecture
//!
//! - [`QuestionSource`] - the seam the engine talks to: a topic goes in, an ordered
//!   list of [`QuestionDraft`]s (or a [`GenerationError`]) comes out
//! - [`gemini`] - Google Gemini client (GenerateContent API, JSON response mode)
//! - [`api_types`] - typed response shapes for the Gemini API
//!
//! Sources are stateless: one outbound request per call, no retries, no caching.
//! Callers assign question ids and decide how failures are shown to the user.
//!
//! # Error Handling
//!
//! Every failure is a [`GenerationError`] variant carrying enough detail for a log
//! line. The user-facing layer collapses them into a single retry message.

pub mod api_types;
pub mod gemini;

use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiSource};
pub use mcq_types;
use mcq_types::{QuestionDraft, Topic};

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when the config does not name one.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
/// Number of questions requested per quiz.
pub const DEFAULT_QUESTION_COUNT: usize = 5;

const CONNECT_TIMEOUT_SECS: u64 = 30;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Turns a topic into question drafts.
///
/// Implementations must be cheap to share across tasks; the engine holds one
/// behind an `Arc` and calls it from a spawned task.
pub trait QuestionSource: Send + Sync {
    fn generate<'a>(
        &'a self,
        topic: &'a Topic,
    ) -> BoxFuture<'a, Result<Vec<QuestionDraft>, GenerationError>>;

    /// Short label for logs and the status bar.
    fn name(&self) -> &str;
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no Gemini API key configured (set GEMINI_API_KEY or [api_keys].google)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("response blocked: {0}")]
    Blocked(String),
    #[error("response contained no questions")]
    EmptyResponse,
    #[error("response was not valid question JSON: {0}")]
    Malformed(String),
    #[error("generation task ended without a result")]
    Aborted,
}

/// Build the HTTP client used by sources.
///
/// HTTPS is enforced whenever the configured base URL is HTTPS; a plain HTTP
/// base (local mock servers) gets a client that allows it.
pub fn http_client(https_only: bool) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .https_only(https_only)
        .build()
}

/// Read an error response body, capping how much of it is kept.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
