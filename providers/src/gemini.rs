//! Google Gemini question source (GenerateContent API, JSON response mode).

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::{Value, json};

use mcq_types::{QuestionDraft, Topic};

use crate::api_types::gemini::{FinishReason, Response};
use crate::{
    DEFAULT_GEMINI_MODEL, DEFAULT_QUESTION_COUNT, GEMINI_API_BASE_URL, GenerationError,
    QuestionSource, http_client, read_capped_error_body,
};

/// Connection settings for [`GeminiSource`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub question_count: usize,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_API_BASE_URL.to_string(),
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    "[REDACTED]"
                } else {
                    "None"
                },
            )
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("question_count", &self.question_count)
            .finish()
    }
}

#[derive(Debug)]
pub struct GeminiSource {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiSource {
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = http_client(config.base_url.starts_with("https://"))?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/models/{}:generateContent", self.config.model)
    }

    async fn request(&self, topic: &Topic) -> Result<Vec<QuestionDraft>, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GenerationError::MissingApiKey)?;

        let body = build_request_body(topic.as_str(), self.config.question_count);
        tracing::info!(
            model = %self.config.model,
            topic_len = topic.len(),
            "Requesting questions from Gemini"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response.text().await?;
        let parsed: Response = serde_json::from_str(&payload)
            .map_err(|e| GenerationError::Malformed(format!("response envelope: {e}")))?;

        if let Some(usage) = &parsed.usage_metadata {
            tracing::debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini usage"
            );
        }

        let drafts = parse_response(parsed)?;
        if drafts.len() != self.config.question_count {
            tracing::warn!(
                requested = self.config.question_count,
                received = drafts.len(),
                "Gemini returned an unexpected number of questions"
            );
        }
        Ok(drafts)
    }
}

impl QuestionSource for GeminiSource {
    fn generate<'a>(
        &'a self,
        topic: &'a Topic,
    ) -> BoxFuture<'a, Result<Vec<QuestionDraft>, GenerationError>> {
        self.request(topic).boxed()
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

/// Instruction sent to the model for a topic.
#[must_use]
pub fn build_prompt(topic: &str, count: usize) -> String {
    format!(
        "Generate {count} high-quality, professional multiple-choice questions about the topic: \
         \"{topic}\". Each question must have 4 distinct options (A, B, C, D), exactly one \
         correct answer, and a concise explanation. Ensure the difficulty is appropriate for \
         someone wanting to learn the subject."
    )
}

fn string_schema() -> Value {
    json!({ "type": "STRING" })
}

/// JSON schema the model is asked to follow.
fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": string_schema(),
                "options": {
                    "type": "OBJECT",
                    "properties": {
                        "A": string_schema(),
                        "B": string_schema(),
                        "C": string_schema(),
                        "D": string_schema(),
                    },
                    "required": ["A", "B", "C", "D"],
                },
                "correctAnswer": {
                    "type": "STRING",
                    "description": "The key of the correct option (A, B, C, or D)",
                },
                "explanation": string_schema(),
            },
            "required": ["question", "options", "correctAnswer", "explanation"],
        },
    })
}

pub(crate) fn build_request_body(topic: &str, count: usize) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": build_prompt(topic, count) }],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        },
    })
}

/// Models occasionally wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub(crate) fn parse_response(response: Response) -> Result<Vec<QuestionDraft>, GenerationError> {
    if let Some(error) = response.error {
        return Err(GenerationError::Api {
            status: error.code.and_then(|c| u16::try_from(c).ok()).unwrap_or(0),
            body: error.message_or_default().to_string(),
        });
    }

    let Some(candidate) = response.candidates.and_then(|c| c.into_iter().next()) else {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(GenerationError::Blocked(reason));
        }
        return Err(GenerationError::EmptyResponse);
    };

    if let Some(message) = candidate
        .finish_reason
        .as_deref()
        .map(FinishReason::parse)
        .and_then(FinishReason::error_message)
    {
        return Err(GenerationError::Blocked(message.to_string()));
    }

    let text = candidate.text();
    let payload = strip_code_fence(&text);
    if payload.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let drafts: Vec<QuestionDraft> =
        serde_json::from_str(payload).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    if drafts.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(drafts)
}
