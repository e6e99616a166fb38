//! Model backends that turn observations into a drafted note.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompts::{local_prompt, system_prompt, user_prompt, TEMPLATE_SECTIONS};

/// Generation errors.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{0}")]
    Validation(String),

    #[error("Unsupported model type: {0}")]
    UnsupportedModel(String),

    #[error("No API key available for {0}")]
    MissingCredential(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Model returned no text")]
    EmptyResponse,
}

impl GenerationError {
    /// Request problems are 400; everything else is a backend failure.
    pub fn status_code(&self) -> u16 {
        match self {
            GenerationError::Validation(_) | GenerationError::UnsupportedModel(_) => 400,
            _ => 500,
        }
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Something that can draft a session note.
#[async_trait]
pub trait NoteGenerator: Send + Sync {
    /// Draft a note from raw observations and a rendered context block.
    async fn generate(&self, observations: &str, context: &str) -> GenerationResult<String>;
}

// =========================================================================
// Hosted chat backend
// =========================================================================

/// Sampling settings for the hosted backend.
pub const OPENAI_MAX_TOKENS: u32 = 2000;
pub const OPENAI_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Body of `POST {base}/chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completions backend.
pub struct OpenAiGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model_id: String,
}

impl OpenAiGenerator {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model_id: model_id.into(),
        }
    }

    pub fn build_request(&self, observations: &str, context: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model_id.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(context),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(observations),
                },
            ],
            max_tokens: OPENAI_MAX_TOKENS,
            temperature: OPENAI_TEMPERATURE,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl NoteGenerator for OpenAiGenerator {
    async fn generate(&self, observations: &str, context: &str) -> GenerationResult<String> {
        let body = self.build_request(observations, context);
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                body: text,
            });
        }
        parse_chat_completion(&text)
    }
}

/// Pull the first choice's text out of a chat completion body.
pub fn parse_chat_completion(body: &str) -> GenerationResult<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        GenerationError::Backend {
            status: 200,
            body: format!("invalid chat completion payload: {}", e),
        }
    })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(GenerationError::EmptyResponse)
}

// =========================================================================
// Local text-generation backend
// =========================================================================

/// Sampling settings for the local backend.
pub const LOCAL_MAX_NEW_TOKENS: u32 = 200;
pub const LOCAL_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
pub struct GenerateParameters {
    pub max_new_tokens: u32,
    pub do_sample: bool,
    pub temperature: f32,
}

/// Body of `POST {base}/generate` on a text-generation-inference server.
#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub inputs: String,
    pub parameters: GenerateParameters,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generated_text: String,
}

/// Locally hosted text-generation backend.
pub struct LocalGenerator {
    client: Client,
    base_url: String,
}

impl LocalGenerator {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn build_request(observations: &str, context: &str) -> GenerateRequest {
        GenerateRequest {
            inputs: local_prompt(observations, context),
            parameters: GenerateParameters {
                max_new_tokens: LOCAL_MAX_NEW_TOKENS,
                do_sample: true,
                temperature: LOCAL_TEMPERATURE,
            },
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/generate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl NoteGenerator for LocalGenerator {
    async fn generate(&self, observations: &str, context: &str) -> GenerationResult<String> {
        let body = Self::build_request(observations, context);
        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                body: response.text().await?,
            });
        }

        let generated: GenerateResponse = response.json().await?;
        Ok(strip_prompt_echo(&generated.generated_text, &body.inputs))
    }
}

/// Drop the prompt if the server echoed it back, then trim.
pub fn strip_prompt_echo(generated: &str, prompt: &str) -> String {
    generated
        .strip_prefix(prompt)
        .unwrap_or(generated)
        .trim()
        .to_string()
}

// =========================================================================
// Mock backend
// =========================================================================

/// Mock generator for testing without a model.
pub struct MockGenerator {
    failure: Option<(u16, String)>,
}

impl MockGenerator {
    /// Answers with a skeleton note built from the template headings.
    pub fn new() -> Self {
        Self { failure: None }
    }

    /// Answers every call with a backend error.
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            failure: Some((status, body.into())),
        }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteGenerator for MockGenerator {
    async fn generate(&self, observations: &str, context: &str) -> GenerationResult<String> {
        if let Some((status, body)) = &self.failure {
            return Err(GenerationError::Backend {
                status: *status,
                body: body.clone(),
            });
        }

        let mut note = String::new();
        for section in TEMPLATE_SECTIONS {
            note.push_str(&format!("**{}**\n", section));
            match *section {
                "Client Information" if !context.is_empty() => {
                    note.push_str(context);
                    note.push('\n');
                }
                "Client Response & Observations" => {
                    note.push_str(&format!("- {}\n", observations));
                }
                _ => note.push_str("- N/A\n"),
            }
            note.push('\n');
        }
        Ok(note.trim_end().to_string())
    }
}
