//! Note drafting service.
//!
//! [`NoteTaker`] validates a raw JSON request, picks a backend, drafts the note
//! and answers with a [`ServiceResult`], like the entity services do.

use std::sync::Arc;

use aba_notes_core::ServiceResult;
use reqwest::Client;
use serde_json::{json, Value};

use crate::generation::{
    GenerationError, GenerationResult, LocalGenerator, NoteGenerator, OpenAiGenerator,
};
use crate::prompts::render_context;
use crate::request::{ModelType, NoteGenerationRequest, NoteGenerationResponse, DEFAULT_OPENAI_MODEL};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LOCAL_MODEL_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_LOCAL_MODEL_ID: &str = "microsoft/DialoGPT-medium";

/// Backend endpoints and the fallback hosted credential.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteTakerConfig {
    /// Used when a request carries no `api_key`
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub local_model_url: String,
    /// Reported as the model for local requests that name none
    pub local_model_id: String,
}

impl Default for NoteTakerConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            local_model_url: DEFAULT_LOCAL_MODEL_URL.to_string(),
            local_model_id: DEFAULT_LOCAL_MODEL_ID.to_string(),
        }
    }
}

pub struct NoteTaker {
    config: NoteTakerConfig,
    client: Client,
    generator_override: Option<Arc<dyn NoteGenerator>>,
}

impl NoteTaker {
    /// Build with real backends. The HTTP client has no request timeout.
    pub fn new(config: NoteTakerConfig) -> GenerationResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            config,
            client,
            generator_override: None,
        })
    }

    /// Route every request to `generator`, whatever its `model_type`.
    pub fn with_generator(config: NoteTakerConfig, generator: Arc<dyn NoteGenerator>) -> Self {
        Self {
            config,
            client: Client::new(),
            generator_override: Some(generator),
        }
    }

    pub fn config(&self) -> &NoteTakerConfig {
        &self.config
    }

    /// Validate then execute a raw request.
    pub async fn process_request(&self, data: Value) -> ServiceResult<NoteGenerationResponse> {
        match NoteGenerationRequest::from_value(data) {
            Ok(request) => self.execute(&request).await,
            Err(error) => {
                tracing::warn!(%error, "rejected note generation request");
                failure(error)
            }
        }
    }

    /// Draft a note with the backend the request selects.
    pub async fn execute(&self, request: &NoteGenerationRequest) -> ServiceResult<NoteGenerationResponse> {
        let model_id = self.model_id(request);
        let generator = match &self.generator_override {
            Some(generator) => Arc::clone(generator),
            None => match self.backend(request, &model_id) {
                Ok(generator) => generator,
                Err(error) => return failure(error),
            },
        };
        self.execute_with(generator.as_ref(), request, &model_id).await
    }

    /// Draft a note with an explicit backend.
    pub async fn execute_with(
        &self,
        generator: &dyn NoteGenerator,
        request: &NoteGenerationRequest,
        model_id: &str,
    ) -> ServiceResult<NoteGenerationResponse> {
        tracing::info!(backend = %request.model_type, model = model_id, "generating session note");
        let context = render_context(request.context.as_ref());

        match generator.generate(&request.observations, &context).await {
            Ok(generated_note) => ServiceResult::success(NoteGenerationResponse {
                generated_note,
                model_used: format!("{}:{}", request.model_type, model_id),
                template_used: true,
            }),
            Err(error) => {
                tracing::error!(backend = %request.model_type, %error, "note generation failed");
                failure(error)
            }
        }
    }

    /// Draft a note from observations alone.
    pub async fn generate_simple_note(
        &self,
        observations: &str,
        model_type: &str,
    ) -> ServiceResult<NoteGenerationResponse> {
        self.process_request(json!({
            "observations": observations,
            "model_type": model_type,
        }))
        .await
    }

    fn model_id(&self, request: &NoteGenerationRequest) -> String {
        match (&request.model_id, request.model_type) {
            (Some(model_id), _) => model_id.clone(),
            (None, ModelType::OpenAi) => DEFAULT_OPENAI_MODEL.to_string(),
            (None, ModelType::HuggingFace) => self.config.local_model_id.clone(),
        }
    }

    fn backend(
        &self,
        request: &NoteGenerationRequest,
        model_id: &str,
    ) -> GenerationResult<Arc<dyn NoteGenerator>> {
        match request.model_type {
            ModelType::OpenAi => {
                let api_key = request
                    .api_key
                    .clone()
                    .or_else(|| self.config.openai_api_key.clone())
                    .ok_or_else(|| GenerationError::MissingCredential(ModelType::OpenAi.to_string()))?;
                Ok(Arc::new(OpenAiGenerator::new(
                    self.client.clone(),
                    self.config.openai_base_url.clone(),
                    api_key,
                    model_id,
                )))
            }
            ModelType::HuggingFace => Ok(Arc::new(LocalGenerator::new(
                self.client.clone(),
                self.config.local_model_url.clone(),
            ))),
        }
    }
}

fn failure<T>(error: GenerationError) -> ServiceResult<T> {
    let status = error.status_code();
    let message = if status == 400 {
        format!("Validation error: {}", error)
    } else {
        format!("Note generation failed: {}", error)
    };
    ServiceResult::failure(message, status)
}
