//! Note generation request and response shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::generation::{GenerationError, GenerationResult};

/// Hosted model used when a hosted request names none.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-2024-05-13";

/// Which backend drafts the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelType {
    /// OpenAI-compatible hosted chat API
    #[default]
    OpenAi,
    /// Locally hosted text-generation server
    HuggingFace,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::OpenAi => "openai",
            ModelType::HuggingFace => "huggingface",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ModelType::OpenAi),
            "huggingface" => Ok(ModelType::HuggingFace),
            _ => Err(GenerationError::UnsupportedModel(s.to_string())),
        }
    }
}

/// Session details used to fill in the note template.
///
/// Values may arrive as any JSON scalar; they are kept as display strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NoteContext {
    #[serde(default, deserialize_with = "display_string")]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub client_dob: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub client_icd: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub session_date: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub session_time: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub session_duration: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub session_location: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub clinician: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub clinic: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub goals: Option<String>,
}

fn display_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Wire shape of a generation request before validation.
#[derive(Debug, Deserialize)]
struct RawRequest {
    observations: String,
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    model_id: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    context: Option<NoteContext>,
}

/// A validated request to draft one session note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteGenerationRequest {
    pub observations: String,
    pub model_type: ModelType,
    /// `None` means the backend's default model
    pub model_id: Option<String>,
    pub api_key: Option<String>,
    pub context: Option<NoteContext>,
}

impl NoteGenerationRequest {
    pub fn new(observations: impl Into<String>, model_type: ModelType) -> Self {
        Self {
            observations: observations.into(),
            model_type,
            model_id: None,
            api_key: None,
            context: None,
        }
    }

    /// Validate an arbitrary JSON payload.
    pub fn from_value(value: Value) -> GenerationResult<Self> {
        let raw: RawRequest = serde_json::from_value(value)
            .map_err(|e| GenerationError::Validation(e.to_string()))?;
        let model_type = match raw.model_type {
            Some(name) => name.parse()?,
            None => ModelType::default(),
        };

        Ok(Self {
            observations: raw.observations,
            model_type,
            model_id: raw.model_id,
            api_key: raw.api_key,
            context: raw.context,
        })
    }
}

/// A drafted note and the model that wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteGenerationResponse {
    pub generated_note: String,
    /// `"{model_type}:{model_id}"`
    pub model_used: String,
    pub template_used: bool,
}
