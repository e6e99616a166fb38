//! Server configuration.
//!
//! Resolved once at startup from flags, environment variables and an optional
//! `.env` file, then passed down. Nothing reads the environment while serving.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ABA_DATABASE_PATH` | session_notes.db | SQLite file |
//! | `ABA_HOST` | 127.0.0.1 | Host to bind |
//! | `ABA_PORT` | 8000 | Server port |
//! | `ABA_CORS_ORIGIN` | http://localhost:3000 | Allowed front-end origin |
//! | `OPENAI_API_KEY` | | Hosted model key used when a request has none |
//! | `ABA_OPENAI_BASE_URL` | https://api.openai.com/v1 | Hosted model API base |
//! | `ABA_LOCAL_MODEL_URL` | http://127.0.0.1:8080 | Local text-generation server |
//! | `ABA_LOCAL_MODEL_ID` | microsoft/DialoGPT-medium | Local model name |

use std::path::PathBuf;

use aba_notes_core::SeedOptions;
use aba_notes_llm::{
    NoteTakerConfig, DEFAULT_LOCAL_MODEL_ID, DEFAULT_LOCAL_MODEL_URL, DEFAULT_OPENAI_BASE_URL,
};
use clap::{Args, Parser, Subcommand};

/// Command line of the `aba-notes` binary.
#[derive(Debug, Parser)]
#[command(name = "aba-notes")]
#[command(about = "ABA session notes backend")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub config: ServerConfig,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create the tables and exit.
    InitDb,
    /// Fill the database with demo data.
    Seed(SeedArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct SeedArgs {
    /// Number of patients to generate.
    #[arg(long, default_value = "15")]
    pub patients: usize,

    /// Number of clinics to generate.
    #[arg(long, default_value = "5")]
    pub clinics: usize,

    /// Number of BCBAs to generate.
    #[arg(long, default_value = "5")]
    pub bcbas: usize,

    /// Number of session notes to generate.
    #[arg(long, default_value = "50")]
    pub notes: usize,
}

impl From<SeedArgs> for SeedOptions {
    fn from(args: SeedArgs) -> Self {
        SeedOptions {
            patients: args.patients,
            clinics: args.clinics,
            bcbas: args.bcbas,
            notes: args.notes,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// SQLite database file.
    #[arg(long, global = true, env = "ABA_DATABASE_PATH", default_value = "session_notes.db")]
    pub database_path: PathBuf,

    /// Host address to bind to.
    #[arg(long, global = true, env = "ABA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, global = true, env = "ABA_PORT", default_value = "8000")]
    pub port: u16,

    /// Front-end origin allowed to call the API with credentials.
    #[arg(long, global = true, env = "ABA_CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,

    /// Hosted model API key used when a request carries none.
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[arg(long, global = true, env = "ABA_OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// Base URL of the local text-generation server.
    #[arg(long, global = true, env = "ABA_LOCAL_MODEL_URL", default_value = DEFAULT_LOCAL_MODEL_URL)]
    pub local_model_url: String,

    /// Model name reported for local generations.
    #[arg(long, global = true, env = "ABA_LOCAL_MODEL_ID", default_value = DEFAULT_LOCAL_MODEL_ID)]
    pub local_model_id: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("session_notes.db"),
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origin: "http://localhost:3000".to_string(),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            local_model_url: DEFAULT_LOCAL_MODEL_URL.to_string(),
            local_model_id: DEFAULT_LOCAL_MODEL_ID.to_string(),
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn note_taker_config(&self) -> NoteTakerConfig {
        NoteTakerConfig {
            openai_api_key: self.openai_api_key.clone(),
            openai_base_url: self.openai_base_url.clone(),
            local_model_url: self.local_model_url.clone(),
            local_model_id: self.local_model_id.clone(),
        }
    }

    /// Creates a configuration suitable for testing: in-memory database,
    /// ephemeral port, no hosted credential.
    pub fn for_testing() -> Self {
        Self {
            database_path: PathBuf::from(":memory:"),
            port: 0,
            ..Self::default()
        }
    }
}
