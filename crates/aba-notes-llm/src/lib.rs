//! Session note drafting through hosted or local language models.
//!
//! This crate turns a therapist's raw session observations into a structured
//! ABA session note, via an OpenAI-compatible chat API or a locally hosted
//! text-generation server.

pub mod generation;
pub mod note_taker;
pub mod prompts;
pub mod request;

pub use generation::*;
pub use note_taker::*;
pub use prompts::*;
pub use request::*;
