//! Shared application state.

use std::sync::Arc;

use aba_notes_core::Services;
use aba_notes_llm::NoteTaker;

/// Everything handlers need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    services: Services,
    note_taker: Arc<NoteTaker>,
}

impl AppState {
    pub fn new(services: Services, note_taker: NoteTaker) -> Self {
        Self {
            services,
            note_taker: Arc::new(note_taker),
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn note_taker(&self) -> &NoteTaker {
        &self.note_taker
    }
}
