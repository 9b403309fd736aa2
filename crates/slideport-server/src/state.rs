//! Shared application state for the axum handlers.
//!
//! The host is a single session: [`DeckService`] sits behind one
//! `tokio::sync::Mutex` so handlers await the lock instead of blocking the
//! runtime, and host calls are serialized.

use std::sync::Arc;

use slideport_host::{MemoryHost, PresentationHost};

use crate::service::DeckService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<tokio::sync::Mutex<DeckService>>,
}

impl AppState {
    pub fn new(host: impl PresentationHost + 'static) -> Self {
        AppState::from_service(DeckService::new(host))
    }

    pub fn from_service(service: DeckService) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        }
    }

    /// State over a fresh in-memory host (for testing). The returned host
    /// shares state with the service.
    pub fn in_memory() -> (Self, MemoryHost) {
        let (service, host) = DeckService::in_memory(true);
        (AppState::from_service(service), host)
    }
}
