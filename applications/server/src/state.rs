/// Shared application state
use crate::service::RequestService;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RequestService>,
}

impl AppState {
    pub fn new(service: Arc<RequestService>) -> Self {
        Self { service }
    }
}
