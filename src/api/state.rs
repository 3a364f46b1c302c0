//! API server state

use std::sync::Arc;

use crate::storage::RunStore;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Run store shared by every handler
    pub store: Arc<dyn RunStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RunStore>) -> Self {
        Self { store }
    }
}
