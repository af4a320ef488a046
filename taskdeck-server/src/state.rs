//! Shared application state passed to axum handlers.

use std::sync::{Arc, Mutex};

use crate::auth::AuthService;
use crate::store::MemStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemStore>,
    pub auth: Arc<Mutex<AuthService>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemStore::new()),
            auth: Arc::new(Mutex::new(AuthService::new())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
