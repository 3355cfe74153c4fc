//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use hiddenheu_core::ports::{StorageService, TranslationService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StorageService>,
    pub config: Arc<Config>,
    /// Absent when no OPENAI_API_KEY is configured; the translate
    /// endpoint then answers 503.
    pub translator: Option<Arc<dyn TranslationService>>,
}
