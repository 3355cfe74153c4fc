//! services/api/src/adapters/translator.rs
//!
//! This module contains the adapter for machine translation of place
//! descriptions. It implements the `TranslationService` port from the `core`
//! crate using an OpenAI-compatible chat model, with a bounded in-process
//! cache so repeated requests for the same text do not hit the API again.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client, error::OpenAIError,
};
use async_trait::async_trait;
use hiddenheu_core::domain::Language;
use hiddenheu_core::ports::{PortError, PortResult, TranslationService};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const SYSTEM_PROMPT_TEMPLATE: &str = "You are a professional translator. Translate the following text to {language} ({code}). Preserve the original meaning, tone, and style. Only respond with the translated text, nothing else.";

//=========================================================================================
// Bounded Translation Cache
//=========================================================================================

#[derive(Clone)]
struct CacheEntry {
    text: String,
    created_at: Instant,
}

/// A TTL plus capacity bounded cache keyed by language code and source
/// text. Expired entries are swept on every access; when full, the
/// oldest entry is evicted.
struct TranslationCache {
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<String, CacheEntry>,
}

impl TranslationCache {
    fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: HashMap::new(),
        }
    }

    fn get(&mut self, key: &str) -> Option<String> {
        self.entries
            .retain(|_, v| v.created_at.elapsed() <= self.ttl);
        self.entries.get(key).map(|entry| entry.text.clone())
    }

    fn insert(&mut self, key: String, text: String) {
        self.entries
            .retain(|_, v| v.created_at.elapsed() <= self.ttl);
        if self.entries.len() >= self.max_entries {
            if let Some(victim) = self
                .entries
                .iter()
                .min_by_key(|(_, v)| v.created_at)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                text,
                created_at: Instant::now(),
            },
        );
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TranslationService` using an
/// OpenAI-compatible chat model.
pub struct OpenAiTranslator {
    client: Client<OpenAIConfig>,
    model: String,
    cache: Mutex<TranslationCache>,
}

impl OpenAiTranslator {
    /// Creates a new `OpenAiTranslator` with the given cache bounds.
    pub fn new(
        client: Client<OpenAIConfig>,
        model: String,
        cache_ttl: Duration,
        cache_capacity: usize,
    ) -> Self {
        Self {
            client,
            model,
            cache: Mutex::new(TranslationCache::new(cache_ttl, cache_capacity)),
        }
    }

    fn cache_key(text: &str, target: Language) -> String {
        format!("{}:{}", target.code(), text)
    }

    fn cache_get(&self, key: &str) -> Option<String> {
        self.cache.lock().ok()?.get(key)
    }

    fn cache_put(&self, key: String, text: String) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, text);
        }
    }
}

//=========================================================================================
// `TranslationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranslationService for OpenAiTranslator {
    async fn translate(&self, text: &str, target: Language) -> PortResult<String> {
        // Nothing to do for empty input, or for English targets when the
        // text is already plain ASCII.
        if text.is_empty() || (target == Language::English && text.is_ascii()) {
            return Ok(text.to_string());
        }

        let key = Self::cache_key(text, target);
        if let Some(cached) = self.cache_get(&key) {
            return Ok(cached);
        }

        let system_prompt = SYSTEM_PROMPT_TEMPLATE
            .replace("{language}", target.name())
            .replace("{code}", target.code());

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(text)
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?
                    .into(),
            ])
            .max_tokens(1000u32)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let translated = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_else(|| text.to_string());

        self.cache_put(key, translated.clone());
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_returns_inserted_entries_until_ttl() {
        let mut cache = TranslationCache::new(Duration::from_secs(60), 4);
        cache.insert("hi:hello".to_string(), "namaste".to_string());
        assert_eq!(cache.get("hi:hello"), Some("namaste".to_string()));
        assert_eq!(cache.get("hi:unknown"), None);
    }

    #[test]
    fn cache_expires_entries_after_ttl() {
        let mut cache = TranslationCache::new(Duration::ZERO, 4);
        cache.insert("hi:hello".to_string(), "namaste".to_string());
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("hi:hello"), None);
    }

    #[test]
    fn cache_evicts_oldest_when_full() {
        let mut cache = TranslationCache::new(Duration::from_secs(60), 2);
        cache.insert("a".to_string(), "1".to_string());
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("b".to_string(), "2".to_string());
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("c".to_string(), "3".to_string());

        assert_eq!(cache.entries.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some("2".to_string()));
        assert_eq!(cache.get("c"), Some("3".to_string()));
    }

    #[test]
    fn cache_key_includes_language_code() {
        assert_eq!(
            OpenAiTranslator::cache_key("hello", Language::Hindi),
            "hi:hello"
        );
        assert_ne!(
            OpenAiTranslator::cache_key("hello", Language::Tamil),
            OpenAiTranslator::cache_key("hello", Language::Bengali)
        );
    }
}
