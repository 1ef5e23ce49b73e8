//! Core `Translator` trait and the HTTP backend implementation.
//!
//! `HttpTranslator` speaks the LibreTranslate wire format — a JSON
//! `POST /translate` with `q` / `source` / `target` fields — which is also
//! accepted by several self-hosted translation services.  All connection
//! details come from [`TranslateConfig`]; nothing is hardcoded.
//!
//! A translator is bound to one target language at construction time, and a
//! fresh one is constructed per request.  Construction itself can fail when
//! the target code is outside the UI allow-list — a distinct failure mode
//! from a failed translation call.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranslateConfig;
use crate::translate::languages;

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur while constructing a translator or translating.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The requested target language is not in the UI allow-list.
    #[error("unsupported target language: {0}")]
    UnsupportedLanguage(String),

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse translation response: {0}")]
    Parse(String),

    /// The backend returned a response with no usable text.
    #[error("translation backend returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async trait for text translation into the target language the translator
/// was constructed for.
///
/// Implementors must be `Send + Sync` so they can be shared across request
/// handlers (e.g. boxed behind `dyn Translator`).
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into this translator's target language.
    async fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

impl std::fmt::Debug for dyn Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Translator")
    }
}

// ---------------------------------------------------------------------------
// TranslatorProvider trait
// ---------------------------------------------------------------------------

/// Constructs a [`Translator`] for a given target language.
///
/// The provider is the seam the pipeline depends on; the production
/// implementation builds an [`HttpTranslator`] per request, tests substitute
/// a mock.  Construction fails with
/// [`TranslateError::UnsupportedLanguage`] for codes outside
/// [`languages::TARGET_LANGUAGES`].
pub trait TranslatorProvider: Send + Sync {
    /// Build a translator bound to `target`.
    fn create(&self, target: &str) -> Result<Box<dyn Translator>, TranslateError>;
}

// ---------------------------------------------------------------------------
// HttpTranslator
// ---------------------------------------------------------------------------

/// Calls a LibreTranslate-compatible `POST /translate` endpoint.
///
/// # No hardcoded URLs
/// All connection details (`base_url`, `api_key`, `timeout_secs`) come
/// exclusively from the [`TranslateConfig`] passed to
/// [`HttpTranslator::for_target`].
#[derive(Debug)]
pub struct HttpTranslator {
    client: reqwest::Client,
    config: TranslateConfig,
    target: String,
}

impl HttpTranslator {
    /// Build a translator bound to `target`.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    ///
    /// # Errors
    ///
    /// [`TranslateError::UnsupportedLanguage`] when `target` is not in the
    /// UI allow-list.
    pub fn for_target(config: &TranslateConfig, target: &str) -> Result<Self, TranslateError> {
        if !languages::is_supported(target) {
            return Err(TranslateError::UnsupportedLanguage(target.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            client,
            config: config.clone(),
            target: target.to_string(),
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    /// Send `text` to the configured backend for translation.
    ///
    /// `source` is always `"auto"` — the backend detects the source language
    /// from the text itself.  The `api_key` field is included **only** when
    /// the config carries a non-empty key, safe for self-hosted instances
    /// that require none.
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let url = format!("{}/translate", self.config.base_url);

        let mut body = serde_json::json!({
            "q":      text,
            "source": "auto",
            "target": self.target,
            "format": "text",
        });

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            body["api_key"] = serde_json::Value::String(key.to_string());
        }

        let response = self.client.post(&url).json(&body).send().await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        let translated = json["translatedText"]
            .as_str()
            .ok_or(TranslateError::EmptyResponse)?
            .trim()
            .to_string();

        if translated.is_empty() {
            return Err(TranslateError::EmptyResponse);
        }

        Ok(translated)
    }
}

// ---------------------------------------------------------------------------
// HttpTranslatorProvider
// ---------------------------------------------------------------------------

/// Production [`TranslatorProvider`] that constructs a fresh
/// [`HttpTranslator`] for every request.
#[derive(Clone)]
pub struct HttpTranslatorProvider {
    config: TranslateConfig,
}

impl HttpTranslatorProvider {
    pub fn new(config: TranslateConfig) -> Self {
        Self { config }
    }
}

impl TranslatorProvider for HttpTranslatorProvider {
    fn create(&self, target: &str) -> Result<Box<dyn Translator>, TranslateError> {
        Ok(Box::new(HttpTranslator::for_target(&self.config, target)?))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> TranslateConfig {
        TranslateConfig {
            base_url: "http://localhost:5000".into(),
            api_key: api_key.map(|s| s.to_string()),
            timeout_secs: 5,
        }
    }

    #[test]
    fn for_target_accepts_supported_language() {
        let config = make_config(None);
        assert!(HttpTranslator::for_target(&config, "es").is_ok());
    }

    #[test]
    fn for_target_rejects_unsupported_language() {
        let config = make_config(None);
        let err = HttpTranslator::for_target(&config, "xx").unwrap_err();
        match err {
            TranslateError::UnsupportedLanguage(code) => assert_eq!(code, "xx"),
            other => panic!("expected UnsupportedLanguage, got: {other:?}"),
        }
    }

    #[test]
    fn for_target_accepts_every_allow_listed_code() {
        let config = make_config(None);
        for lang in crate::translate::languages::TARGET_LANGUAGES {
            assert!(
                HttpTranslator::for_target(&config, lang.code).is_ok(),
                "construction failed for {}",
                lang.code
            );
        }
    }

    #[test]
    fn for_target_accepts_empty_api_key() {
        let config = make_config(Some(""));
        assert!(HttpTranslator::for_target(&config, "fr").is_ok());
    }

    #[test]
    fn provider_propagates_unsupported_language() {
        let provider = HttpTranslatorProvider::new(make_config(None));
        assert!(matches!(
            provider.create("klingon").unwrap_err(),
            TranslateError::UnsupportedLanguage(_)
        ));
    }

    /// Verify that `HttpTranslator` is object-safe (usable as `dyn Translator`).
    #[test]
    fn translator_is_object_safe() {
        let config = make_config(None);
        let translator: Box<dyn Translator> =
            Box::new(HttpTranslator::for_target(&config, "de").unwrap());
        drop(translator);
    }
}
