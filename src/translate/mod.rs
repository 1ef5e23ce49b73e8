//! Translation module.
//!
//! This module provides:
//! * [`Translator`] — async trait implemented by translation backends.
//! * [`TranslatorProvider`] — constructs a translator per target language.
//! * [`HttpTranslator`] / [`HttpTranslatorProvider`] — LibreTranslate-style
//!   REST backend (the production implementation).
//! * [`TARGET_LANGUAGES`] — the fixed allow-list surfaced in the UI.
//! * [`TranslateError`] — error variants for translation operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use voxlate::config::TranslateConfig;
//! use voxlate::translate::{HttpTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TranslateConfig::default();
//!     let translator = HttpTranslator::for_target(&config, "es").unwrap();
//!     let text = translator.translate("hello world").await.unwrap();
//!     println!("{text}");
//! }
//! ```

pub mod languages;
pub mod translator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use languages::{is_supported, Language, TARGET_LANGUAGES};
pub use translator::{
    HttpTranslator, HttpTranslatorProvider, TranslateError, Translator, TranslatorProvider,
};
