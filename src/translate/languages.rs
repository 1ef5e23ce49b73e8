//! The fixed set of target languages offered by the UI.
//!
//! The allow-list is checked when a translator is constructed; the backend's
//! own supported set is deliberately not consulted (the backend rejects what
//! it rejects, and that surfaces as a translation failure).

/// A target language offered in the UI selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO-639-1 code sent to the translation backend.
    pub code: &'static str,
    /// Human-readable name shown in the selector.
    pub name: &'static str,
}

/// Every language the UI offers as a translation target.
pub const TARGET_LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Spanish" },
    Language { code: "yo", name: "Yoruba" },
    Language { code: "ig", name: "Igbo" },
    Language { code: "ha", name: "Hausa" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
    Language { code: "zh", name: "Chinese" },
    Language { code: "hi", name: "Hindi" },
];

/// Returns `true` if `code` is one of [`TARGET_LANGUAGES`].
pub fn is_supported(code: &str) -> bool {
    TARGET_LANGUAGES.iter().any(|l| l.code == code)
}
