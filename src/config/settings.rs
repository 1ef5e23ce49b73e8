//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Settings for the HTTP server and the browser UI mount point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface the server binds to.
    pub host: String,
    /// TCP port.  Overridden by the `SERVER_PORT` environment variable when
    /// set (see [`ServerConfig::effective_port`]).
    pub port: u16,
    /// Path under which the browser UI and its API routes are mounted.
    pub mount_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            mount_path: "/app".into(),
        }
    }
}

impl ServerConfig {
    /// Port to bind, honouring a `SERVER_PORT` environment override.
    pub fn effective_port(&self) -> u16 {
        std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(self.port)
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// GGML model file stem under the models directory (e.g. `"ggml-base"`).
    pub model: String,
    /// Source-speech language as an ISO-639-1 code, or `"auto"` for
    /// Whisper's built-in language detection.
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "ggml-base".into(),
            language: "auto".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TranslateConfig
// ---------------------------------------------------------------------------

/// Settings for the HTTP translation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Base URL of the translation service (LibreTranslate-compatible
    /// `POST /translate` endpoint).
    pub base_url: String,
    /// API key — `None` for self-hosted instances that require none.
    pub api_key: Option<String>,
    /// Maximum seconds to wait for a translation response.
    pub timeout_secs: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            api_key: None,
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the HTTP text-to-speech backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Base URL of the synthesis service (`POST /api/tts` returning audio
    /// bytes).
    pub base_url: String,
    /// Voice identifier sent to the backend.
    pub voice: String,
    /// Maximum seconds to wait for synthesized audio.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5002".into(),
            voice: "default".into(),
            timeout_secs: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voxlate::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// STT engine settings.
    pub stt: SttConfig,
    /// Translation backend settings.
    pub translate: TranslateConfig,
    /// Text-to-speech backend settings.
    pub speech: SpeechConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
