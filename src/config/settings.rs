//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::prompt::TruncationPolicy;

use super::AppPaths;

// ---------------------------------------------------------------------------
// ModelKind
// ---------------------------------------------------------------------------

/// Selects which chat model handles text completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModelKind {
    /// `gpt-3.5-turbo` — cheapest, fastest.
    Gpt35Turbo,
    /// `gpt-4` — strongest reasoning, slowest.
    Gpt4,
    /// `gpt-4o` — multimodal flagship.
    Gpt4o,
    /// `gpt-4o-mini` — balanced cost/quality.
    Gpt4oMini,
}

impl ModelKind {
    /// The model identifier sent on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ModelKind::Gpt35Turbo => "gpt-3.5-turbo",
            ModelKind::Gpt4 => "gpt-4",
            ModelKind::Gpt4o => "gpt-4o",
            ModelKind::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

impl Default for ModelKind {
    fn default() -> Self {
        Self::Gpt35Turbo
    }
}

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// Connection and sampling settings for the text-completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of the API endpoint (no trailing slash).
    ///
    /// Default: `https://api.openai.com`
    pub base_url: String,
    /// Which chat model to use.
    pub model: ModelKind,
    /// Sampling temperature (0.0 – 1.0).  Lower = more deterministic.
    pub temperature: f32,
    /// Maximum tokens in the completion.
    pub max_tokens: u32,
    /// Maximum seconds to wait for any single HTTP request before timing
    /// out.  Applied to all three endpoints plus the image download.
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: ModelKind::default(),
            temperature: 0.7,
            max_tokens: 300,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// PromptConfig
// ---------------------------------------------------------------------------

/// Static modifiers merged into every text prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Theme instructions appended after the user's input.
    pub theme_instructions: String,
    /// Negative prompt appended after the literal `NEGATIVE PROMPT - `
    /// marker.
    pub negative_prompt: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            theme_instructions: "Please ensure the response fits a dark fantasy theme, \
                                 using archaic language and vivid imagery."
                .into(),
            negative_prompt: "ENSURE TWO PARAGRAPHS MAX".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ImageConfig
// ---------------------------------------------------------------------------

/// Settings for the dependent image-generation branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Art style appended to the completion text.
    pub art_style: String,
    /// Negative prompt appended after the literal `NEGATIVE PROMPT = `
    /// marker.
    pub negative_prompt: String,
    /// Output dimensions, e.g. `"512x512"`.  One image per request.
    pub size: String,
    /// What to do when the composed image prompt exceeds the 1000-character
    /// ceiling.
    pub truncation: TruncationPolicy,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            art_style: "in the style of a pencil sketch".into(),
            negative_prompt: "ENSURE NO TEXT".into(),
            size: "512x512".into(),
            truncation: TruncationPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the dependent text-to-speech branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// TTS model identifier (e.g. `"tts-1"`).
    pub model: String,
    /// Voice identifier (e.g. `"onyx"`).
    pub voice: String,
    /// Response container format requested from the endpoint.
    ///
    /// Defaults to `"wav"` because the speech branch feeds the raw bytes
    /// into the WAV decoder; `"mp3"` is expressible for consumers that
    /// bypass decoding.
    pub response_format: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            model: "tts-1".into(),
            voice: "onyx".into(),
            response_format: "wav".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// Read-only after initialisation: the orchestrator holds a clone and the
/// pipeline never mutates it mid-flight.
///
/// # Persistence
///
/// ```rust,no_run
/// use taleforge::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text-completion connection/sampling settings.
    pub generation: GenerationConfig,
    /// Static text-prompt modifiers.
    pub prompt: PromptConfig,
    /// Image branch settings.
    pub image: ImageConfig,
    /// Speech branch settings.
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.generation.base_url, loaded.generation.base_url);
        assert_eq!(original.generation.model, loaded.generation.model);
        assert_eq!(original.generation.max_tokens, loaded.generation.max_tokens);
        assert!((original.generation.temperature - loaded.generation.temperature).abs() < 1e-6);
        assert_eq!(original.prompt.theme_instructions, loaded.prompt.theme_instructions);
        assert_eq!(original.image.art_style, loaded.image.art_style);
        assert_eq!(original.image.size, loaded.image.size);
        assert_eq!(original.speech.voice, loaded.speech.voice);
        assert_eq!(original.speech.response_format, loaded.speech.response_format);
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("does-not-exist.toml");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(loaded.generation.model, ModelKind::Gpt35Turbo);
        assert_eq!(loaded.speech.voice, "onyx");
    }

    #[test]
    fn model_wire_names() {
        assert_eq!(ModelKind::Gpt35Turbo.wire_name(), "gpt-3.5-turbo");
        assert_eq!(ModelKind::Gpt4.wire_name(), "gpt-4");
        assert_eq!(ModelKind::Gpt4o.wire_name(), "gpt-4o");
        assert_eq!(ModelKind::Gpt4oMini.wire_name(), "gpt-4o-mini");
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert!((config.generation.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.generation.max_tokens, 300);
        assert_eq!(config.prompt.negative_prompt, "ENSURE TWO PARAGRAPHS MAX");
        assert_eq!(config.image.negative_prompt, "ENSURE NO TEXT");
    }
}
