//! Configuration module — settings structs, platform paths, credential.
//!
//! * [`AppConfig`] — top-level TOML-persisted settings.
//! * [`AppPaths`] — platform-appropriate config file locations.
//! * [`ApiKey`] / [`CredentialError`] — credential loading from
//!   `api_key.txt`.

pub mod credential;
pub mod paths;
pub mod settings;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use credential::{ApiKey, CredentialError};
pub use paths::AppPaths;
pub use settings::{
    AppConfig, GenerationConfig, ImageConfig, ModelKind, PromptConfig, SpeechConfig,
};
