//! API credential loading.
//!
//! The OpenAI key lives in a plain `api_key.txt` next to `settings.toml`.
//! The file content is trimmed and wrapped in [`ApiKey`]; the rest of the
//! crate never inspects the secret's internal structure, it only forwards
//! it as a bearer token.

use std::path::Path;

use thiserror::Error;

use super::AppPaths;

// ---------------------------------------------------------------------------
// CredentialError
// ---------------------------------------------------------------------------

/// Errors that can occur while loading the API credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The key file does not exist at the expected path.
    #[error("API key file not found at: {0}")]
    NotFound(String),

    /// The key file exists but could not be read, or was empty after
    /// trimming.
    #[error("failed to read API key: {0}")]
    Unreadable(String),
}

// ---------------------------------------------------------------------------
// ApiKey
// ---------------------------------------------------------------------------

/// A loaded, trimmed API key.
///
/// The `Debug` impl redacts the secret so the key never leaks into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Load the key from the platform-appropriate `api_key.txt`.
    pub fn load() -> Result<Self, CredentialError> {
        Self::load_from(&AppPaths::new().api_key_file)
    }

    /// Load from an explicit path (useful for tests).
    ///
    /// # Errors
    ///
    /// - [`CredentialError::NotFound`]   — the file does not exist.
    /// - [`CredentialError::Unreadable`] — read failure, or the file is
    ///   empty after trimming whitespace.
    pub fn load_from(path: &Path) -> Result<Self, CredentialError> {
        if !path.exists() {
            return Err(CredentialError::NotFound(path.display().to_string()));
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| CredentialError::Unreadable(e.to_string()))?;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(CredentialError::Unreadable(format!(
                "key file is empty: {}",
                path.display()
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Construct directly from a string (tests, env-based deployments).
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The secret value, for the `Authorization: Bearer …` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("api_key.txt");

        let err = ApiKey::load_from(&path).unwrap_err();
        assert!(matches!(err, CredentialError::NotFound(_)));
    }

    #[test]
    fn key_is_trimmed() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("api_key.txt");
        std::fs::write(&path, "  sk-test-1234\n").unwrap();

        let key = ApiKey::load_from(&path).expect("load");
        assert_eq!(key.expose(), "sk-test-1234");
    }

    #[test]
    fn whitespace_only_file_is_unreadable() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("api_key.txt");
        std::fs::write(&path, "   \n\t").unwrap();

        let err = ApiKey::load_from(&path).unwrap_err();
        assert!(matches!(err, CredentialError::Unreadable(_)));
    }

    #[test]
    fn debug_redacts_secret() {
        let key = ApiKey::from_raw("sk-super-secret");
        let printed = format!("{key:?}");
        assert!(!printed.contains("sk-super-secret"));
    }
}
