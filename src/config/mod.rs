//! Application configuration.
//!
//! Hackfolio reads its remote endpoints and the stored session from a TOML
//! file. Resolution order:
//!
//! 1. An explicit path passed to [`AppConfig::load`]
//! 2. The `HACKFOLIO_CONFIG` environment variable
//! 3. `<config dir>/hackfolio/config.toml` (XDG config dir)
//!
//! A missing file is not an error - everything falls back to defaults and
//! the app runs signed-out against no backend, which is what tests and
//! offline development want.
//!
//! ```toml
//! database-url = "https://hackfolio-default-rtdb.firebaseio.com"
//! storage-bucket = "hackfolio.appspot.com"
//!
//! [session]
//! uid = "u1"
//! email = "ann@example.com"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::remote::Identity;
use crate::Result;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "HACKFOLIO_CONFIG";

/// Remote endpoints and the stored session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AppConfig {
    /// Realtime Database root URL.
    pub database_url: String,

    /// Cloud Storage bucket for profile images.
    pub storage_bucket: String,

    /// The signed-in user, if a session is stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,
}

/// A stored session: the authenticated user this device acts as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SessionConfig {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AppConfig {
    /// Load from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load from the default location, honoring `HACKFOLIO_CONFIG`.
    /// Returns defaults when no config file exists.
    pub fn load_default() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => PathBuf::from(path),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// `<config dir>/hackfolio/config.toml`, when a config dir is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hackfolio").join("config.toml"))
    }

    /// The identity of the stored session, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.session.as_ref().map(|session| Identity {
            uid: session.uid.clone(),
            email: session.email.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "database-url = \"https://db.example.com\"\n\
             storage-bucket = \"bucket.appspot.com\"\n\n\
             [session]\n\
             uid = \"u1\"\n\
             email = \"ann@example.com\""
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.database_url, "https://db.example.com");
        assert_eq!(config.storage_bucket, "bucket.appspot.com");

        let identity = config.identity().unwrap();
        assert_eq!(identity.uid, "u1");
        assert_eq!(identity.email.as_deref(), Some("ann@example.com"));
    }

    #[test]
    fn test_session_is_optional() {
        let config: AppConfig = toml::from_str("database-url = \"https://db.example.com\"").unwrap();
        assert!(config.session.is_none());
        assert!(config.identity().is_none());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database-url = [1, 2]").unwrap();
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_env_var_overrides_default_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database-url = \"https://override.example.com\"").unwrap();

        // SAFETY: serialized by #[serial]; no other thread touches the
        // environment while this test runs.
        unsafe {
            std::env::set_var(CONFIG_ENV_VAR, file.path());
        }
        let config = AppConfig::load_default().unwrap();
        unsafe {
            std::env::remove_var(CONFIG_ENV_VAR);
        }

        assert_eq!(config.database_url, "https://override.example.com");
    }

    #[test]
    #[serial_test::serial]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        // SAFETY: serialized by #[serial].
        unsafe {
            std::env::set_var(CONFIG_ENV_VAR, dir.path().join("nope.toml"));
        }
        let config = AppConfig::load_default().unwrap();
        unsafe {
            std::env::remove_var(CONFIG_ENV_VAR);
        }

        assert_eq!(config, AppConfig::default());
    }
}
