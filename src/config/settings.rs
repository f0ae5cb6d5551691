use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{PinAuthError, Result};

/// Where the config file lives unless `--config` says otherwise.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/pinauth/pinauth.toml";

/// Runtime configuration, loaded from `pinauth.toml`.
///
/// Every field has a sensible default so pinauth works without any
/// config file at all. The default paths can be changed at build time
/// with the `PINAUTH_USERS_PATH` and `PINAUTH_STATE_PATH` environment
/// variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// File holding `username:digest` lines.
    #[serde(default = "default_credential_path")]
    pub credential_path: PathBuf,

    /// File holding `username:attempts` lines.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Failed attempts allowed before a user is locked out (default: 3).
    #[serde(default = "default_retry_budget")]
    pub retry_budget: u8,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_credential_path() -> PathBuf {
    PathBuf::from(option_env!("PINAUTH_USERS_PATH").unwrap_or("/etc/pinauth/users"))
}

fn default_state_path() -> PathBuf {
    PathBuf::from(option_env!("PINAUTH_STATE_PATH").unwrap_or("/var/lib/pinauth/attempts"))
}

fn default_retry_budget() -> u8 {
    3
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            credential_path: default_credential_path(),
            state_path: default_state_path(),
            retry_budget: default_retry_budget(),
        }
    }
}

impl Settings {
    /// Load settings from the TOML file at `config_path`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed or is invalid, an error is returned.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PinAuthError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would make authentication impossible.
    pub fn validate(&self) -> Result<()> {
        if self.retry_budget == 0 {
            return Err(PinAuthError::ConfigError(
                "retry_budget must be at least 1".into(),
            ));
        }
        if self.credential_path == self.state_path {
            return Err(PinAuthError::ConfigError(
                "credential_path and state_path must be different files".into(),
            ));
        }
        Ok(())
    }

    /// Directory next to the state file, used for the audit database.
    pub fn state_dir(&self) -> &Path {
        match self.state_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.retry_budget, 3);
        assert_ne!(s.credential_path, s.state_path);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(&tmp.path().join("pinauth.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
credential_path = "/srv/pin/users"
state_path = "/srv/pin/attempts"
retry_budget = 5
"#;
        let path = tmp.path().join("pinauth.toml");
        fs::write(&path, config).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.credential_path, PathBuf::from("/srv/pin/users"));
        assert_eq!(settings.state_path, PathBuf::from("/srv/pin/attempts"));
        assert_eq!(settings.retry_budget, 5);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pinauth.toml");
        fs::write(&path, "retry_budget = 10\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.retry_budget, 10);
        // Rest should be defaults
        assert_eq!(settings.credential_path, default_credential_path());
        assert_eq!(settings.state_path, default_state_path());
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pinauth.toml");
        fs::write(&path, "not valid {{toml").unwrap();

        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn load_rejects_zero_retry_budget() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pinauth.toml");
        fs::write(&path, "retry_budget = 0\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(err.to_string().contains("retry_budget"));
    }

    #[test]
    fn load_rejects_budget_above_counter_range() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pinauth.toml");
        fs::write(&path, "retry_budget = 300\n").unwrap();

        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn state_dir_is_parent_of_state_file() {
        let s = Settings {
            state_path: PathBuf::from("/var/lib/pinauth/attempts"),
            ..Settings::default()
        };
        assert_eq!(s.state_dir(), Path::new("/var/lib/pinauth"));

        let bare = Settings {
            state_path: PathBuf::from("attempts"),
            ..Settings::default()
        };
        assert_eq!(bare.state_dir(), Path::new("."));
    }
}
