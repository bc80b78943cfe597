//! Shared configuration for Virtool command-line tools.
//!
//! TOML profiles, password resolution (env + keyring + plaintext),
//! and translation to `virtool_core::SessionConfig`. The CLI layers its
//! flag overrides on top of this crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use virtool_core::config::DEFAULT_THROTTLE_WINDOW;
use virtool_core::{Credentials, SessionConfig, TlsVerification};

/// Keyring service name under which passwords are stored.
pub const KEYRING_SERVICE: &str = "virtool";

/// Environment variable consulted before the keyring.
pub const PASSWORD_ENV: &str = "VIRTOOL_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("no password configured for profile '{profile}'")]
    NoPassword { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named server profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://virtool.example.org").
    pub server: String,

    pub username: Option<String>,

    /// Plaintext password. Prefer the keyring or an env var.
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Throttle window for create/edit commands, in milliseconds.
    pub throttle_ms: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "virtool", "virtool").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("virtool");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from a specific file, layered over defaults and under `VIRTOOL_*` env vars.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VIRTOOL_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Password resolution ─────────────────────────────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(password.expose_secret())?;
    Ok(())
}

/// Resolve a profile's password: env var, then keyring, then plaintext.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_password_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        |user| {
            keyring::Entry::new(KEYRING_SERVICE, user)
                .and_then(|entry| entry.get_password())
                .ok()
        },
    )
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Env var (profile-specific name wins over the global one)
    let env_name = profile.password_env.as_deref().unwrap_or(PASSWORD_ENV);
    if let Some(pw) = env(env_name) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Some(pw) = keyring(&keyring_user(profile_name)) {
        return Ok(SecretString::from(pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoPassword {
        profile: profile_name.into(),
    })
}

/// Resolve login credentials. A profile without a username runs anonymously.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<Credentials>, ConfigError> {
    let Some(username) = profile.username.clone() else {
        return Ok(None);
    };
    let password = resolve_password(profile, profile_name)?;
    Ok(Some(Credentials { username, password }))
}

// ── Session translation ─────────────────────────────────────────────

/// Parse a server URL, reporting it under `field` when invalid.
pub fn parse_server_url(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// TLS mode for a profile: insecure beats a custom CA, which beats the system store.
pub fn profile_tls(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `SessionConfig` from a profile with no flag overrides.
pub fn profile_to_session_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<SessionConfig, ConfigError> {
    let url = parse_server_url(&profile.server)?;
    let credentials = resolve_credentials(profile, profile_name)?;

    Ok(SessionConfig {
        url,
        credentials,
        tls: profile_tls(profile, defaults),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        throttle_window: profile
            .throttle_ms
            .map_or(DEFAULT_THROTTLE_WINDOW, Duration::from_millis),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lab() -> Profile {
        Profile {
            server: "https://virtool.lab.test".into(),
            username: Some("bob".into()),
            password: Some("plain".into()),
            ..Profile::default()
        }
    }

    fn exposed(secret: &SecretString) -> &str {
        secret.expose_secret()
    }

    #[test]
    fn env_beats_keyring_and_plaintext() {
        let pw = resolve_password_with(
            &lab(),
            "lab",
            |name| (name == PASSWORD_ENV).then(|| "from-env".to_owned()),
            |_| Some("from-keyring".to_owned()),
        )
        .unwrap();
        assert_eq!(exposed(&pw), "from-env");
    }

    #[test]
    fn profile_env_name_overrides_global() {
        let profile = Profile {
            password_env: Some("LAB_PW".into()),
            ..lab()
        };
        let pw = resolve_password_with(
            &profile,
            "lab",
            |name| (name == "LAB_PW").then(|| "lab-env".to_owned()),
            |_| None,
        )
        .unwrap();
        assert_eq!(exposed(&pw), "lab-env");
    }

    #[test]
    fn keyring_is_keyed_by_profile() {
        let pw = resolve_password_with(
            &lab(),
            "lab",
            |_| None,
            |user| (user == "lab/password").then(|| "from-keyring".to_owned()),
        )
        .unwrap();
        assert_eq!(exposed(&pw), "from-keyring");
    }

    #[test]
    fn plaintext_is_the_last_resort() {
        let pw = resolve_password_with(&lab(), "lab", |_| None, |_| None).unwrap();
        assert_eq!(exposed(&pw), "plain");

        let bare = Profile {
            password: None,
            ..lab()
        };
        let err = resolve_password_with(&bare, "lab", |_| None, |_| None).unwrap_err();
        assert!(matches!(err, ConfigError::NoPassword { profile } if profile == "lab"));
    }

    #[test]
    fn profile_without_username_is_anonymous() {
        let profile = Profile {
            server: "http://localhost:9950".into(),
            ..Profile::default()
        };
        let config = profile_to_session_config(&profile, "local", &Defaults::default()).unwrap();
        assert!(config.credentials.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.throttle_window, DEFAULT_THROTTLE_WINDOW);
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn profile_overrides_reach_session_config() {
        let profile = Profile {
            server: "http://localhost:9950".into(),
            ca_cert: Some("/etc/virtool/ca.pem".into()),
            timeout: Some(5),
            throttle_ms: Some(1000),
            ..Profile::default()
        };
        let config = profile_to_session_config(&profile, "local", &Defaults::default()).unwrap();
        assert_eq!(
            config.tls,
            TlsVerification::CustomCa("/etc/virtool/ca.pem".into())
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.throttle_window, Duration::from_millis(1000));

        let insecure = Profile {
            insecure: Some(true),
            ..profile
        };
        assert_eq!(
            profile_tls(&insecure, &Defaults::default()),
            TlsVerification::DangerAcceptInvalid
        );
    }

    #[test]
    fn bad_server_url_is_a_validation_error() {
        let profile = Profile {
            server: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_session_config(&profile, "x", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { field, .. } if field == "server"));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.default_profile = Some("lab".into());
        config.profiles.insert("lab".into(), lab());
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("lab"));
        assert_eq!(loaded.profile("lab").unwrap(), &lab());
        assert!(matches!(
            loaded.profile("missing"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.defaults, Defaults::default());
        assert!(loaded.profiles.is_empty());
    }
}
