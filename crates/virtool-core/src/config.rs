// ── Runtime session configuration ──
//
// These types describe *how* to reach a Virtool server. They carry
// credentials and tuning, but never touch disk: the CLI builds a
// `SessionConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Cool-down applied to create/edit/submit intents.
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(300);

/// Request timeout used when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Username/password pair for the cookie session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab servers).
    DangerAcceptInvalid,
}

/// Configuration for one session against one server.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Server URL, with or without the trailing `/api`.
    pub url: Url,
    /// `None` skips login; requests then run anonymously.
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Window inside which repeated throttled requests are dropped.
    pub throttle_window: Duration,
}

impl SessionConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            throttle_window: DEFAULT_THROTTLE_WINDOW,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password,
        });
        self
    }
}
