//! Gate configuration with TOML file and environment support.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration for the access gate.
///
/// Can be loaded from a TOML file via [`GateConfig::from_toml_file`], from
/// the environment via [`GateConfig::from_env`], or built programmatically
/// (e.g. for tests). A config missing the secret, the chat id, or either
/// destination fails validation — the request path must refuse to proceed
/// rather than skip verification.
#[derive(Clone, Deserialize)]
pub struct GateConfig {
    /// Bot credential. Used both to verify token signatures and to query the
    /// membership authority. Never logged.
    pub bot_token: String,

    /// Chat/channel whose membership gates access (e.g. "-1001234567890").
    pub chat_id: String,

    /// Destination for members.
    pub member_url: String,

    /// Destination for non-members.
    pub non_member_url: String,

    /// Whether a validly-signed token without a user record is rejected
    /// outright. When off, such tokens still resolve to "not a member"
    /// (no identity means membership cannot be confirmed).
    #[serde(default = "default_true")]
    pub require_identity: bool,

    /// Timeout for the membership lookup, in seconds.
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,

    /// Port for the HTTP surface.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_lookup_timeout() -> u64 {
    10
}

fn default_listen_port() -> u16 {
    8080
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("failed to read config file: {0}")]
    Io(String),

    #[error("failed to parse config file: {0}")]
    Parse(String),
}

impl GateConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: GateConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment.
    ///
    /// Variable names follow the deployment convention:
    /// `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHANNEL_ID`, `MEMBER_REDIRECT_URL`,
    /// `NON_MEMBER_REDIRECT_URL`, plus optional `TURNSTILE_REQUIRE_IDENTITY`,
    /// `TURNSTILE_LOOKUP_TIMEOUT_SECS`, `TURNSTILE_LISTEN_PORT`,
    /// `TURNSTILE_LOG_FORMAT`, `TURNSTILE_LOG_LEVEL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Environment loading with an injectable lookup (tests avoid mutating
    /// process-global env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key, name| lookup(key).ok_or(ConfigError::Missing(name));
        let config = GateConfig {
            bot_token: required("TELEGRAM_BOT_TOKEN", "bot_token")?,
            chat_id: required("TELEGRAM_CHANNEL_ID", "chat_id")?,
            member_url: required("MEMBER_REDIRECT_URL", "member_url")?,
            non_member_url: required("NON_MEMBER_REDIRECT_URL", "non_member_url")?,
            require_identity: lookup("TURNSTILE_REQUIRE_IDENTITY")
                .map(|v| v != "false")
                .unwrap_or(true),
            lookup_timeout_secs: lookup("TURNSTILE_LOOKUP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_lookup_timeout),
            listen_port: lookup("TURNSTILE_LISTEN_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_listen_port),
            log_format: lookup("TURNSTILE_LOG_FORMAT").unwrap_or_else(default_log_format),
            log_level: lookup("TURNSTILE_LOG_LEVEL").unwrap_or_else(default_log_level),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would silently weaken the gate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.is_empty() {
            return Err(ConfigError::Missing("bot_token"));
        }
        if self.chat_id.is_empty() {
            return Err(ConfigError::Missing("chat_id"));
        }
        if self.member_url.is_empty() {
            return Err(ConfigError::Missing("member_url"));
        }
        if self.non_member_url.is_empty() {
            return Err(ConfigError::Missing("non_member_url"));
        }
        Ok(())
    }

    /// Map the binary access decision to its configured destination.
    pub fn destination_url(&self, is_member: bool) -> &str {
        if is_member {
            &self.member_url
        } else {
            &self.non_member_url
        }
    }
}

// Manual Debug so the credential cannot leak through {:?} logging.
impl std::fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("member_url", &self.member_url)
            .field("non_member_url", &self.non_member_url)
            .field("require_identity", &self.require_identity)
            .field("lookup_timeout_secs", &self.lookup_timeout_secs)
            .field("listen_port", &self.listen_port)
            .field("log_format", &self.log_format)
            .field("log_level", &self.log_level)
            .finish()
    }
}
