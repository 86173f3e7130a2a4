// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Result};
use chrono::TimeDelta;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{fmt, net::SocketAddr, path::Path, time::Duration};

use crate::auth::{PasswordCredential, DEFAULT_PASSWORD_COST, MIN_PASSWORD_COST, REFRESH_TOKEN_TTL_HOURS};

/// Config file read by [`Settings::load`]
pub const DEFAULT_CONFIG_FILE: &str = "chirpy.toml";

/// Prefix for environment overrides, e.g. `CHIRPY_TOKEN_SECRET`
pub const ENV_PREFIX: &str = "CHIRPY_";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_PASSWORD_COST: u8 = 20;
/// Upper bound on the refresh window (100 years)
const MAX_REFRESH_TOKEN_TTL_HOURS: u64 = 100 * 365 * 24;

/// Application settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// HMAC secret for access tokens
    pub token_secret: String,
    /// Static key expected from the webhook caller
    pub service_api_key: String,
    /// Default access-token lifetime in seconds
    pub access_token_ttl_secs: u64,
    /// Refresh-token lifetime in hours
    pub refresh_token_ttl_hours: u64,
    /// scrypt `log_n` used for new password hashes
    pub password_cost: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_string(),
            log_json: false,
            token_secret: String::new(),
            service_api_key: String::new(),
            access_token_ttl_secs: 60 * 60,
            refresh_token_ttl_hours: REFRESH_TOKEN_TTL_HOURS as u64,
            password_cost: DEFAULT_PASSWORD_COST,
        }
    }
}

// secrets stay out of logs
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .field("token_secret", &"<redacted>")
            .field("service_api_key", &"<redacted>")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_hours", &self.refresh_token_ttl_hours)
            .field("password_cost", &self.password_cost)
            .finish()
    }
}

impl Settings {
    /// Load from `chirpy.toml` and `CHIRPY_*` environment variables
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from the given TOML file, then apply environment overrides.
    /// A missing file is not an error; defaults and the environment apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if self.token_secret.is_empty() {
            bail!("token_secret must be set");
        }
        if self.service_api_key.is_empty() {
            bail!("service_api_key must be set");
        }
        if self.access_token_ttl_secs == 0 {
            bail!("access_token_ttl_secs must be greater than zero");
        }
        if self.refresh_token_ttl_hours == 0 {
            bail!("refresh_token_ttl_hours must be greater than zero");
        }
        if self.refresh_token_ttl_hours > MAX_REFRESH_TOKEN_TTL_HOURS {
            bail!(
                "refresh_token_ttl_hours must be at most {MAX_REFRESH_TOKEN_TTL_HOURS}, got {}",
                self.refresh_token_ttl_hours
            );
        }
        if !(MIN_PASSWORD_COST..=MAX_PASSWORD_COST).contains(&self.password_cost) {
            bail!(
                "password_cost must be between {MIN_PASSWORD_COST} and {MAX_PASSWORD_COST}, got {}",
                self.password_cost
            );
        }
        Ok(())
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_secs)
    }

    /// Refresh window; saturates instead of overflowing for unvalidated values
    pub fn refresh_token_ttl(&self) -> TimeDelta {
        i64::try_from(self.refresh_token_ttl_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .unwrap_or(TimeDelta::MAX)
    }

    pub fn password_credential(&self) -> PasswordCredential {
        PasswordCredential::new(self.password_cost)
    }
}
