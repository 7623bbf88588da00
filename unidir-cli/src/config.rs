//! Service configuration
//!
//! Precedence, lowest first: built-in defaults, `~/.unidir/config.toml`
//! (or `--config <path>`), `.env`, process environment, command-line flags.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use unidir_server::AuthConfig;

/// `[auth]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: Option<i64>,
    pub bcrypt_cost: Option<u32>,
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub database_url: Option<String>,
    pub bind: Option<SocketAddr>,
    pub cors_permissive: bool,
    pub max_connections: Option<u32>,
    pub auth: AuthSection,
}

impl ServiceConfig {
    /// `~/.unidir/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".unidir").join("config.toml"))
    }

    /// Load from `path`, or from the default location when it exists, then
    /// apply `.env` and environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        // Missing .env is fine
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Overlay environment variables read through `get`.
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = get("DATABASE_URL") {
            self.database_url = Some(url);
        }

        if let Some(port) = get("PORT") {
            let port: u16 = port.parse().with_context(|| format!("Invalid PORT: {port}"))?;
            self.bind = Some(SocketAddr::from(([0, 0, 0, 0], port)));
        }

        if let Some(bind) = get("UNIDIR_BIND") {
            let addr = bind
                .parse()
                .with_context(|| format!("Invalid UNIDIR_BIND: {bind}"))?;
            self.bind = Some(addr);
        }

        if let Some(secret) = get("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }

        if let Some(ttl) = get("JWT_TTL_HOURS") {
            let ttl = ttl
                .parse()
                .with_context(|| format!("Invalid JWT_TTL_HOURS: {ttl}"))?;
            self.auth.token_ttl_hours = Some(ttl);
        }

        if let Some(max) = get("UNIDIR_MAX_CONNECTIONS") {
            let max = max
                .parse()
                .with_context(|| format!("Invalid UNIDIR_MAX_CONNECTIONS: {max}"))?;
            self.max_connections = Some(max);
        }

        Ok(())
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database_url.as_deref().context(
            "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, .env, or ~/.unidir/config.toml",
        )
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
            .unwrap_or(unidir_server::db::DEFAULT_MAX_CONNECTIONS)
    }

    /// Configured address, else 127.0.0.1:3000.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)))
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.auth.bcrypt_cost.unwrap_or(AuthConfig::default().bcrypt_cost)
    }

    /// Auth settings for the server. A signing secret is mandatory.
    pub fn auth_config(&self) -> Result<AuthConfig> {
        let defaults = AuthConfig::default();
        let Some(secret) = self.auth.jwt_secret.clone().filter(|s| !s.is_empty()) else {
            bail!("JWT_SECRET not set. Set via JWT_SECRET env, .env, or [auth] jwt_secret in config");
        };

        Ok(AuthConfig {
            jwt_secret: secret,
            token_ttl_hours: self.auth.token_ttl_hours.unwrap_or(defaults.token_ttl_hours),
            bcrypt_cost: self.bcrypt_cost(),
        })
    }
}
